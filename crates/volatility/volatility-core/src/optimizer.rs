//! Deterministic Nelder-Mead simplex minimizer.
//!
//! Used for maximum-likelihood estimation over an unconstrained
//! reparameterization, so no bounds handling is needed here.

/// Result of a minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether the simplex spread fell below tolerance before the cap
    pub converged: bool,
}

/// Nelder-Mead configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct NelderMead {
    /// Iteration cap
    pub max_iterations: usize,
    /// Relative tolerance on the spread of objective values across the simplex
    pub tolerance: f64,
    /// Offset applied per coordinate to build the initial simplex
    pub initial_step: f64,
}

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

impl NelderMead {
    pub fn new(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
            initial_step: 0.5,
        }
    }

    /// Minimize `objective` starting from `start`.
    ///
    /// Non-finite objective values are treated as `+inf`, which steers the
    /// simplex away from invalid regions.
    pub fn minimize<F>(&self, objective: F, start: &[f64]) -> Minimum
    where
        F: Fn(&[f64]) -> f64,
    {
        let eval = |x: &[f64]| {
            let v = objective(x);
            if v.is_finite() {
                v
            } else {
                f64::INFINITY
            }
        };

        let dim = start.len();
        let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
        simplex.push(start.to_vec());
        for i in 0..dim {
            let mut vertex = start.to_vec();
            vertex[i] += self.initial_step;
            simplex.push(vertex);
        }
        let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            order(&mut simplex, &mut values);

            let best = values[0];
            let worst = values[dim];
            if best.is_finite()
                && worst.is_finite()
                && (worst - best).abs() <= self.tolerance * (best.abs() + self.tolerance)
            {
                converged = true;
                break;
            }
            iterations += 1;

            let centroid: Vec<f64> = (0..dim)
                .map(|j| simplex[..dim].iter().map(|v| v[j]).sum::<f64>() / dim as f64)
                .collect();

            let reflected = towards(&centroid, &simplex[dim], -REFLECTION);
            let f_reflected = eval(&reflected);

            if f_reflected < values[0] {
                let expanded = towards(&centroid, &simplex[dim], -EXPANSION);
                let f_expanded = eval(&expanded);
                if f_expanded < f_reflected {
                    simplex[dim] = expanded;
                    values[dim] = f_expanded;
                } else {
                    simplex[dim] = reflected;
                    values[dim] = f_reflected;
                }
                continue;
            }

            if f_reflected < values[dim - 1] {
                simplex[dim] = reflected;
                values[dim] = f_reflected;
                continue;
            }

            // Outside contraction when the reflection beat the worst point,
            // inside contraction otherwise.
            let (contracted, f_contracted, threshold) = if f_reflected < values[dim] {
                let c = towards(&centroid, &reflected, CONTRACTION);
                let f = eval(&c);
                (c, f, f_reflected)
            } else {
                let c = towards(&centroid, &simplex[dim], CONTRACTION);
                let f = eval(&c);
                (c, f, values[dim])
            };

            if f_contracted < threshold {
                simplex[dim] = contracted;
                values[dim] = f_contracted;
                continue;
            }

            let anchor = simplex[0].clone();
            for i in 1..=dim {
                simplex[i] = towards(&anchor, &simplex[i], SHRINK);
                values[i] = eval(&simplex[i]);
            }
        }

        order(&mut simplex, &mut values);
        Minimum {
            point: simplex.swap_remove(0),
            value: values[0],
            iterations,
            converged,
        }
    }
}

impl Default for NelderMead {
    fn default() -> Self {
        Self::new(2000, 1e-8)
    }
}

/// `from + t * (to - from)`
fn towards(from: &[f64], to: &[f64], t: f64) -> Vec<f64> {
    from.iter().zip(to).map(|(a, b)| a + t * (b - a)).collect()
}

/// Sort vertices by objective value; ties keep their relative order.
fn order(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = idx.iter().map(|&i| simplex[i].clone()).collect();
    *values = idx.iter().map(|&i| values[i]).collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadratic_minimum() {
        let nm = NelderMead::new(1000, 1e-12);
        let result = nm.minimize(|x| (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2), &[0.0, 0.0]);
        assert!(result.converged);
        assert!((result.point[0] - 3.0).abs() < 1e-4);
        assert!((result.point[1] + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rosenbrock() {
        let nm = NelderMead::new(5000, 1e-14);
        let rosen = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let result = nm.minimize(rosen, &[-1.2, 1.0]);
        assert!(result.converged);
        assert!((result.point[0] - 1.0).abs() < 1e-2);
        assert!((result.point[1] - 1.0).abs() < 2e-2);
    }

    #[test]
    fn test_iteration_cap_reports_non_convergence() {
        let nm = NelderMead::new(3, 1e-15);
        let result = nm.minimize(|x| x[0].powi(2) + x[1].powi(2) + x[2].powi(2), &[5.0, 5.0, 5.0]);
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }

    #[test]
    fn test_non_finite_regions_are_avoided() {
        let nm = NelderMead::default();
        let objective = |x: &[f64]| if x[0] < 0.0 { f64::NAN } else { (x[0] - 1.0).powi(2) };
        let result = nm.minimize(objective, &[2.0]);
        assert!(result.value.is_finite());
        assert!((result.point[0] - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_deterministic() {
        let nm = NelderMead::default();
        let f = |x: &[f64]| (x[0] - 0.3).powi(4) + (x[1] * x[0] - 2.0).powi(2);
        assert_eq!(nm.minimize(f, &[1.0, 1.0]), nm.minimize(f, &[1.0, 1.0]));
    }
}
