//! Descriptive statistics over return slices.

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample variance (n - 1 denominator). Zero below two points.
pub fn sample_variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation.
pub fn sample_std(data: &[f64]) -> f64 {
    sample_variance(data).sqrt()
}

/// Bias-adjusted sample skewness. Zero below three points or with no spread.
pub fn skewness(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 3 {
        return 0.0;
    }
    let m = mean(data);
    let nf = n as f64;
    let m2 = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / nf;
    let m3 = data.iter().map(|x| (x - m).powi(3)).sum::<f64>() / nf;
    if m2 < 1e-300 {
        return 0.0;
    }
    let g1 = m3 / m2.powf(1.5);
    g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0)
}

/// Bias-adjusted excess kurtosis. Zero below four points or with no spread.
pub fn excess_kurtosis(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 4 {
        return 0.0;
    }
    let m = mean(data);
    let nf = n as f64;
    let m2 = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / nf;
    let m4 = data.iter().map(|x| (x - m).powi(4)).sum::<f64>() / nf;
    if m2 < 1e-300 {
        return 0.0;
    }
    let g2 = m4 / (m2 * m2) - 3.0;
    ((nf + 1.0) * g2 + 6.0) * (nf - 1.0) / ((nf - 2.0) * (nf - 3.0))
}
