//! Data error types.

use thiserror::Error;

/// Loader and writer errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(String),

    /// Malformed CSV structure
    #[error("CSV error: {0}")]
    Csv(String),

    /// JSON serialization failure
    #[error("JSON error: {0}")]
    Json(String),

    /// Required columns absent from the header
    #[error("Missing expected columns in {origin}: {columns:?}")]
    MissingColumns { origin: String, columns: Vec<String> },

    /// Nothing usable left after cleaning
    #[error("No usable rows in {0}")]
    NoData(String),
}

impl From<std::io::Error> for DataError {
    fn from(e: std::io::Error) -> Self {
        DataError::Io(e.to_string())
    }
}

impl From<csv::Error> for DataError {
    fn from(e: csv::Error) -> Self {
        DataError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(e: serde_json::Error) -> Self {
        DataError::Json(e.to_string())
    }
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let error = DataError::MissingColumns {
            origin: "prices.csv".to_string(),
            columns: vec!["close".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Missing expected columns in prices.csv: [\"close\"]"
        );
    }

    #[test]
    fn test_no_data_message() {
        let error = DataError::NoData("raw/".to_string());
        assert_eq!(error.to_string(), "No usable rows in raw/");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error: DataError = io.into();
        assert!(matches!(error, DataError::Io(ref msg) if msg.contains("gone")));
    }

    #[test]
    fn test_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(DataError::Csv("bad quote".to_string()));
        assert_eq!(error.to_string(), "CSV error: bad quote");
    }
}
