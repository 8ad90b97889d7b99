//! Custom error types for portal-reports
//!
//! The aggregation core is total and never fails; these errors only arise at
//! the boundaries (reading fetched rows, loading settings, writing exports).

use thiserror::Error;

/// The main error type for portal-reports operations
#[derive(Error, Debug)]
pub enum ReportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user-supplied parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// The fetched document could not be turned into rows
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// No report is registered under the given name
    #[error("Unknown report: {0}")]
    UnknownReport(String),
}

impl ReportError {
    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an import error
    pub fn is_import(&self) -> bool {
        matches!(self, Self::Import(_))
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

/// Result type alias for portal-reports operations
pub type ReportResult<T> = Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReportError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_unknown_report_display() {
        let err = ReportError::UnknownReport("balance-sheet".into());
        assert_eq!(err.to_string(), "Unknown report: balance-sheet");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ReportError = io_err.into();
        assert!(matches!(err, ReportError::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: ReportError = json_err.into();
        assert!(matches!(err, ReportError::Json(_)));
    }

    #[test]
    fn test_is_checks() {
        assert!(ReportError::Validation("x".into()).is_validation());
        assert!(ReportError::Import("x".into()).is_import());
        assert!(!ReportError::Export("x".into()).is_import());
    }
}
