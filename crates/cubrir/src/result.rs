//! Result and error types for Cubrir.
//!
//! Fatal conditions (load, parse, report write, I/O) are `CubrirError`.
//! Per-test assertion failures and candidate runtime faults are data, not
//! errors: they land in the execution results and the report's failure
//! tally, never in an `Err`.

use thiserror::Error;

/// Result type for Cubrir operations
pub type CubrirResult<T> = Result<T, CubrirError>;

/// Errors that can occur in Cubrir
#[derive(Debug, Error)]
pub enum CubrirError {
    /// Candidate file could not be loaded or no entry point resolved.
    /// Fatal: aborts the run before any test executes.
    #[error("Load error for {path}: {message}")]
    Load {
        /// Path of the candidate file
        path: String,
        /// Error message
        message: String,
    },

    /// Candidate or test-case source failed to parse
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        /// 1-based source line
        line: u32,
        /// 1-based source column
        column: u32,
        /// Error message
        message: String,
    },

    /// Report artifact could not be written. Surfaced to the caller but
    /// does not invalidate the already-computed summary.
    #[error("Report write failed for {path}: {message}")]
    ReportWrite {
        /// Target path of the artifact
        path: String,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CubrirError {
    /// Create a load error
    #[must_use]
    pub fn load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    #[must_use]
    pub fn parse(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a report write error
    #[must_use]
    pub fn report_write(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReportWrite {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for errors that abort a run before any test executes.
    #[must_use]
    pub const fn is_fatal_load(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::Parse { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let err = CubrirError::load("missing.py", "file not found");
        assert!(err.to_string().contains("missing.py"));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = CubrirError::parse(3, 7, "unexpected `)`");
        let text = err.to_string();
        assert!(text.contains("line 3"));
        assert!(text.contains("column 7"));
    }

    #[test]
    fn test_report_write_error_display() {
        let err = CubrirError::report_write("out/index.html", "permission denied");
        assert!(err.to_string().contains("out/index.html"));
    }

    #[test]
    fn test_fatality_classification() {
        assert!(CubrirError::load("f", "m").is_fatal_load());
        assert!(CubrirError::parse(1, 1, "m").is_fatal_load());
        assert!(!CubrirError::report_write("p", "m").is_fatal_load());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: CubrirError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
