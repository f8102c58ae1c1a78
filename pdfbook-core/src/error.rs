//! Error types for pdfbook core

use std::time::Duration;
use thiserror::Error;

/// Result type alias using PdfbookError
pub type Result<T> = std::result::Result<T, PdfbookError>;

/// Top-level error type for a conversion request
///
/// Only errors of the in-process path end up here. Failures of the external
/// converter are recovered by the service and reported through the response note.
#[derive(Debug, Error)]
pub enum PdfbookError {
    #[error("target_format must be epub|mobi|azw3|txt (got {0:?})")]
    UnsupportedFormat(String),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("EPUB packaging failed: {0}")]
    Packaging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PdfbookError {
    /// Whether the error was caused by the request itself rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(self, PdfbookError::UnsupportedFormat(_))
    }
}

/// Errors that occur while pulling text out of a PDF
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF document is empty")]
    Empty,

    #[error("Unreadable PDF: {0}")]
    Malformed(String),

    #[error("PDF parser aborted: {0}")]
    Aborted(String),
}

/// Errors raised by the external converter
#[derive(Debug, Error)]
pub enum ConverterError {
    #[error("{0} was not found on the search path")]
    Unavailable(String),

    #[error("converter failed ({status}): {log}")]
    Failed { status: String, log: String },

    #[error("{program} did not finish within {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_message() {
        let err = PdfbookError::UnsupportedFormat("pdf".to_string());
        assert_eq!(
            err.to_string(),
            "target_format must be epub|mobi|azw3|txt (got \"pdf\")"
        );
        assert!(err.is_client_error());
    }

    #[test]
    fn test_extraction_is_not_client_error() {
        let err: PdfbookError = ExtractionError::Empty.into();
        assert!(!err.is_client_error());
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_timeout_message() {
        let err = ConverterError::TimedOut {
            program: "ebook-convert".to_string(),
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "ebook-convert did not finish within 30s");
    }
}
