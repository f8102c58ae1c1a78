//! Text extraction from PDF input

mod pdf;

pub use pdf::PdfDecoder;

use crate::error::ExtractionError;

/// Trait for pulling plain text out of a document
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text, trimmed of surrounding whitespace
    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError>;
}
