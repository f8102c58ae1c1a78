//! PDF text extraction

use super::TextExtractor;
use crate::error::ExtractionError;

/// Leading bytes of every PDF file
const PDF_MAGIC: &[u8] = b"%PDF";

/// Decoder for PDF format
///
/// Delegates parsing to `pdf-extract`. Layout is not preserved beyond the line
/// and paragraph breaks the library emits, which is all the chapter splitter
/// needs.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfDecoder;

impl PdfDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Reject input that cannot possibly be a PDF before handing it to the parser
    fn check_header(data: &[u8]) -> Result<(), ExtractionError> {
        if data.is_empty() {
            return Err(ExtractionError::Empty);
        }

        // The header may be preceded by junk; readers accept it within the first 1 KiB
        let window = &data[..data.len().min(1024)];
        if window
            .windows(PDF_MAGIC.len())
            .any(|candidate| candidate == PDF_MAGIC)
        {
            Ok(())
        } else {
            Err(ExtractionError::Malformed("missing %PDF header".to_string()))
        }
    }
}

impl TextExtractor for PdfDecoder {
    fn extract(&self, data: &[u8]) -> Result<String, ExtractionError> {
        Self::check_header(data)?;

        let text = pdf_extract::extract_text_from_mem(data).map_err(|e| {
            ExtractionError::Malformed(format!("Failed to extract PDF text: {}", e))
        })?;

        tracing::debug!(bytes = data.len(), chars = text.len(), "Extracted PDF text");
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let err = PdfDecoder::new().extract(&[]).unwrap_err();
        assert!(matches!(err, ExtractionError::Empty));
    }

    #[test]
    fn test_not_a_pdf() {
        let err = PdfDecoder::new()
            .extract(b"PK\x03\x04 definitely a zip file")
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Malformed(_)));
    }

    #[test]
    fn test_extracts_single_page() {
        let pdf = include_bytes!("../../tests/fixtures/hello.pdf");
        let text = PdfDecoder::new().extract(pdf).unwrap();

        assert!(text.contains("Hello PDF"), "extracted {text:?}");
        assert_eq!(text, text.trim());
    }

    #[test]
    fn test_header_after_junk_is_accepted() {
        assert!(PdfDecoder::check_header(b"\xef\xbb\xbf%PDF-1.7\n").is_ok());
    }
}
