//! pdfbook core library
//!
//! Converts PDF documents into EPUB, MOBI, AZW3 or plain text. Conversion is
//! delegated to Calibre's `ebook-convert` when it is installed; otherwise the
//! text is extracted in process and packaged as a minimal EPUB (Kindle formats
//! are downgraded to EPUB on that path).

pub mod converter;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod response;
pub mod service;
pub mod types;

pub use converter::{
    ConversionProvider, ConverterSettings, ExternalProbe, ProviderProbe, SearchPath,
};
pub use decoder::{PdfDecoder, TextExtractor};
pub use encoder::build_epub;
pub use error::{ConverterError, ExtractionError, PdfbookError, Result};
pub use format::TargetFormat;
pub use response::{build_response, ConversionResult};
pub use service::{ConversionRequest, ConversionService};
pub use types::{Book, Chapter, Metadata};

use std::sync::Arc;

/// Service wired with the real collaborators: `ebook-convert` looked up on
/// `search_path`, and the PDF text extractor
pub fn default_service(search_path: SearchPath, settings: ConverterSettings) -> ConversionService {
    ConversionService::new(
        Arc::new(ExternalProbe::new(search_path, settings)),
        Arc::new(PdfDecoder::new()),
    )
}
