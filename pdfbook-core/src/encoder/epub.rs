//! EPUB encoder implementation

use crate::error::PdfbookError;
use crate::types::{Book, Chapter};
use std::io::Write;

/// Encoder for a minimal EPUB 3 package
///
/// Each chapter becomes one XHTML file with a "Chapter N" heading and its text
/// as escaped paragraphs. Manifest, spine and navigation are left to
/// `epub-builder`.
pub struct EpubEncoder {
    /// Value of the package `generator` metadata
    generator: String,
}

impl EpubEncoder {
    pub fn new() -> Self {
        Self {
            generator: concat!("pdfbook ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Encode a book to a writer
    pub fn encode(&self, book: &Book, writer: &mut dyn Write) -> Result<(), PdfbookError> {
        use epub_builder::{EpubBuilder, EpubContent, EpubVersion, ReferenceType, ZipLibrary};

        let mut builder = EpubBuilder::new(ZipLibrary::new().map_err(|e| {
            PdfbookError::Packaging(format!("Failed to create zip: {}", e))
        })?)
        .map_err(|e| PdfbookError::Packaging(format!("Failed to create EPUB builder: {}", e)))?;

        builder.epub_version(EpubVersion::V30);

        // Set metadata
        builder
            .metadata("title", &book.metadata.title)
            .map_err(|e| PdfbookError::Packaging(e.to_string()))?;

        for creator in &book.metadata.creator {
            builder
                .metadata("author", creator)
                .map_err(|e| PdfbookError::Packaging(e.to_string()))?;
        }

        builder
            .metadata("lang", &book.metadata.language)
            .map_err(|e| PdfbookError::Packaging(e.to_string()))?;

        builder
            .metadata("generator", &self.generator)
            .map_err(|e| PdfbookError::Packaging(e.to_string()))?;

        // Add chapters
        for (i, chapter) in book.chapters.iter().enumerate() {
            let xhtml = chapter_to_xhtml(chapter);
            let filename = format!("ch_{}.xhtml", i + 1);

            builder
                .add_content(
                    EpubContent::new(&filename, xhtml.as_bytes())
                        .title(&chapter.title)
                        .reftype(ReferenceType::Text),
                )
                .map_err(|e| PdfbookError::Packaging(e.to_string()))?;
        }

        // Generate EPUB
        builder
            .generate(writer)
            .map_err(|e| PdfbookError::Packaging(e.to_string()))?;

        Ok(())
    }

    /// Encode a book into a byte buffer
    pub fn encode_to_vec(&self, book: &Book) -> Result<Vec<u8>, PdfbookError> {
        let mut output = Vec::new();
        self.encode(book, &mut output)?;
        Ok(output)
    }
}

impl Default for EpubEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesize an EPUB from plain text.
///
/// Title falls back to "Untitled", the author is only recorded when given, and
/// the text is split into chapters on blank lines.
pub fn build_epub(
    text: &str,
    title: Option<&str>,
    author: Option<&str>,
) -> Result<Vec<u8>, PdfbookError> {
    let book = Book::from_text(text, title, author);
    tracing::debug!(
        title = %book.title(),
        chapters = book.chapters.len(),
        "Packaging EPUB"
    );
    EpubEncoder::new().encode_to_vec(&book)
}

/// Turn raw chapter text into an XHTML fragment: escaped, paragraphs and line
/// breaks made explicit
pub(crate) fn body_to_xhtml(body: &str) -> String {
    escape_html(body)
        .replace("\n\n", "</p><p>")
        .replace('\n', "<br/>")
}

/// Generate XHTML document for a chapter
pub(crate) fn chapter_to_xhtml(chapter: &Chapter) -> String {
    let title = escape_html(&chapter.title);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head>
    <title>{title}</title>
    <meta charset="UTF-8"/>
</head>
<body>
<h2>{title}</h2>
<p>{}</p>
</body>
</html>"#,
        body_to_xhtml(&chapter.body)
    )
}

/// Escape markup characters. `&` goes first so entities are not escaped twice.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
