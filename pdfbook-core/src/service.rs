//! Conversion orchestration
//!
//! A request first goes to the external converter when one is available. Any
//! failure there is recorded in the response note and the request continues on
//! the in-process path: extract the PDF text, then either return it as plain
//! text or synthesize an EPUB. Kindle formats cannot be produced in process and
//! are downgraded to EPUB. Only failures of the in-process path fail the request.

use crate::converter::{truncate_chars, ProviderProbe};
use crate::decoder::TextExtractor;
use crate::encoder::build_epub;
use crate::error::{ConverterError, ExtractionError, PdfbookError, Result};
use crate::format::TargetFormat;
use crate::response::{build_response, ConversionResult};
use std::sync::Arc;

/// Characters of an error message copied into a note
pub const NOTE_MESSAGE_CHARS: usize = 160;

/// Note added when a Kindle format had to be written as EPUB
pub const DOWNGRADE_NOTE: &str =
    "The external converter is not available in this environment; output was downgraded to EPUB.";

/// A PDF conversion request
#[derive(Debug, Clone, Default)]
pub struct ConversionRequest {
    /// Raw PDF bytes
    pub pdf: Vec<u8>,

    /// Requested format token (case-insensitive, surrounding whitespace ignored)
    pub target_format: String,

    pub title: Option<String>,
    pub author: Option<String>,
}

impl ConversionRequest {
    pub fn new(pdf: impl Into<Vec<u8>>, target_format: impl Into<String>) -> Self {
        Self {
            pdf: pdf.into(),
            target_format: target_format.into(),
            title: None,
            author: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// Converts PDFs using the external converter when possible, the built-in
/// pipeline otherwise
#[derive(Clone)]
pub struct ConversionService {
    probe: Arc<dyn ProviderProbe>,
    extractor: Arc<dyn TextExtractor>,
}

impl ConversionService {
    pub fn new(probe: Arc<dyn ProviderProbe>, extractor: Arc<dyn TextExtractor>) -> Self {
        Self { probe, extractor }
    }

    /// Convert a PDF into the requested format
    pub async fn convert(&self, request: ConversionRequest) -> Result<ConversionResult> {
        let requested: TargetFormat = request.target_format.parse()?;
        let title = request.title.as_deref();
        let author = request.author.as_deref();
        let mut notes: Vec<String> = Vec::new();

        if let Some(provider) = self.probe.probe() {
            tracing::info!(
                format = %requested,
                converter = provider.name(),
                "Converting with external converter"
            );
            match provider.convert(&request.pdf, requested, title, author).await {
                Ok(bytes) => {
                    return Ok(build_response(title, requested, &bytes, None));
                }
                // The binary vanished between probe and spawn: same as never found
                Err(ConverterError::Unavailable(program)) => {
                    tracing::debug!(
                        %program,
                        "External converter unavailable, using built-in converter"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "External converter failed, using built-in converter"
                    );
                    notes.push(format!(
                        "{} failed, fell back to the built-in converter: {}",
                        provider.name(),
                        truncate_chars(&e.to_string(), NOTE_MESSAGE_CHARS)
                    ));
                }
            }
        }

        let realized = requested.realizable_in_process();
        if realized != requested {
            tracing::warn!(
                requested = %requested,
                realized = %realized,
                "Downgrading output format"
            );
            notes.push(DOWNGRADE_NOTE.to_string());
        }

        let text = self.extract_text(request.pdf).await?;
        tracing::info!(
            format = %realized,
            chars = text.len(),
            "Converting with built-in converter"
        );

        let bytes = match realized {
            TargetFormat::Txt => text.into_bytes(),
            _ => {
                let title = request.title.clone();
                let author = request.author.clone();
                tokio::task::spawn_blocking(move || {
                    build_epub(&text, title.as_deref(), author.as_deref())
                })
                .await
                .map_err(|e| PdfbookError::Packaging(format!("EPUB task failed: {}", e)))??
            }
        };

        let note = notes.join(" ");
        Ok(build_response(title, realized, &bytes, Some(note.as_str())))
    }

    /// Run the extractor on the blocking pool, trimming its output
    async fn extract_text(&self, pdf: Vec<u8>) -> Result<String> {
        let extractor = Arc::clone(&self.extractor);
        let text = tokio::task::spawn_blocking(move || extractor.extract(&pdf))
            .await
            .map_err(|e| ExtractionError::Aborted(e.to_string()))??;
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{ConversionProvider, NoProvider};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Extractor that returns fixed text, or fails when none is set
    struct FixedText(Option<&'static str>);

    impl TextExtractor for FixedText {
        fn extract(&self, _data: &[u8]) -> std::result::Result<String, ExtractionError> {
            self.0
                .map(str::to_string)
                .ok_or_else(|| ExtractionError::Malformed("bad xref".to_string()))
        }
    }

    /// Provider that records what it was asked and returns a canned outcome
    struct StubProvider {
        outcome: Outcome,
        calls: Mutex<Vec<(TargetFormat, Option<String>, Option<String>)>>,
    }

    #[derive(Clone, Copy)]
    enum Outcome {
        Converted,
        Failed,
        Vanished,
    }

    impl StubProvider {
        fn new(fail: bool) -> Arc<Self> {
            Self::with_outcome(if fail { Outcome::Failed } else { Outcome::Converted })
        }

        fn with_outcome(outcome: Outcome) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ConversionProvider for StubProvider {
        fn name(&self) -> &str {
            "ebook-convert"
        }

        async fn convert(
            &self,
            _pdf: &[u8],
            format: TargetFormat,
            title: Option<&str>,
            author: Option<&str>,
        ) -> std::result::Result<Vec<u8>, ConverterError> {
            self.calls.lock().unwrap().push((
                format,
                title.map(str::to_string),
                author.map(str::to_string),
            ));
            match self.outcome {
                Outcome::Converted => Ok(format!("native {}", format).into_bytes()),
                Outcome::Failed => Err(ConverterError::Failed {
                    status: "exit status: 1".to_string(),
                    log: "x".repeat(1000),
                }),
                Outcome::Vanished => Err(ConverterError::Unavailable(
                    "/usr/bin/ebook-convert".to_string(),
                )),
            }
        }
    }

    struct Available(Arc<StubProvider>);

    impl ProviderProbe for Available {
        fn probe(&self) -> Option<Arc<dyn ConversionProvider>> {
            Some(self.0.clone() as Arc<dyn ConversionProvider>)
        }
    }

    fn service(
        probe: impl ProviderProbe + 'static,
        text: Option<&'static str>,
    ) -> ConversionService {
        ConversionService::new(Arc::new(probe), Arc::new(FixedText(text)))
    }

    #[tokio::test]
    async fn test_invalid_target_fails_before_probing() {
        let provider = StubProvider::new(false);
        let svc = service(Available(provider.clone()), Some("text"));

        for bad in ["pdf", "", "  ", "EPUB3", "word"] {
            let err = svc
                .convert(ConversionRequest::new(b"%PDF".to_vec(), bad))
                .await
                .unwrap_err();
            assert!(matches!(err, PdfbookError::UnsupportedFormat(_)));
        }
        assert!(provider.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_external_success_keeps_requested_format() {
        for format in TargetFormat::ALL {
            let provider = StubProvider::new(false);
            let svc = service(Available(provider.clone()), None);

            let request =
                ConversionRequest::new(b"%PDF".to_vec(), format.extension()).with_title("My  Book");
            let result = svc.convert(request).await.unwrap();

            assert_eq!(result.filename, format!("My_Book.{}", format.extension()));
            assert_eq!(result.mime_type, format.mime_type());
            assert_eq!(result.content().unwrap(), format!("native {}", format).into_bytes());
            assert_eq!(result.note, None);
        }
    }

    #[tokio::test]
    async fn test_external_receives_metadata() {
        let provider = StubProvider::new(false);
        let svc = service(Available(provider.clone()), None);

        svc.convert(
            ConversionRequest::new(b"%PDF".to_vec(), " AZW3")
                .with_title("Dune")
                .with_author("Frank Herbert"),
        )
        .await
        .unwrap();

        let calls = provider.calls.lock().unwrap();
        assert_eq!(
            calls.as_slice(),
            [(
                TargetFormat::Azw3,
                Some("Dune".to_string()),
                Some("Frank Herbert".to_string())
            )]
        );
    }

    #[tokio::test]
    async fn test_external_failure_falls_back_with_note() {
        let provider = StubProvider::new(true);
        let svc = service(Available(provider), Some("plain text"));

        let result = svc
            .convert(ConversionRequest::new(b"%PDF".to_vec(), "txt"))
            .await
            .unwrap();

        assert_eq!(result.filename, "book.txt");
        assert_eq!(result.content().unwrap(), b"plain text");
        let note = result.note.unwrap();
        assert!(note.starts_with("ebook-convert failed, fell back to the built-in converter: "));
        let message =
            note.trim_start_matches("ebook-convert failed, fell back to the built-in converter: ");
        assert_eq!(message.chars().count(), NOTE_MESSAGE_CHARS);
    }

    #[tokio::test]
    async fn test_external_failure_on_mobi_has_both_notes() {
        let provider = StubProvider::new(true);
        let svc = service(Available(provider), Some("Once upon a time"));

        let result = svc
            .convert(ConversionRequest::new(b"%PDF".to_vec(), "mobi"))
            .await
            .unwrap();

        assert_eq!(result.filename, "book.epub");
        assert_eq!(result.mime_type, "application/epub+zip");
        let note = result.note.unwrap();
        assert!(note.starts_with("ebook-convert failed"));
        assert!(note.ends_with(DOWNGRADE_NOTE));
    }

    #[tokio::test]
    async fn test_vanished_converter_falls_back_silently() {
        let provider = StubProvider::with_outcome(Outcome::Vanished);
        let svc = service(Available(provider.clone()), Some("Body text"));

        let result = svc
            .convert(ConversionRequest::new(b"%PDF".to_vec(), "epub"))
            .await
            .unwrap();

        assert_eq!(provider.calls.lock().unwrap().len(), 1);
        assert_eq!(result.filename, "book.epub");
        assert_eq!(result.note, None);

        let result = svc
            .convert(ConversionRequest::new(b"%PDF".to_vec(), "mobi"))
            .await
            .unwrap();
        assert_eq!(result.note.as_deref(), Some(DOWNGRADE_NOTE));
    }

    #[tokio::test]
    async fn test_unavailable_downgrades_kindle_formats() {
        for target in ["mobi", "AZW3"] {
            let svc = service(NoProvider, Some("Chapter text"));
            let result = svc
                .convert(ConversionRequest::new(b"%PDF".to_vec(), target))
                .await
                .unwrap();

            assert_eq!(result.filename, "book.epub");
            assert_eq!(result.mime_type, "application/epub+zip");
            assert_eq!(result.note.as_deref(), Some(DOWNGRADE_NOTE));
            assert_eq!(&result.content().unwrap()[..2], b"PK");
        }
    }

    #[tokio::test]
    async fn test_unavailable_txt_returns_trimmed_text() {
        let svc = service(NoProvider, Some("  \n Hello, 世界 \n\n"));
        let result = svc
            .convert(ConversionRequest::new(b"%PDF".to_vec(), "txt"))
            .await
            .unwrap();

        assert_eq!(result.content().unwrap(), "Hello, 世界".as_bytes());
        assert_eq!(result.mime_type, "text/plain; charset=utf-8");
        assert_eq!(result.note, None);
    }

    #[tokio::test]
    async fn test_unavailable_epub_has_no_note() {
        let svc = service(NoProvider, Some("Some text"));
        let result = svc
            .convert(ConversionRequest::new(b"%PDF".to_vec(), "EPUB "))
            .await
            .unwrap();

        assert_eq!(result.filename, "book.epub");
        assert_eq!(result.mime_type, "application/epub+zip");
        assert!(!result.content_base64.is_empty());
        assert_eq!(result.note, None);
    }

    #[tokio::test]
    async fn test_extraction_failure_is_fatal() {
        let svc = service(NoProvider, None);
        let err = svc
            .convert(ConversionRequest::new(b"%PDF".to_vec(), "epub"))
            .await
            .unwrap_err();

        assert!(matches!(err, PdfbookError::Extraction(ExtractionError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_extractor_panic_is_reported() {
        struct Panicking;

        impl TextExtractor for Panicking {
            fn extract(&self, _data: &[u8]) -> std::result::Result<String, ExtractionError> {
                panic!("parser bug")
            }
        }

        let svc = ConversionService::new(Arc::new(NoProvider), Arc::new(Panicking));
        let err = svc
            .convert(ConversionRequest::new(b"%PDF".to_vec(), "txt"))
            .await
            .unwrap_err();

        assert!(matches!(err, PdfbookError::Extraction(ExtractionError::Aborted(_))));
    }
}
