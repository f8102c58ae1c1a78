//! The Book type synthesized from extracted PDF text

use super::{Chapter, Metadata};
use regex::Regex;
use std::sync::OnceLock;

/// A book assembled from plain text
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    /// Book metadata (title, author, language)
    pub metadata: Metadata,

    /// Ordered list of chapters; document order is reading order
    pub chapters: Vec<Chapter>,
}

impl Book {
    /// Create a new book with the given title and language
    pub fn new(title: impl Into<String>, language: impl Into<String>) -> Self {
        Self::with_metadata(Metadata::new(title, language))
    }

    /// Create a book with existing metadata
    pub fn with_metadata(metadata: Metadata) -> Self {
        Self {
            metadata,
            chapters: Vec::new(),
        }
    }

    /// Build a book from extracted text, one chapter per blank-line separated block.
    ///
    /// The result always has at least one chapter, even for empty text.
    pub fn from_text(text: &str, title: Option<&str>, author: Option<&str>) -> Self {
        let mut book = Self::with_metadata(Metadata::from_request(title, author));
        for (i, body) in split_chapters(text).into_iter().enumerate() {
            book.add_chapter(Chapter::numbered(i + 1, body));
        }
        book
    }

    /// Add a chapter to the book
    pub fn add_chapter(&mut self, chapter: Chapter) {
        self.chapters.push(chapter);
    }

    /// Get the book title
    pub fn title(&self) -> &str {
        &self.metadata.title
    }
}

fn chapter_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{2,}").expect("valid chapter break pattern"))
}

/// Split text into chapter bodies on runs of two or more newlines.
///
/// Every segment between breaks is kept, including whitespace-only ones. Never
/// returns an empty list: empty text yields a single empty chapter.
pub fn split_chapters(text: &str) -> Vec<String> {
    let mut chapters: Vec<String> = chapter_break().split(text).map(str::to_string).collect();

    if chapters.is_empty() {
        chapters.push(String::new());
    }
    chapters
}
