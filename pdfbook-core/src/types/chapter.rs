//! Chapter type representing a single section of a synthesized book

/// A single chapter of a book
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    /// Chapter title, also used as the table of contents label
    pub title: String,

    /// Raw chapter text, unescaped
    pub body: String,
}

impl Chapter {
    /// Create a new chapter with a title and body text
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Create the `index`-th chapter (1-based) with the generic "Chapter N" title
    pub fn numbered(index: usize, body: impl Into<String>) -> Self {
        Self::new(format!("Chapter {}", index), body)
    }
}
