//! Book metadata

/// Title used when the caller supplies none
pub const DEFAULT_TITLE: &str = "Untitled";

/// Language written into the package document
pub const DEFAULT_LANGUAGE: &str = "en";

/// Book metadata (the subset of Dublin Core the synthesizer writes)
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// Book title
    pub title: String,

    /// Authors/creators
    pub creator: Vec<String>,

    /// Language code (ISO 639-1)
    pub language: String,
}

impl Metadata {
    /// Create new metadata with required fields
    pub fn new(title: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            creator: Vec::new(),
            language: language.into(),
        }
    }

    /// Build metadata from optional request fields.
    ///
    /// A blank title becomes [`DEFAULT_TITLE`]; a blank author is dropped.
    pub fn from_request(title: Option<&str>, author: Option<&str>) -> Self {
        let title = non_blank(title).unwrap_or(DEFAULT_TITLE);
        let mut metadata = Self::new(title, DEFAULT_LANGUAGE);
        if let Some(author) = non_blank(author) {
            metadata = metadata.with_creator(author);
        }
        metadata
    }

    /// Add an author/creator
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator.push(creator.into());
        self
    }
}

/// `Some(value)` unless the value is absent or whitespace only
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
