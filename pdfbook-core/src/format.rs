//! Target format registry
//!
//! The closed set of formats a caller may request, with their MIME types and
//! file extensions, and the table of what the in-process path can produce for
//! each of them.

use crate::error::PdfbookError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// MIME type used for anything outside the registry
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// An e-book format a caller can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Epub,
    Mobi,
    Azw3,
    Txt,
}

impl TargetFormat {
    /// Every supported format, in the order they are documented
    pub const ALL: [TargetFormat; 4] = [
        TargetFormat::Epub,
        TargetFormat::Mobi,
        TargetFormat::Azw3,
        TargetFormat::Txt,
    ];

    /// MIME type of the produced artifact
    pub fn mime_type(&self) -> &'static str {
        match self {
            TargetFormat::Epub => "application/epub+zip",
            TargetFormat::Mobi => "application/x-mobipocket-ebook",
            TargetFormat::Azw3 => "application/vnd.amazon.ebook",
            TargetFormat::Txt => "text/plain; charset=utf-8",
        }
    }

    /// File extension, which is also the request token
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Epub => "epub",
            TargetFormat::Mobi => "mobi",
            TargetFormat::Azw3 => "azw3",
            TargetFormat::Txt => "txt",
        }
    }

    /// The format the in-process pipeline produces when this one is requested.
    ///
    /// Only EPUB and plain text can be written without the external converter;
    /// the Kindle formats degrade to EPUB.
    pub fn realizable_in_process(&self) -> TargetFormat {
        match self {
            TargetFormat::Epub => TargetFormat::Epub,
            TargetFormat::Txt => TargetFormat::Txt,
            TargetFormat::Mobi | TargetFormat::Azw3 => TargetFormat::Epub,
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}

impl FromStr for TargetFormat {
    type Err = PdfbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "epub" => Ok(TargetFormat::Epub),
            "mobi" => Ok(TargetFormat::Mobi),
            "azw3" => Ok(TargetFormat::Azw3),
            "txt" => Ok(TargetFormat::Txt),
            _ => Err(PdfbookError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Validate a requested target format token
pub fn parse_target(target: &str) -> Result<TargetFormat, PdfbookError> {
    target.parse()
}

/// MIME type for an extension token, `application/octet-stream` when unknown
pub fn mime_for_extension(ext: &str) -> &'static str {
    ext.parse::<TargetFormat>()
        .map(|format| format.mime_type())
        .unwrap_or(FALLBACK_MIME)
}
