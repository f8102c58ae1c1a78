//! Response assembly

use crate::format::TargetFormat;
use crate::types::non_blank;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Base name used when the request carries no title
pub const DEFAULT_BASENAME: &str = "book";

/// Result of a conversion, as returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub filename: String,
    pub mime_type: String,
    pub content_base64: String,

    /// Human-readable account of any fallback or downgrade
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ConversionResult {
    /// Decode the payload back into raw bytes
    pub fn content(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.content_base64)
    }
}

/// Assemble the response for an artifact of the `realized` format
pub fn build_response(
    title: Option<&str>,
    realized: TargetFormat,
    bytes: &[u8],
    note: Option<&str>,
) -> ConversionResult {
    ConversionResult {
        filename: filename(title, realized),
        mime_type: realized.mime_type().to_string(),
        content_base64: base64::engine::general_purpose::STANDARD.encode(bytes),
        note: non_blank(note).map(|n| n.trim().to_string()),
    }
}

/// `<title>.<ext>` with whitespace runs collapsed to `_`, or `book.<ext>`
pub fn filename(title: Option<&str>, format: TargetFormat) -> String {
    let base = match non_blank(title) {
        Some(title) => title.split_whitespace().collect::<Vec<_>>().join("_"),
        None => DEFAULT_BASENAME.to_string(),
    };
    format!("{}.{}", base, format.extension())
}
