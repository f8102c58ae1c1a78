//! External converter adapter
//!
//! The preferred conversion route shells out to Calibre's `ebook-convert`, which
//! handles every target format natively. Whether it can be used is decided per
//! request by a [`ProviderProbe`]: `Some(provider)` when the tool is present,
//! `None` when the service must fall back to the in-process pipeline.

mod calibre;
mod search_path;

pub use calibre::CalibreConverter;
pub use search_path::SearchPath;

use crate::error::ConverterError;
use crate::format::TargetFormat;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Name of the external converter executable
pub const EBOOK_CONVERT: &str = "ebook-convert";

/// Characters of converter output kept for diagnostics
pub const LOG_EXCERPT_CHARS: usize = 800;

/// Default bound on a single converter run
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// A capability that turns PDF bytes into any supported format
#[async_trait]
pub trait ConversionProvider: Send + Sync {
    /// Short name used in logs and notes
    fn name(&self) -> &str;

    /// Convert `pdf` into `format`, recording title/author metadata when given
    async fn convert(
        &self,
        pdf: &[u8],
        format: TargetFormat,
        title: Option<&str>,
        author: Option<&str>,
    ) -> Result<Vec<u8>, ConverterError>;
}

/// Decides whether a [`ConversionProvider`] is available right now
pub trait ProviderProbe: Send + Sync {
    fn probe(&self) -> Option<Arc<dyn ConversionProvider>>;
}

/// Settings shared by every external converter run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterSettings {
    /// Upper bound on one run; the process is killed once it elapses
    pub timeout: Duration,

    /// Directory to create workspaces in (system temp dir when `None`)
    pub workspace_root: Option<PathBuf>,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            workspace_root: None,
        }
    }
}

/// Probe that looks for `ebook-convert` on a search path
#[derive(Debug, Clone)]
pub struct ExternalProbe {
    search_path: SearchPath,
    settings: ConverterSettings,
}

impl ExternalProbe {
    pub fn new(search_path: SearchPath, settings: ConverterSettings) -> Self {
        Self {
            search_path,
            settings,
        }
    }
}

impl ProviderProbe for ExternalProbe {
    fn probe(&self) -> Option<Arc<dyn ConversionProvider>> {
        match self.search_path.locate(EBOOK_CONVERT) {
            Some(executable) => {
                tracing::debug!(executable = %executable.display(), "Found external converter");
                let provider: Arc<dyn ConversionProvider> =
                    Arc::new(CalibreConverter::new(executable, self.settings.clone()));
                Some(provider)
            }
            None => {
                tracing::debug!(
                    dirs = self.search_path.dirs().len(),
                    "{} not found on search path",
                    EBOOK_CONVERT
                );
                None
            }
        }
    }
}

/// Probe that never finds a converter, forcing the in-process path
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProvider;

impl ProviderProbe for NoProvider {
    fn probe(&self) -> Option<Arc<dyn ConversionProvider>> {
        None
    }
}

/// Longest prefix of `s` with at most `max` characters
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
