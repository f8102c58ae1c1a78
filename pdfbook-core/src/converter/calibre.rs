//! Calibre `ebook-convert` invocation

use super::{
    truncate_chars, ConversionProvider, ConverterSettings, EBOOK_CONVERT, LOG_EXCERPT_CHARS,
};
use crate::error::ConverterError;
use crate::format::TargetFormat;
use crate::types::non_blank;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;

/// Prefix of per-invocation workspace directories
const WORKSPACE_PREFIX: &str = "pdf2ebook_";

/// Runs a located `ebook-convert` binary against a throwaway workspace
#[derive(Debug, Clone)]
pub struct CalibreConverter {
    executable: PathBuf,
    settings: ConverterSettings,
}

impl CalibreConverter {
    pub fn new(executable: impl Into<PathBuf>, settings: ConverterSettings) -> Self {
        Self {
            executable: executable.into(),
            settings,
        }
    }

    /// Create the workspace directory for one run
    fn open_workspace(&self) -> std::io::Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);
        match &self.settings.workspace_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
    }

    /// Convert inside an already created workspace
    async fn run(
        &self,
        workspace: &Path,
        pdf: &[u8],
        format: TargetFormat,
        title: Option<&str>,
        author: Option<&str>,
    ) -> Result<Vec<u8>, ConverterError> {
        let input = workspace.join("in.pdf");
        let output = workspace.join(format!("out.{}", format.extension()));
        tokio::fs::write(&input, pdf).await?;

        let child = Command::new(&self.executable)
            .args(command_args(&input, &output, title, author))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    ConverterError::Unavailable(self.executable.display().to_string())
                }
                _ => ConverterError::Io(e),
            })?;

        // Dropping the wait future on timeout drops the child, which kills it
        let finished = tokio::time::timeout(self.settings.timeout, child.wait_with_output())
            .await
            .map_err(|_| ConverterError::TimedOut {
                program: EBOOK_CONVERT.to_string(),
                timeout: self.settings.timeout,
            })??;

        let mut log = String::from_utf8_lossy(&finished.stdout).into_owned();
        log.push_str(&String::from_utf8_lossy(&finished.stderr));

        let produced = tokio::fs::try_exists(&output).await.unwrap_or(false);
        if !finished.status.success() || !produced {
            let status = if finished.status.success() {
                "no output file".to_string()
            } else {
                finished.status.to_string()
            };
            return Err(ConverterError::Failed {
                status,
                log: truncate_chars(&log, LOG_EXCERPT_CHARS).to_string(),
            });
        }

        Ok(tokio::fs::read(&output).await?)
    }
}

#[async_trait]
impl ConversionProvider for CalibreConverter {
    fn name(&self) -> &str {
        EBOOK_CONVERT
    }

    async fn convert(
        &self,
        pdf: &[u8],
        format: TargetFormat,
        title: Option<&str>,
        author: Option<&str>,
    ) -> Result<Vec<u8>, ConverterError> {
        let workspace = self.open_workspace()?;
        tracing::debug!(
            workspace = %workspace.path().display(),
            %format,
            "Running {}",
            EBOOK_CONVERT
        );

        let result = self
            .run(workspace.path(), pdf, format, title, author)
            .await;

        // Cleanup is best effort and never replaces the conversion outcome
        let path = workspace.path().to_path_buf();
        if let Err(e) = workspace.close() {
            tracing::warn!(workspace = %path.display(), error = %e, "Failed to remove workspace");
        }

        result
    }
}

/// Arguments for `ebook-convert <input> <output> [--title T] [--authors A]`
fn command_args(
    input: &Path,
    output: &Path,
    title: Option<&str>,
    author: Option<&str>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![input.into(), output.into()];
    if let Some(title) = non_blank(title) {
        args.push("--title".into());
        args.push(title.into());
    }
    if let Some(author) = non_blank(author) {
        args.push("--authors".into());
        args.push(author.into());
    }
    args
}
