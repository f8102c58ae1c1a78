//! Convert command implementation

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pdfbook_core::converter::{ConverterSettings, SearchPath};
use pdfbook_core::ConversionRequest;
use std::path::Path;
use std::time::Duration;

/// Convert a PDF and write the result into `output_dir`
pub async fn convert(
    input: &Path,
    format: &str,
    title: Option<String>,
    author: Option<String>,
    output_dir: &Path,
) -> Result<()> {
    // Fail on a bad format before reading anything
    pdfbook_core::format::parse_target(format)?;

    let pdf = tokio::fs::read(input)
        .await
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    // Set up progress bar with animation
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Converting to {}...", format.trim()));

    let service =
        pdfbook_core::default_service(SearchPath::from_env(), ConverterSettings::default());
    let request = ConversionRequest {
        pdf,
        target_format: format.to_string(),
        title,
        author,
    };

    let result = match service.convert(request).await {
        Ok(result) => result,
        Err(e) => {
            pb.abandon_with_message("Conversion failed");
            return Err(e).with_context(|| format!("Failed to convert {}", input.display()));
        }
    };

    let content = result.content().context("Converter returned invalid base64")?;
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;
    let output = output_dir.join(&result.filename);
    tokio::fs::write(&output, &content)
        .await
        .with_context(|| format!("Failed to write output file: {}", output.display()))?;

    tracing::info!(
        bytes = content.len(),
        mime_type = %result.mime_type,
        "Wrote {}",
        output.display()
    );
    pb.finish_and_clear();

    println!("{}", output.display());
    if let Some(note) = &result.note {
        println!("Note: {}", note);
    }

    Ok(())
}
