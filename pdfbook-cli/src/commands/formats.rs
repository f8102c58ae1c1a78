//! Formats command implementation

use anyhow::Result;
use pdfbook_core::TargetFormat;
use serde::Serialize;

#[derive(Serialize)]
struct FormatInfo {
    format: TargetFormat,
    mime_type: &'static str,

    /// What the built-in converter writes for this format
    built_in: TargetFormat,
}

/// List the supported target formats
pub fn formats(json: bool) -> Result<()> {
    let formats: Vec<FormatInfo> = TargetFormat::ALL
        .iter()
        .map(|format| FormatInfo {
            format: *format,
            mime_type: format.mime_type(),
            built_in: format.realizable_in_process(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&formats)?);
    } else {
        for info in &formats {
            let fallback = if info.built_in == info.format {
                String::new()
            } else {
                format!("  (built-in: {})", info.built_in)
            };
            println!("{:<6} {}{}", info.format, info.mime_type, fallback);
        }
    }

    Ok(())
}
