//! Probe command implementation

use anyhow::Result;
use pdfbook_core::converter::{SearchPath, EBOOK_CONVERT};

/// Report where `ebook-convert` would be found
pub fn probe() -> Result<()> {
    let search_path = SearchPath::from_env();
    tracing::debug!(dirs = search_path.dirs().len(), "Searching PATH");

    match search_path.locate(EBOOK_CONVERT) {
        Some(path) => println!("{}: {}", EBOOK_CONVERT, path.display()),
        None => println!(
            "{}: not found (the built-in converter will be used)",
            EBOOK_CONVERT
        ),
    }

    Ok(())
}
