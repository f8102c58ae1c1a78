//! Encoders for writing the book model to output formats

mod epub;

pub use epub::{build_epub, EpubEncoder};
