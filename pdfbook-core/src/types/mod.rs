//! Book model used by the in-process conversion path

mod book;
mod chapter;
mod metadata;

pub use book::{split_chapters, Book};
pub use chapter::Chapter;
pub use metadata::Metadata;
pub(crate) use metadata::non_blank;
