//! CLI command implementations

mod convert;
mod formats;
mod probe;

pub use convert::convert;
pub use formats::formats;
pub use probe::probe;
