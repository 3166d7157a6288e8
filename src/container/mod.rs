pub mod constants;
pub mod format;
pub mod metadata;

pub use constants::*;
pub use format::{read_header, Container};
pub use metadata::Metadata;
