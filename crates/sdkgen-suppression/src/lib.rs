mod discover;
mod document;
mod error;
mod resolve;

pub use discover::{SUPPRESSION_FILE_NAME, find_suppression_file, load_suppressions};
pub use document::{SuppressionDocument, SuppressionEntry, parse_suppressions};
pub use error::SuppressionError;
pub use resolve::{SuppressionLines, resolve};

pub type Result<T> = std::result::Result<T, SuppressionError>;
