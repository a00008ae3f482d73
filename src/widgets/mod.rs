//! Widgets built on the truncation runtime.

pub mod truncate_multiline;
pub mod truncate_options;

pub use truncate_multiline::{CommitReport, TruncateMultiline};
pub use truncate_options::TruncateOptions;
