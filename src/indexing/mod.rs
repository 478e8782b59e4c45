//! File discovery and batch parsing

pub mod batch;
pub mod walker;

pub use batch::{BatchParser, BatchSummary, FileListing, read_source};
pub use walker::FileWalker;
