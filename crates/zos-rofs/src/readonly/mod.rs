//! Read-only enforcement layer
//!
//! [`ReadOnlyFs`] wraps a store, [`ReadOnlyFile`] wraps the handles it opens,
//! and [`policy`] holds the read/write partition they both apply.

mod file;
mod fs;
pub mod policy;

pub use file::ReadOnlyFile;
pub use fs::ReadOnlyFs;
