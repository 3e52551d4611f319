//! In-memory stores for tests and examples.

mod memory_fs;
mod plain;

pub use memory_fs::{MemoryFile, MemoryFs};
pub use plain::PlainFs;
