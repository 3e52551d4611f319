//! Filesystem capability interface

mod file;
mod helpers;
mod trait_def;

pub use file::File;
pub use helpers::write_file;
pub use trait_def::{FileSystem, Filer, SymlinkFileSystem};
