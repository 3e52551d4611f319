//! Core filesystem types and utilities

mod error;
mod path;
mod types;

pub use error::{ErrorKind, FsError};
pub use path::{
    base_name, is_under, join_path, normalize_path, parent_path, resolve_path, LIST_SEPARATOR,
    SEPARATOR,
};
pub use types::{
    AccessMode, FileInfo, FileMode, FileType, OpenFlags, SeekFrom, WalkEntry, ACCESS_MODE_MASK,
};
