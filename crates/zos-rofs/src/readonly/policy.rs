//! Rejection policy and policy error construction.
//!
//! Mutating operations are answered here, without touching the backing
//! store, using the error shape a native store would produce for the same
//! operation. Everything not listed in [`Operation`] is forwarded.

use crate::core::{ErrorKind, FsError, OpenFlags};

/// Operations the read-only layer rejects, by native name.
///
/// `Open` is rejected only when write access is requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    // Store
    Open,
    Create,
    Mkdir,
    MkdirAll,
    Remove,
    RemoveAll,
    Rename,
    Truncate,
    Chmod,
    Chtimes,
    Chown,
    Lchown,
    Symlink,
    // Handle
    Write,
    WriteAt,
    WriteString,
    FileTruncate,
}

impl Operation {
    /// Name used in errors and logs. Handle writes all report "write".
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Open | Operation::Create => "open",
            Operation::Mkdir => "mkdir",
            Operation::MkdirAll => "mkdirall",
            Operation::Remove => "remove",
            Operation::RemoveAll => "removeall",
            Operation::Rename => "rename",
            Operation::Truncate => "truncate",
            Operation::Chmod => "chmod",
            Operation::Chtimes => "chtimes",
            Operation::Chown => "chown",
            Operation::Lchown => "lchown",
            Operation::Symlink => "symlink",
            Operation::Write
            | Operation::WriteAt
            | Operation::WriteString
            | Operation::FileTruncate => "write",
        }
    }
}

/// Gate for `open_file`: only the access-mode sub-field is inspected.
///
/// `RDONLY | CREATE` and `RDONLY | TRUNC` pass and reach the backing store
/// unchanged; what the store does with those bits is its own business.
/// A stricter policy would also reject `CREATE`, `TRUNC` and `APPEND` here.
pub fn check_open(path: &str, flags: OpenFlags) -> Result<(), FsError> {
    if flags.access_bits() == OpenFlags::RDONLY.bits() {
        return Ok(());
    }

    tracing::debug!(
        op = Operation::Open.as_str(),
        path,
        flags = flags.bits(),
        "open rejected: write access requested on read-only filesystem"
    );
    Err(FsError::path(Operation::Open.as_str(), path, ErrorKind::PermissionDenied))
}

/// Bare sentinel, for single-path metadata and tree operations.
pub fn deny(op: Operation, path: &str) -> FsError {
    tracing::debug!(op = op.as_str(), path, "rejected on read-only filesystem");
    FsError::Kind(ErrorKind::PermissionDenied)
}

/// Single-path shape: `create`, `lchown`, and every handle write.
pub fn deny_path(op: Operation, path: &str) -> FsError {
    tracing::debug!(op = op.as_str(), path, "rejected on read-only filesystem");
    FsError::path(op.as_str(), path, ErrorKind::PermissionDenied)
}

/// Two-path shape: `rename` and `symlink`.
pub fn deny_link(op: Operation, old: &str, new: &str) -> FsError {
    tracing::debug!(op = op.as_str(), old, new, "rejected on read-only filesystem");
    FsError::link(op.as_str(), old, new, ErrorKind::PermissionDenied)
}
