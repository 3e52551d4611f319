//! Error types for the read-only filesystem layer.
//!
//! Errors come in three shapes, matching what a native store reports:
//! a bare cause, a single-path error, and a two-path (link) error.
//! Policy rejections and backing-store failures share this type; callers
//! tell them apart by inspecting [`FsError::kind`].

use alloc::string::String;
use serde::{Deserialize, Serialize};

/// Underlying cause of a filesystem error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ErrorKind {
    /// Operation not permitted. Every policy rejection carries this cause.
    #[error("permission denied")]
    PermissionDenied,

    /// Path does not exist
    #[error("file does not exist")]
    NotFound,

    /// Path already exists
    #[error("file already exists")]
    AlreadyExists,

    /// A directory was required
    #[error("not a directory")]
    NotADirectory,

    /// A file was required but the path names a directory
    #[error("is a directory")]
    IsADirectory,

    /// Directory still has entries
    #[error("directory not empty")]
    DirectoryNotEmpty,

    /// Invalid argument (negative seek, non-link readlink, ...)
    #[error("invalid argument: {0}")]
    InvalidInput(String),

    /// Malformed path
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Anything a backing store cannot classify more precisely
    #[error("{0}")]
    Other(String),
}

/// Errors from filesystem operations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum FsError {
    /// A bare cause with no operation or path attached.
    #[error(transparent)]
    Kind(#[from] ErrorKind),

    /// An operation on a single path failed.
    #[error("{op} {path}: {kind}")]
    Path {
        /// Operation name ("open", "write", "lchown", ...)
        op: String,
        /// Path the operation was applied to
        path: String,
        /// Cause
        #[source]
        kind: ErrorKind,
    },

    /// An operation involving two paths failed (rename, symlink).
    #[error("{op} {old} {new}: {kind}")]
    Link {
        /// Operation name ("rename", "symlink")
        op: String,
        /// Source path (rename) or link target (symlink)
        old: String,
        /// Destination path (rename) or link location (symlink)
        new: String,
        /// Cause
        #[source]
        kind: ErrorKind,
    },
}

impl FsError {
    /// Create a single-path error.
    pub fn path(op: impl Into<String>, path: impl Into<String>, kind: ErrorKind) -> Self {
        Self::Path {
            op: op.into(),
            path: path.into(),
            kind,
        }
    }

    /// Create a two-path error.
    pub fn link(
        op: impl Into<String>,
        old: impl Into<String>,
        new: impl Into<String>,
        kind: ErrorKind,
    ) -> Self {
        Self::Link {
            op: op.into(),
            old: old.into(),
            new: new.into(),
            kind,
        }
    }

    /// The cause, regardless of shape.
    pub fn kind(&self) -> &ErrorKind {
        match self {
            FsError::Kind(kind) => kind,
            FsError::Path { kind, .. } | FsError::Link { kind, .. } => kind,
        }
    }

    /// Operation name, if the error carries one.
    pub fn op(&self) -> Option<&str> {
        match self {
            FsError::Kind(_) => None,
            FsError::Path { op, .. } | FsError::Link { op, .. } => Some(op),
        }
    }

    /// Check if this is a permission error.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.kind(), ErrorKind::PermissionDenied)
    }

    /// Check if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_error_construction() {
        let err = FsError::path("open", "/etc/passwd", ErrorKind::NotFound);
        match err {
            FsError::Path { op, path, kind } => {
                assert_eq!(op, "open");
                assert_eq!(path, "/etc/passwd");
                assert_eq!(kind, ErrorKind::NotFound);
            }
            _ => panic!("Expected Path variant"),
        }

        let err = FsError::link("rename", "/a", "/b", ErrorKind::PermissionDenied);
        match err {
            FsError::Link { op, old, new, kind } => {
                assert_eq!(op, "rename");
                assert_eq!(old, "/a");
                assert_eq!(new, "/b");
                assert_eq!(kind, ErrorKind::PermissionDenied);
            }
            _ => panic!("Expected Link variant"),
        }
    }

    #[test]
    fn test_kind_is_shared_across_shapes() {
        let bare = FsError::from(ErrorKind::PermissionDenied);
        let path = FsError::path("lchown", "/link", ErrorKind::PermissionDenied);
        let link = FsError::link("symlink", "/c", "/d", ErrorKind::PermissionDenied);

        for err in [&bare, &path, &link] {
            assert!(err.is_permission_denied());
            assert!(!err.is_not_found());
            assert_eq!(err.kind(), &ErrorKind::PermissionDenied);
        }

        assert_eq!(bare.op(), None);
        assert_eq!(path.op(), Some("lchown"));
        assert_eq!(link.op(), Some("symlink"));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            FsError::from(ErrorKind::PermissionDenied).to_string(),
            "permission denied"
        );
        assert_eq!(
            FsError::path("write", "/f.txt", ErrorKind::PermissionDenied).to_string(),
            "write /f.txt: permission denied"
        );
        assert_eq!(
            FsError::link("rename", "/a", "/b", ErrorKind::PermissionDenied).to_string(),
            "rename /a /b: permission denied"
        );
        assert_eq!(
            FsError::path("stat", "/x", ErrorKind::InvalidPath("empty".to_string())).to_string(),
            "stat /x: invalid path: empty"
        );
    }

    #[test]
    fn test_source_exposes_cause() {
        use ::core::error::Error;

        let err = FsError::path("open", "/x", ErrorKind::PermissionDenied);
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("permission denied"));
    }

    #[test]
    fn test_is_not_found() {
        assert!(FsError::path("stat", "/missing", ErrorKind::NotFound).is_not_found());
        assert!(FsError::from(ErrorKind::NotFound).is_not_found());
        assert!(!FsError::from(ErrorKind::PermissionDenied).is_not_found());
    }
}
