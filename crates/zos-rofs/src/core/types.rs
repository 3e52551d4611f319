//! Core types for the filesystem capability interface.
//!
//! Defines open flags, file modes, and the metadata record returned by `stat`.

use alloc::string::String;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Mask selecting the access-mode sub-field of [`OpenFlags`].
pub const ACCESS_MODE_MASK: u32 = 0b11;

bitflags! {
    /// Flags passed to `open_file`.
    ///
    /// The low two bits hold the access mode (`RDONLY`, `WRONLY` or `RDWR`).
    /// Every other bit is auxiliary behavior that only the backing store
    /// interprets. Values follow the Linux `open(2)` numbering.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct OpenFlags: u32 {
        /// Open for reading only (access mode 0).
        const RDONLY = 0;
        /// Open for writing only.
        const WRONLY = 0o1;
        /// Open for reading and writing.
        const RDWR = 0o2;
        /// Create the file if it does not exist.
        const CREATE = 0o100;
        /// With `CREATE`, fail if the file exists.
        const EXCL = 0o200;
        /// Truncate a regular writable file on open.
        const TRUNC = 0o1000;
        /// Writes append to the end of the file.
        const APPEND = 0o2000;
        /// Synchronous I/O.
        const SYNC = 0o4010000;
    }
}

impl OpenFlags {
    /// Raw value of the access-mode sub-field.
    pub const fn access_bits(self) -> u32 {
        self.bits() & ACCESS_MODE_MASK
    }

    /// Decode the access-mode sub-field. `None` for the reserved value 3.
    pub const fn access_mode(self) -> Option<AccessMode> {
        match self.access_bits() {
            0 => Some(AccessMode::ReadOnly),
            1 => Some(AccessMode::WriteOnly),
            2 => Some(AccessMode::ReadWrite),
            _ => None,
        }
    }

    /// Whether the access mode permits writing through the handle.
    pub const fn is_writable(self) -> bool {
        matches!(
            self.access_mode(),
            Some(AccessMode::WriteOnly) | Some(AccessMode::ReadWrite)
        )
    }
}

/// Access mode encoded in the low bits of [`OpenFlags`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// `RDONLY`
    ReadOnly,
    /// `WRONLY`
    WriteOnly,
    /// `RDWR`
    ReadWrite,
}

/// Unix permission bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileMode(u32);

impl FileMode {
    /// Create a mode from raw bits.
    pub const fn new(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Permission bits only (`0o777`).
    pub const fn perm(self) -> u32 {
        self.0 & 0o777
    }
}

impl From<u32> for FileMode {
    fn from(bits: u32) -> Self {
        Self(bits)
    }
}

/// Type of filesystem entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileType {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
}

/// Metadata describing a filesystem entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Base name of the entry
    pub name: String,

    /// Size in bytes (0 for directories, target length for symlinks)
    pub size: u64,

    /// Permission bits
    pub mode: FileMode,

    /// Entry type
    pub file_type: FileType,

    /// Last modification timestamp (nanos since epoch)
    pub modified_at: u64,

    /// Last access timestamp (nanos since epoch)
    pub accessed_at: u64,

    /// Owner user id
    pub uid: u32,

    /// Owner group id
    pub gid: u32,
}

impl FileInfo {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self.file_type, FileType::Directory)
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self.file_type, FileType::File)
    }

    /// Check if this is a symlink.
    pub fn is_symlink(&self) -> bool {
        matches!(self.file_type, FileType::Symlink)
    }
}

/// Seek origin for [`File::seek`](crate::File::seek).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekFrom {
    /// Absolute offset from the start
    Start(u64),
    /// Relative to the current position
    Current(i64),
    /// Relative to the end of the file
    End(i64),
}

/// Entry produced by a recursive directory walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalkEntry {
    /// Full path of the entry
    pub path: String,
    /// Metadata of the entry itself (links are not followed)
    pub info: FileInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_mode_decoding() {
        assert_eq!(OpenFlags::RDONLY.access_mode(), Some(AccessMode::ReadOnly));
        assert_eq!(OpenFlags::WRONLY.access_mode(), Some(AccessMode::WriteOnly));
        assert_eq!(OpenFlags::RDWR.access_mode(), Some(AccessMode::ReadWrite));
        assert_eq!(OpenFlags::from_bits_retain(0b11).access_mode(), None);

        let flags = OpenFlags::RDONLY | OpenFlags::APPEND | OpenFlags::CREATE | OpenFlags::TRUNC;
        assert_eq!(flags.access_mode(), Some(AccessMode::ReadOnly));

        let flags = OpenFlags::WRONLY | OpenFlags::CREATE;
        assert_eq!(flags.access_mode(), Some(AccessMode::WriteOnly));
    }

    #[test]
    fn test_unknown_bits_are_retained() {
        let flags = OpenFlags::from_bits_retain(0o40000 | OpenFlags::APPEND.bits());
        assert_eq!(flags.bits(), 0o40000 | 0o2000);
        assert_eq!(flags.access_mode(), Some(AccessMode::ReadOnly));
    }

    #[test]
    fn test_is_writable() {
        assert!(!OpenFlags::RDONLY.is_writable());
        assert!(!(OpenFlags::RDONLY | OpenFlags::APPEND).is_writable());
        assert!(OpenFlags::WRONLY.is_writable());
        assert!((OpenFlags::RDWR | OpenFlags::TRUNC).is_writable());
    }

    #[test]
    fn test_file_mode() {
        let mode = FileMode::new(0o100644);
        assert_eq!(mode.perm(), 0o644);
        assert_eq!(mode.bits(), 0o100644);
        assert_eq!(FileMode::from(0o755).perm(), 0o755);
    }

    #[test]
    fn test_file_info_predicates() {
        let info = FileInfo {
            name: String::from("docs"),
            size: 0,
            mode: FileMode::new(0o755),
            file_type: FileType::Directory,
            modified_at: 1000,
            accessed_at: 1000,
            uid: 0,
            gid: 0,
        };
        assert!(info.is_dir());
        assert!(!info.is_file());
        assert!(!info.is_symlink());
    }
}
