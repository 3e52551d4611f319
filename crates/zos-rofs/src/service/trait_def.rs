//! Filesystem capability traits.
//!
//! Three tiers, each extending the previous one:
//!
//! - [`Filer`]: open, metadata, and the basic tree mutations
//! - [`FileSystem`]: working directory, recursive operations, conveniences
//! - [`SymlinkFileSystem`]: symbolic link operations

use alloc::string::String;
use alloc::vec::Vec;

use super::file::File;
use crate::core::{
    join_path, FileInfo, FileMode, FsError, OpenFlags, WalkEntry, LIST_SEPARATOR, SEPARATOR,
};

/// Minimal filesystem capability.
pub trait Filer {
    /// Handle type returned by [`open_file`](Filer::open_file).
    type File: File;

    // ========== Open ==========

    /// Open a file with the given flags, creating it with `perm` when asked to.
    fn open_file(&self, path: &str, flags: OpenFlags, perm: FileMode)
        -> Result<Self::File, FsError>;

    // ========== Tree Operations ==========

    /// Create a directory.
    fn mkdir(&self, path: &str, perm: FileMode) -> Result<(), FsError>;

    /// Remove a file or an empty directory.
    fn remove(&self, path: &str) -> Result<(), FsError>;

    /// Rename/move a file or directory.
    fn rename(&self, old: &str, new: &str) -> Result<(), FsError>;

    // ========== Metadata Operations ==========

    /// Get metadata, following symlinks.
    fn stat(&self, path: &str) -> Result<FileInfo, FsError>;

    /// Change permission bits.
    fn chmod(&self, path: &str, mode: FileMode) -> Result<(), FsError>;

    /// Change access and modification times (nanos since epoch).
    fn chtimes(&self, path: &str, atime: u64, mtime: u64) -> Result<(), FsError>;

    /// Change owner and group.
    fn chown(&self, path: &str, uid: u32, gid: u32) -> Result<(), FsError>;
}

/// Full filesystem capability.
pub trait FileSystem: Filer {
    /// Create a directory and all missing parents.
    fn mkdir_all(&self, path: &str, perm: FileMode) -> Result<(), FsError>;

    /// Remove a path and everything below it.
    fn remove_all(&self, path: &str) -> Result<(), FsError>;

    /// Resize a file by path.
    fn truncate(&self, path: &str, size: u64) -> Result<(), FsError>;

    // ========== Working Directory ==========

    /// Change the working directory used to resolve relative paths.
    fn chdir(&self, dir: &str) -> Result<(), FsError>;

    /// Current working directory.
    fn getwd(&self) -> Result<String, FsError>;

    /// Directory for temporary files.
    fn temp_dir(&self) -> String;

    /// Path separator.
    fn separator(&self) -> char {
        SEPARATOR
    }

    /// Separator for lists of paths.
    fn list_separator(&self) -> char {
        LIST_SEPARATOR
    }

    // ========== Conveniences ==========

    /// Open a file for reading.
    fn open(&self, path: &str) -> Result<Self::File, FsError> {
        self.open_file(path, OpenFlags::RDONLY, FileMode::default())
    }

    /// Create or truncate a file, opened for reading and writing.
    fn create(&self, path: &str) -> Result<Self::File, FsError> {
        self.open_file(
            path,
            OpenFlags::RDWR | OpenFlags::CREATE | OpenFlags::TRUNC,
            FileMode::new(0o666),
        )
    }

    /// List a directory, sorted by name.
    fn read_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError> {
        let mut dir = self.open(path)?;
        let mut entries = dir.read_dir(None)?;
        dir.close()?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Read a whole file.
    fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let mut file = self.open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        file.close()?;
        Ok(data)
    }

    /// List every entry below `root`, depth first, sorted by name within
    /// each directory. `root` itself is not included and symlinks are not
    /// followed.
    fn walk(&self, root: &str) -> Result<Vec<WalkEntry>, FsError> {
        let mut out = Vec::new();
        walk_into(self, root, &mut out)?;
        Ok(out)
    }
}

fn walk_into<F: FileSystem + ?Sized>(
    fs: &F,
    dir: &str,
    out: &mut Vec<WalkEntry>,
) -> Result<(), FsError> {
    for info in fs.read_dir(dir)? {
        let path = join_path(dir, &info.name);
        let descend = info.is_dir();
        out.push(WalkEntry {
            path: path.clone(),
            info,
        });
        if descend {
            walk_into(fs, &path, out)?;
        }
    }
    Ok(())
}

/// Filesystem capability with symbolic links.
pub trait SymlinkFileSystem: FileSystem {
    /// Get metadata without following a final symlink.
    fn lstat(&self, path: &str) -> Result<FileInfo, FsError>;

    /// Change owner and group of a symlink itself.
    fn lchown(&self, path: &str, uid: u32, gid: u32) -> Result<(), FsError>;

    /// Destination of a symlink.
    fn readlink(&self, path: &str) -> Result<String, FsError>;

    /// Create `new` as a symlink pointing at `old`.
    fn symlink(&self, old: &str, new: &str) -> Result<(), FsError>;
}
