//! Pass-through adapter without symlink support.

use alloc::string::String;
use alloc::vec::Vec;

use crate::core::{FileInfo, FileMode, FsError, OpenFlags, WalkEntry};
use crate::service::{FileSystem, Filer};

/// Exposes only the [`Filer`] and [`FileSystem`] capabilities of `B`.
///
/// Useful for exercising code against a store that has no symlink support.
#[derive(Clone, Debug)]
pub struct PlainFs<B> {
    inner: B,
}

impl<B> PlainFs<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

impl<B: FileSystem> Filer for PlainFs<B> {
    type File = B::File;

    fn open_file(&self, path: &str, flags: OpenFlags, perm: FileMode) -> Result<B::File, FsError> {
        self.inner.open_file(path, flags, perm)
    }

    fn mkdir(&self, path: &str, perm: FileMode) -> Result<(), FsError> {
        self.inner.mkdir(path, perm)
    }

    fn remove(&self, path: &str) -> Result<(), FsError> {
        self.inner.remove(path)
    }

    fn rename(&self, old: &str, new: &str) -> Result<(), FsError> {
        self.inner.rename(old, new)
    }

    fn stat(&self, path: &str) -> Result<FileInfo, FsError> {
        self.inner.stat(path)
    }

    fn chmod(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
        self.inner.chmod(path, mode)
    }

    fn chtimes(&self, path: &str, atime: u64, mtime: u64) -> Result<(), FsError> {
        self.inner.chtimes(path, atime, mtime)
    }

    fn chown(&self, path: &str, uid: u32, gid: u32) -> Result<(), FsError> {
        self.inner.chown(path, uid, gid)
    }
}

impl<B: FileSystem> FileSystem for PlainFs<B> {
    fn mkdir_all(&self, path: &str, perm: FileMode) -> Result<(), FsError> {
        self.inner.mkdir_all(path, perm)
    }

    fn remove_all(&self, path: &str) -> Result<(), FsError> {
        self.inner.remove_all(path)
    }

    fn truncate(&self, path: &str, size: u64) -> Result<(), FsError> {
        self.inner.truncate(path, size)
    }

    fn chdir(&self, dir: &str) -> Result<(), FsError> {
        self.inner.chdir(dir)
    }

    fn getwd(&self) -> Result<String, FsError> {
        self.inner.getwd()
    }

    fn temp_dir(&self) -> String {
        self.inner.temp_dir()
    }

    fn separator(&self) -> char {
        self.inner.separator()
    }

    fn list_separator(&self) -> char {
        self.inner.list_separator()
    }

    fn open(&self, path: &str) -> Result<B::File, FsError> {
        self.inner.open(path)
    }

    fn create(&self, path: &str) -> Result<B::File, FsError> {
        self.inner.create(path)
    }

    fn read_dir(&self, path: &str) -> Result<Vec<FileInfo>, FsError> {
        self.inner.read_dir(path)
    }

    fn read_file(&self, path: &str) -> Result<Vec<u8>, FsError> {
        self.inner.read_file(path)
    }

    fn walk(&self, root: &str) -> Result<Vec<WalkEntry>, FsError> {
        self.inner.walk(root)
    }
}
