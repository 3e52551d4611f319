//! Read-only file handle.

use alloc::string::String;
use alloc::vec::Vec;

use super::policy::{deny_path, Operation};
use crate::core::{FileInfo, FsError, SeekFrom};
use crate::service::File;

/// Handle returned by [`ReadOnlyFs`](super::ReadOnlyFs) opens.
///
/// Reads, seeks, stat and directory listing go to the backing handle.
/// Writes and truncation fail with a `write` error naming the handle.
#[derive(Debug)]
pub struct ReadOnlyFile<F> {
    inner: F,
}

impl<F: File> ReadOnlyFile<F> {
    pub(crate) fn new(inner: F) -> Self {
        Self { inner }
    }

    fn deny(&self, op: Operation) -> FsError {
        deny_path(op, self.inner.name())
    }
}

impl<F: File> File for ReadOnlyFile<F> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        self.inner.read(buf)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, FsError> {
        self.inner.read_at(buf, offset)
    }

    fn write(&mut self, _buf: &[u8]) -> Result<usize, FsError> {
        Err(self.deny(Operation::Write))
    }

    fn write_at(&mut self, _buf: &[u8], _offset: u64) -> Result<usize, FsError> {
        Err(self.deny(Operation::WriteAt))
    }

    fn write_str(&mut self, _s: &str) -> Result<usize, FsError> {
        Err(self.deny(Operation::WriteString))
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, FsError> {
        self.inner.seek(pos)
    }

    fn stat(&self) -> Result<FileInfo, FsError> {
        self.inner.stat()
    }

    // Nothing can have been written through this handle.
    fn sync(&mut self) -> Result<(), FsError> {
        Ok(())
    }

    fn read_dir(&mut self, limit: Option<usize>) -> Result<Vec<FileInfo>, FsError> {
        self.inner.read_dir(limit)
    }

    fn read_dir_names(&mut self, limit: Option<usize>) -> Result<Vec<String>, FsError> {
        self.inner.read_dir_names(limit)
    }

    fn truncate(&mut self, _size: u64) -> Result<(), FsError> {
        Err(self.deny(Operation::FileTruncate))
    }

    fn close(self) -> Result<(), FsError> {
        self.inner.close()
    }
}
