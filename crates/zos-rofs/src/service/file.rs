//! File handle capability.

use alloc::string::String;
use alloc::vec::Vec;

use crate::core::{ErrorKind, FileInfo, FsError, SeekFrom};

/// An open file or directory handle.
///
/// End of file is reported as `Ok(0)` from [`read`](File::read). A failed
/// write returns `Err` and affects zero bytes.
pub trait File {
    /// Name the handle was opened with.
    fn name(&self) -> &str;

    /// Read into `buf` from the current position, advancing it.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError>;

    /// Read into `buf` starting at `offset`. Does not move the position.
    /// Returns a short count at end of file.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, FsError>;

    /// Write `buf` at the current position, advancing it.
    fn write(&mut self, buf: &[u8]) -> Result<usize, FsError>;

    /// Write `buf` at `offset`. Does not move the position.
    fn write_at(&mut self, buf: &[u8], offset: u64) -> Result<usize, FsError>;

    /// Write a UTF-8 string.
    fn write_str(&mut self, s: &str) -> Result<usize, FsError> {
        self.write(s.as_bytes())
    }

    /// Move the position. Returns the new absolute offset.
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, FsError>;

    /// Metadata of the open entry.
    fn stat(&self) -> Result<FileInfo, FsError>;

    /// Flush buffered writes to the store.
    fn sync(&mut self) -> Result<(), FsError>;

    /// List directory entries. `None` returns everything remaining;
    /// `Some(n)` returns at most `n` and an empty list once exhausted.
    fn read_dir(&mut self, limit: Option<usize>) -> Result<Vec<FileInfo>, FsError>;

    /// List directory entry names, with the same cursor as [`read_dir`](File::read_dir).
    fn read_dir_names(&mut self, limit: Option<usize>) -> Result<Vec<String>, FsError> {
        Ok(self
            .read_dir(limit)?
            .into_iter()
            .map(|info| info.name)
            .collect())
    }

    /// Resize the file.
    fn truncate(&mut self, size: u64) -> Result<(), FsError>;

    /// Release the handle.
    fn close(self) -> Result<(), FsError>
    where
        Self: Sized;

    /// Read until end of file, appending to `buf`. Returns the byte count read.
    fn read_to_end(&mut self, buf: &mut Vec<u8>) -> Result<usize, FsError> {
        let mut chunk = [0u8; 512];
        let mut total = 0;
        loop {
            match self.read(&mut chunk)? {
                0 => return Ok(total),
                n => {
                    buf.extend_from_slice(&chunk[..n]);
                    total += n;
                }
            }
        }
    }

    /// Write all of `buf`, retrying short writes.
    fn write_all(&mut self, mut buf: &[u8]) -> Result<(), FsError> {
        while !buf.is_empty() {
            match self.write(buf)? {
                0 => {
                    return Err(FsError::path(
                        "write",
                        self.name(),
                        ErrorKind::Other(String::from("short write")),
                    ))
                }
                n => buf = &buf[n..],
            }
        }
        Ok(())
    }
}
