//! Read-only store wrapper.

use alloc::string::String;
use alloc::vec::Vec;

use super::file::ReadOnlyFile;
use super::policy::{check_open, deny, deny_link, deny_path, Operation};
use crate::core::{FileInfo, FileMode, FsError, OpenFlags, WalkEntry};
use crate::service::{FileSystem, Filer, SymlinkFileSystem};

/// Read-only view over a backing store.
///
/// `ReadOnlyFs<B>` implements whichever capability tiers `B` implements:
/// [`Filer`], [`FileSystem`], and [`SymlinkFileSystem`]. Observing
/// operations are forwarded and their results returned untouched. Mutating
/// operations fail with [`ErrorKind::PermissionDenied`](crate::ErrorKind)
/// before the backing store is called.
///
/// The wrapper holds no state besides the backing store and never exposes it.
#[derive(Debug)]
pub struct ReadOnlyFs<B> {
    inner: B,
}

impl<B> ReadOnlyFs<B> {
    /// Wrap a backing store.
    pub fn new(inner: B) -> Self {
        tracing::debug!(
            backing = ::core::any::type_name::<B>(),
            "wrapping backing store as read-only"
        );
        Self { inner }
    }
}

impl<B: Filer> Filer for ReadOnlyFs<B> {
    type File = ReadOnlyFile<B::File>;

    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        perm: FileMode,
    ) -> Result<Self::File, FsError> {
        check_open(path, flags)?;
        self.inner.open_file(path, flags, perm).map(ReadOnlyFile::new)
    }

    fn mkdir(&self, path: &str, _perm: FileMode) -> Result<(), FsError> {
        Err(deny(Operation::Mkdir, path))
    }

    fn remove(&self, path: &str) -> Result<(), FsError> {
        Err(deny(Operation::Remove, path))
    }

    fn rename(&self, old: &str, new: &str) -> Result<(), FsError> {
        Err(deny_link(Operation::Rename, old, new))
    }

    fn stat(&self, path: &str) -> Result<FileInfo, FsError> {
        self.inner.stat(path)
    }

    fn chmod(&self, path: &str, _mode: FileMode) -> Result<(), FsError> {
        Err(deny(Operation::Chmod, path))
    }

    fn chtimes(&self, path: &str, _atime: u64, _mtime: u64) -> Result<(), FsError> {
        Err(deny(Operation::Chtimes, path))
    }

    fn chown(&self, path: &str, _uid: u32, _gid: u32) -> Result<(), FsError> {
        Err(deny(Operation::Chown, path))
    }
}

impl<B: FileSystem> FileSystem for ReadOnlyFs<B> {
    fn mkdir_all(&self, path: &str, _perm: FileMode) -> Result<(), FsError> {
        Err(deny(Operation::MkdirAll, path))
    }

    fn remove_all(&self, path: &str) -> Result<(), FsError> {
        Err(deny(Operation::RemoveAll, path))
    }

    fn truncate(&self, path: &str, _size: u64) -> Result<(), FsError> {
        Err(deny(Operation::Truncate, path))
    }

    // The working directory belongs to the backing store; it is never
    // cached here.
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

    fn open(&self, path: &str) -> Result<Self::File, FsError> {
        self.inner.open(path).map(ReadOnlyFile::new)
    }

    fn create(&self, path: &str) -> Result<Self::File, FsError> {
        Err(deny_path(Operation::Create, path))
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

impl<B: SymlinkFileSystem> SymlinkFileSystem for ReadOnlyFs<B> {
    fn lstat(&self, path: &str) -> Result<FileInfo, FsError> {
        self.inner.lstat(path)
    }

    fn lchown(&self, path: &str, _uid: u32, _gid: u32) -> Result<(), FsError> {
        Err(deny_path(Operation::Lchown, path))
    }

    fn readlink(&self, path: &str) -> Result<String, FsError> {
        self.inner.readlink(path)
    }

    fn symlink(&self, old: &str, new: &str) -> Result<(), FsError> {
        Err(deny_link(Operation::Symlink, old, new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorKind;
    use crate::service::{write_file, File};
    use crate::testing::{MemoryFs, PlainFs};

    /// Store exposing only the minimal [`Filer`] tier.
    struct FilerOnly(MemoryFs);

    impl Filer for FilerOnly {
        type File = crate::testing::MemoryFile;

        fn open_file(
            &self,
            path: &str,
            flags: OpenFlags,
            perm: FileMode,
        ) -> Result<Self::File, FsError> {
            self.0.open_file(path, flags, perm)
        }

        fn mkdir(&self, path: &str, perm: FileMode) -> Result<(), FsError> {
            self.0.mkdir(path, perm)
        }

        fn remove(&self, path: &str) -> Result<(), FsError> {
            self.0.remove(path)
        }

        fn rename(&self, old: &str, new: &str) -> Result<(), FsError> {
            self.0.rename(old, new)
        }

        fn stat(&self, path: &str) -> Result<FileInfo, FsError> {
            self.0.stat(path)
        }

        fn chmod(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
            self.0.chmod(path, mode)
        }

        fn chtimes(&self, path: &str, atime: u64, mtime: u64) -> Result<(), FsError> {
            self.0.chtimes(path, atime, mtime)
        }

        fn chown(&self, path: &str, uid: u32, gid: u32) -> Result<(), FsError> {
            self.0.chown(path, uid, gid)
        }
    }

    fn fixture() -> (MemoryFs, ReadOnlyFs<MemoryFs>) {
        let backing = MemoryFs::new();
        backing.mkdir_all("/testdir/subdir", FileMode::new(0o755)).unwrap();
        write_file(&backing, "/testdir/file.txt", b"test content", FileMode::new(0o644))
            .unwrap();
        backing.symlink("/testdir/file.txt", "/testdir/link.txt").unwrap();
        let rofs = ReadOnlyFs::new(backing.clone());
        (backing, rofs)
    }

    #[test]
    fn test_bare_sentinel_rejections() {
        let (backing, rofs) = fixture();
        let denied = FsError::Kind(ErrorKind::PermissionDenied);

        assert_eq!(rofs.mkdir("/newdir", FileMode::new(0o755)), Err(denied.clone()));
        assert_eq!(rofs.mkdir_all("/a/b/c", FileMode::new(0o755)), Err(denied.clone()));
        assert_eq!(rofs.remove("/testdir/file.txt"), Err(denied.clone()));
        assert_eq!(rofs.remove_all("/testdir"), Err(denied.clone()));
        assert_eq!(rofs.truncate("/testdir/file.txt", 0), Err(denied.clone()));
        assert_eq!(rofs.chmod("/testdir/file.txt", FileMode::new(0o600)), Err(denied.clone()));
        assert_eq!(rofs.chtimes("/testdir/file.txt", 1, 2), Err(denied.clone()));
        assert_eq!(rofs.chown("/testdir/file.txt", 1000, 1000), Err(denied));

        assert!(backing.stat("/newdir").unwrap_err().is_not_found());
        assert!(backing.stat("/a").unwrap_err().is_not_found());
        assert_eq!(backing.read_file("/testdir/file.txt").unwrap(), b"test content");
        assert_eq!(backing.stat("/testdir/file.txt").unwrap().mode.perm(), 0o644);
    }

    #[test]
    fn test_shaped_rejections() {
        let (backing, rofs) = fixture();

        assert_eq!(
            rofs.rename("/testdir/file.txt", "/testdir/renamed.txt"),
            Err(FsError::link(
                "rename",
                "/testdir/file.txt",
                "/testdir/renamed.txt",
                ErrorKind::PermissionDenied
            ))
        );
        assert_eq!(
            rofs.symlink("/c", "/d"),
            Err(FsError::link("symlink", "/c", "/d", ErrorKind::PermissionDenied))
        );
        assert_eq!(
            rofs.lchown("/testdir/link.txt", 1000, 1000),
            Err(FsError::path("lchown", "/testdir/link.txt", ErrorKind::PermissionDenied))
        );
        assert_eq!(
            rofs.create("/x").unwrap_err(),
            FsError::path("open", "/x", ErrorKind::PermissionDenied)
        );

        assert!(backing.lstat("/d").unwrap_err().is_not_found());
        assert!(backing.stat("/x").unwrap_err().is_not_found());
        assert!(backing.stat("/testdir/renamed.txt").unwrap_err().is_not_found());
        assert_eq!(backing.lstat("/testdir/link.txt").unwrap().uid, 0);
    }

    #[test]
    fn test_observations_pass_through() {
        let (backing, rofs) = fixture();

        assert_eq!(rofs.stat("/testdir/file.txt"), backing.stat("/testdir/file.txt"));
        assert_eq!(rofs.lstat("/testdir/link.txt"), backing.lstat("/testdir/link.txt"));
        assert_eq!(rofs.readlink("/testdir/link.txt").unwrap(), "/testdir/file.txt");
        assert_eq!(rofs.read_dir("/testdir"), backing.read_dir("/testdir"));
        assert_eq!(rofs.read_file("/testdir/file.txt").unwrap(), b"test content");
        assert_eq!(rofs.walk("/"), backing.walk("/"));
        assert_eq!(rofs.temp_dir(), backing.temp_dir());
        assert_eq!(rofs.separator(), '/');
        assert_eq!(rofs.list_separator(), ':');
    }

    #[test]
    fn test_backing_errors_propagate_unchanged() {
        let (backing, rofs) = fixture();

        assert_eq!(rofs.stat("/missing").unwrap_err(), backing.stat("/missing").unwrap_err());
        assert_eq!(
            rofs.open("/missing").unwrap_err(),
            FsError::path("open", "/missing", ErrorKind::NotFound)
        );
        assert_eq!(
            rofs.readlink("/testdir/file.txt").unwrap_err(),
            backing.readlink("/testdir/file.txt").unwrap_err()
        );
        assert!(!rofs.chdir("/nonexistent").unwrap_err().is_permission_denied());
    }

    #[test]
    fn test_open_wraps_handle() {
        let (_backing, rofs) = fixture();

        let mut file = rofs
            .open_file(
                "/testdir/file.txt",
                OpenFlags::RDONLY | OpenFlags::APPEND,
                FileMode::default(),
            )
            .unwrap();
        let mut buf = [0u8; 100];
        let n = file.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"test content");
        assert!(file.write(b"x").unwrap_err().is_permission_denied());
        file.close().unwrap();

        let err = rofs
            .open_file("/testdir/file.txt", OpenFlags::RDWR, FileMode::default())
            .unwrap_err();
        assert_eq!(err, FsError::path("open", "/testdir/file.txt", ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_working_directory_is_backing_state() {
        let (backing, rofs) = fixture();

        rofs.chdir("/testdir").unwrap();
        assert_eq!(rofs.getwd().unwrap(), "/testdir");
        assert_eq!(backing.getwd().unwrap(), "/testdir");

        backing.chdir("/").unwrap();
        assert_eq!(rofs.getwd().unwrap(), "/");
    }

    #[test]
    fn test_base_capability_variant() {
        let (backing, _) = fixture();
        let rofs = ReadOnlyFs::new(PlainFs::new(backing.clone()));

        assert_eq!(rofs.read_file("/testdir/file.txt").unwrap(), b"test content");
        assert!(rofs.mkdir("/nope", FileMode::new(0o755)).unwrap_err().is_permission_denied());
        assert!(rofs.create("/nope").unwrap_err().is_permission_denied());
        assert!(backing.stat("/nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_minimal_capability_variant() {
        let (backing, _) = fixture();
        let rofs = ReadOnlyFs::new(FilerOnly(backing.clone()));
        let denied = FsError::Kind(ErrorKind::PermissionDenied);

        let mut file = rofs
            .open_file("/testdir/file.txt", OpenFlags::RDONLY, FileMode::default())
            .unwrap();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        assert_eq!(data, b"test content");
        assert!(file.write(b"x").unwrap_err().is_permission_denied());
        file.close().unwrap();

        assert_eq!(rofs.stat("/testdir/file.txt"), backing.stat("/testdir/file.txt"));
        assert!(rofs.stat("/missing").unwrap_err().is_not_found());

        let create = OpenFlags::WRONLY | OpenFlags::CREATE;
        let err = rofs.open_file("/testdir/new.txt", create, FileMode::default()).unwrap_err();
        assert!(err.is_permission_denied());
        assert_eq!(rofs.mkdir("/nope", FileMode::new(0o755)), Err(denied.clone()));
        assert_eq!(rofs.remove("/testdir/file.txt"), Err(denied.clone()));
        assert_eq!(rofs.chmod("/testdir/file.txt", FileMode::new(0o600)), Err(denied.clone()));
        assert_eq!(rofs.chtimes("/testdir/file.txt", 1, 2), Err(denied.clone()));
        assert_eq!(rofs.chown("/testdir/file.txt", 1, 1), Err(denied));
        assert!(rofs.rename("/testdir", "/moved").unwrap_err().is_permission_denied());

        assert!(backing.stat("/testdir/new.txt").unwrap_err().is_not_found());
        assert!(backing.stat("/nope").unwrap_err().is_not_found());
        assert_eq!(backing.stat("/testdir/file.txt").unwrap().mode.perm(), 0o644);
        assert!(backing.stat("/testdir").unwrap().is_dir());
    }
}
