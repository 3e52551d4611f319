//! In-memory filesystem for testing.
//!
//! Provides a BTreeMap-based store with real handles that doesn't persist
//! data. Clones share state, so a test can keep one clone for inspection and
//! hand another to a wrapper.

use alloc::collections::BTreeMap;
use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::core::{
    base_name, is_under, parent_path, resolve_path, AccessMode, ErrorKind, FileInfo, FileMode,
    FileType, FsError, OpenFlags, SeekFrom,
};
use crate::service::{File, FileSystem, Filer, SymlinkFileSystem};

const MAX_SYMLINK_HOPS: usize = 40;
/// Largest file the store will hold.
const MAX_FILE_SIZE: usize = 64 * 1024 * 1024;
const TEMP_DIR: &str = "/tmp";

#[derive(Clone, Debug)]
enum NodeKind {
    File(Vec<u8>),
    Directory,
    Symlink(String),
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    mode: FileMode,
    uid: u32,
    gid: u32,
    modified_at: u64,
    accessed_at: u64,
}

impl Node {
    fn new(kind: NodeKind, mode: FileMode, now: u64) -> Self {
        Self {
            kind,
            mode,
            uid: 0,
            gid: 0,
            modified_at: now,
            accessed_at: now,
        }
    }

    fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Directory)
    }

    fn info(&self, name: &str) -> FileInfo {
        let (file_type, size) = match &self.kind {
            NodeKind::File(data) => (FileType::File, data.len() as u64),
            NodeKind::Directory => (FileType::Directory, 0),
            NodeKind::Symlink(target) => (FileType::Symlink, target.len() as u64),
        };
        FileInfo {
            name: String::from(name),
            size,
            mode: self.mode,
            file_type,
            modified_at: self.modified_at,
            accessed_at: self.accessed_at,
            uid: self.uid,
            gid: self.gid,
        }
    }
}

#[derive(Debug)]
struct State {
    /// Node storage (absolute path -> node)
    nodes: BTreeMap<String, Node>,
    /// Working directory
    cwd: String,
    /// Current timestamp generator
    now: u64,
}

impl State {
    /// Get current timestamp and advance it.
    fn tick(&mut self) -> u64 {
        let current = self.now;
        self.now += 1;
        current
    }

    fn resolve(&self, path: &str) -> Result<String, ErrorKind> {
        resolve_path(&self.cwd, path)
    }

    /// Follow a final-component symlink chain. Intermediate components are
    /// taken literally.
    fn follow(&self, mut path: String) -> Result<String, ErrorKind> {
        for _ in 0..MAX_SYMLINK_HOPS {
            match self.nodes.get(&path) {
                Some(Node {
                    kind: NodeKind::Symlink(target),
                    ..
                }) => path = resolve_path(&parent_path(&path), target)?,
                _ => return Ok(path),
            }
        }
        Err(ErrorKind::Other(String::from(
            "too many levels of symbolic links",
        )))
    }

    fn lookup(&self, path: &str, follow: bool) -> Result<(String, &Node), ErrorKind> {
        let abs = self.resolve(path)?;
        let abs = if follow { self.follow(abs)? } else { abs };
        match self.nodes.get(&abs) {
            Some(node) => Ok((abs, node)),
            None => Err(ErrorKind::NotFound),
        }
    }

    fn stat(&self, path: &str, follow: bool) -> Result<FileInfo, ErrorKind> {
        let (abs, node) = self.lookup(path, follow)?;
        Ok(node.info(base_name(&abs)))
    }

    fn readlink(&self, path: &str) -> Result<String, ErrorKind> {
        match self.lookup(path, false)? {
            (_, Node {
                kind: NodeKind::Symlink(target),
                ..
            }) => Ok(target.clone()),
            _ => Err(ErrorKind::InvalidInput(String::from("not a symlink"))),
        }
    }

    fn lookup_mut(&mut self, path: &str, follow: bool) -> Result<&mut Node, ErrorKind> {
        let abs = self.resolve(path)?;
        let abs = if follow { self.follow(abs)? } else { abs };
        self.nodes.get_mut(&abs).ok_or(ErrorKind::NotFound)
    }

    /// Check the parent of `abs` exists and is a directory.
    fn check_parent(&self, abs: &str) -> Result<(), ErrorKind> {
        match self.nodes.get(&parent_path(abs)) {
            Some(p) if p.is_dir() => Ok(()),
            Some(_) => Err(ErrorKind::NotADirectory),
            None => Err(ErrorKind::NotFound),
        }
    }

    fn has_children(&self, abs: &str) -> bool {
        self.nodes
            .keys()
            .any(|k| k != abs && is_under(k, abs))
    }

    /// Direct children of a directory, sorted by name.
    fn list(&self, abs: &str) -> Result<Vec<FileInfo>, ErrorKind> {
        match self.nodes.get(abs) {
            Some(n) if n.is_dir() => {}
            Some(_) => return Err(ErrorKind::NotADirectory),
            None => return Err(ErrorKind::NotFound),
        }

        let prefix = if abs == "/" {
            String::from("/")
        } else {
            alloc::format!("{}/", abs)
        };

        Ok(self
            .nodes
            .iter()
            .filter(|(k, _)| {
                if *k == abs || !k.starts_with(&prefix) {
                    return false;
                }
                // Must be direct child (no more slashes after prefix)
                !k[prefix.len()..].contains('/')
            })
            .map(|(k, node)| node.info(&k[prefix.len()..]))
            .collect())
    }

    fn file_data(&self, abs: &str) -> Result<&[u8], ErrorKind> {
        match self.nodes.get(abs) {
            Some(Node {
                kind: NodeKind::File(data),
                ..
            }) => Ok(data),
            Some(Node {
                kind: NodeKind::Directory,
                ..
            }) => Err(ErrorKind::IsADirectory),
            Some(_) => Err(ErrorKind::InvalidInput(String::from("not a regular file"))),
            None => Err(ErrorKind::NotFound),
        }
    }

    fn open(&mut self, path: &str, flags: OpenFlags, perm: FileMode) -> Result<String, ErrorKind> {
        let abs = self.resolve(path)?;
        let abs = self.follow(abs)?;

        match self.nodes.get(&abs).map(Node::is_dir) {
            Some(_) if flags.contains(OpenFlags::CREATE | OpenFlags::EXCL) => {
                Err(ErrorKind::AlreadyExists)
            }
            Some(true) if flags.is_writable() => Err(ErrorKind::IsADirectory),
            Some(_) => {
                if flags.contains(OpenFlags::TRUNC) && flags.is_writable() {
                    let now = self.tick();
                    if let Some(node) = self.nodes.get_mut(&abs) {
                        if let NodeKind::File(data) = &mut node.kind {
                            data.clear();
                            node.modified_at = now;
                        }
                    }
                }
                Ok(abs)
            }
            None if flags.contains(OpenFlags::CREATE) => {
                self.check_parent(&abs)?;
                let now = self.tick();
                self.nodes
                    .insert(abs.clone(), Node::new(NodeKind::File(Vec::new()), perm, now));
                Ok(abs)
            }
            None => Err(ErrorKind::NotFound),
        }
    }

    fn mkdir(&mut self, path: &str, perm: FileMode) -> Result<(), ErrorKind> {
        let abs = self.resolve(path)?;

        if self.nodes.contains_key(&abs) {
            return Err(ErrorKind::AlreadyExists);
        }
        self.check_parent(&abs)?;

        let now = self.tick();
        self.nodes
            .insert(abs, Node::new(NodeKind::Directory, perm, now));
        Ok(())
    }

    fn mkdir_all(&mut self, path: &str, perm: FileMode) -> Result<(), ErrorKind> {
        let abs = self.resolve(path)?;

        let mut current = String::new();
        for component in abs.split('/').filter(|c| !c.is_empty()) {
            current.push('/');
            current.push_str(component);

            match self.nodes.get(&current) {
                Some(n) if n.is_dir() => {}
                Some(_) => return Err(ErrorKind::NotADirectory),
                None => {
                    let now = self.tick();
                    self.nodes
                        .insert(current.clone(), Node::new(NodeKind::Directory, perm, now));
                }
            }
        }
        Ok(())
    }

    fn remove(&mut self, path: &str) -> Result<(), ErrorKind> {
        let abs = self.resolve(path)?;

        if abs == "/" {
            return Err(ErrorKind::PermissionDenied);
        }

        match self.nodes.get(&abs) {
            Some(n) if n.is_dir() && self.has_children(&abs) => {
                Err(ErrorKind::DirectoryNotEmpty)
            }
            Some(_) => {
                self.nodes.remove(&abs);
                Ok(())
            }
            None => Err(ErrorKind::NotFound),
        }
    }

    fn remove_all(&mut self, path: &str) -> Result<(), ErrorKind> {
        let abs = self.resolve(path)?;

        if abs == "/" {
            return Err(ErrorKind::PermissionDenied);
        }

        let to_remove: Vec<String> = self
            .nodes
            .keys()
            .filter(|k| is_under(k, &abs))
            .cloned()
            .collect();
        for key in to_remove {
            self.nodes.remove(&key);
        }
        Ok(())
    }

    fn rename(&mut self, old: &str, new: &str) -> Result<(), ErrorKind> {
        let from = self.resolve(old)?;
        let to = self.resolve(new)?;

        if from == "/" || to == "/" {
            return Err(ErrorKind::InvalidInput(String::from("cannot rename root")));
        }
        if !self.nodes.contains_key(&from) {
            return Err(ErrorKind::NotFound);
        }
        if from == to {
            return Ok(());
        }
        if is_under(&to, &from) {
            return Err(ErrorKind::InvalidInput(String::from(
                "cannot move a directory into itself",
            )));
        }
        self.check_parent(&to)?;
        if let Some(existing) = self.nodes.get(&to) {
            if existing.is_dir() && self.has_children(&to) {
                return Err(ErrorKind::DirectoryNotEmpty);
            }
        }

        let moved: Vec<String> = self
            .nodes
            .keys()
            .filter(|k| is_under(k, &from))
            .cloned()
            .collect();
        self.nodes.remove(&to);
        for key in moved {
            if let Some(node) = self.nodes.remove(&key) {
                let dest = alloc::format!("{}{}", to, &key[from.len()..]);
                self.nodes.insert(dest, node);
            }
        }
        Ok(())
    }

    fn truncate(&mut self, path: &str, size: u64) -> Result<(), ErrorKind> {
        let now = self.tick();
        let node = self.lookup_mut(path, true)?;
        resize(node, size, now)
    }

    fn chdir(&mut self, path: &str) -> Result<(), ErrorKind> {
        let abs = self.resolve(path)?;
        let abs = self.follow(abs)?;

        match self.nodes.get(&abs) {
            Some(n) if n.is_dir() => {
                self.cwd = abs;
                Ok(())
            }
            Some(_) => Err(ErrorKind::NotADirectory),
            None => Err(ErrorKind::NotFound),
        }
    }

    fn symlink(&mut self, old: &str, new: &str) -> Result<(), ErrorKind> {
        let abs = self.resolve(new)?;

        if self.nodes.contains_key(&abs) {
            return Err(ErrorKind::AlreadyExists);
        }
        self.check_parent(&abs)?;

        let now = self.tick();
        self.nodes.insert(
            abs,
            Node::new(NodeKind::Symlink(old.to_string()), FileMode::new(0o777), now),
        );
        Ok(())
    }
}

/// Convert a requested file length, rejecting overflow and anything past
/// [`MAX_FILE_SIZE`].
fn checked_len(len: Option<u64>, what: &str) -> Result<usize, ErrorKind> {
    len.and_then(|n| usize::try_from(n).ok())
        .filter(|&n| n <= MAX_FILE_SIZE)
        .ok_or_else(|| ErrorKind::InvalidInput(alloc::format!("{} out of range", what)))
}

fn resize(node: &mut Node, size: u64, now: u64) -> Result<(), ErrorKind> {
    let size = checked_len(Some(size), "size")?;
    match &mut node.kind {
        NodeKind::File(data) => {
            data.resize(size, 0);
            node.modified_at = now;
            Ok(())
        }
        NodeKind::Directory => Err(ErrorKind::IsADirectory),
        NodeKind::Symlink(_) => Err(ErrorKind::InvalidInput(String::from("not a regular file"))),
    }
}

fn copy_at(data: &[u8], offset: u64, buf: &mut [u8]) -> usize {
    let start = match usize::try_from(offset) {
        Ok(start) if start < data.len() => start,
        _ => return 0,
    };
    let n = buf.len().min(data.len() - start);
    buf[..n].copy_from_slice(&data[start..start + n]);
    n
}

/// In-memory filesystem with symlink support.
#[derive(Clone, Debug)]
pub struct MemoryFs {
    state: Rc<RefCell<State>>,
}

impl Default for MemoryFs {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFs {
    /// Create a filesystem containing only `/` and the temp directory.
    pub fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            String::from("/"),
            Node::new(NodeKind::Directory, FileMode::new(0o755), 1000),
        );
        nodes.insert(
            String::from(TEMP_DIR),
            Node::new(NodeKind::Directory, FileMode::new(0o777), 1000),
        );

        Self {
            state: Rc::new(RefCell::new(State {
                nodes,
                cwd: String::from("/"),
                now: 1001,
            })),
        }
    }

    /// Set the current timestamp (for testing).
    pub fn set_now(&self, timestamp: u64) {
        self.state.borrow_mut().now = timestamp;
    }
}

impl Filer for MemoryFs {
    type File = MemoryFile;

    fn open_file(
        &self,
        path: &str,
        flags: OpenFlags,
        perm: FileMode,
    ) -> Result<MemoryFile, FsError> {
        let abs = self
            .state
            .borrow_mut()
            .open(path, flags, perm)
            .map_err(|kind| FsError::path("open", path, kind))?;

        Ok(MemoryFile {
            state: Rc::clone(&self.state),
            name: String::from(path),
            path: abs,
            flags,
            offset: 0,
            dir_offset: 0,
        })
    }

    fn mkdir(&self, path: &str, perm: FileMode) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .mkdir(path, perm)
            .map_err(|kind| FsError::path("mkdir", path, kind))
    }

    fn remove(&self, path: &str) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .remove(path)
            .map_err(|kind| FsError::path("remove", path, kind))
    }

    fn rename(&self, old: &str, new: &str) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .rename(old, new)
            .map_err(|kind| FsError::link("rename", old, new, kind))
    }

    fn stat(&self, path: &str) -> Result<FileInfo, FsError> {
        self.state
            .borrow()
            .stat(path, true)
            .map_err(|kind| FsError::path("stat", path, kind))
    }

    fn chmod(&self, path: &str, mode: FileMode) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .lookup_mut(path, true)
            .map(|node| node.mode = mode)
            .map_err(|kind| FsError::path("chmod", path, kind))
    }

    fn chtimes(&self, path: &str, atime: u64, mtime: u64) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .lookup_mut(path, true)
            .map(|node| {
                node.accessed_at = atime;
                node.modified_at = mtime;
            })
            .map_err(|kind| FsError::path("chtimes", path, kind))
    }

    fn chown(&self, path: &str, uid: u32, gid: u32) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .lookup_mut(path, true)
            .map(|node| {
                node.uid = uid;
                node.gid = gid;
            })
            .map_err(|kind| FsError::path("chown", path, kind))
    }
}

impl FileSystem for MemoryFs {
    fn mkdir_all(&self, path: &str, perm: FileMode) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .mkdir_all(path, perm)
            .map_err(|kind| FsError::path("mkdir", path, kind))
    }

    fn remove_all(&self, path: &str) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .remove_all(path)
            .map_err(|kind| FsError::path("removeall", path, kind))
    }

    fn truncate(&self, path: &str, size: u64) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .truncate(path, size)
            .map_err(|kind| FsError::path("truncate", path, kind))
    }

    fn chdir(&self, dir: &str) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .chdir(dir)
            .map_err(|kind| FsError::path("chdir", dir, kind))
    }

    fn getwd(&self) -> Result<String, FsError> {
        Ok(self.state.borrow().cwd.clone())
    }

    fn temp_dir(&self) -> String {
        String::from(TEMP_DIR)
    }
}

impl SymlinkFileSystem for MemoryFs {
    fn lstat(&self, path: &str) -> Result<FileInfo, FsError> {
        self.state
            .borrow()
            .stat(path, false)
            .map_err(|kind| FsError::path("lstat", path, kind))
    }

    fn lchown(&self, path: &str, uid: u32, gid: u32) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .lookup_mut(path, false)
            .map(|node| {
                node.uid = uid;
                node.gid = gid;
            })
            .map_err(|kind| FsError::path("lchown", path, kind))
    }

    fn readlink(&self, path: &str) -> Result<String, FsError> {
        self.state
            .borrow()
            .readlink(path)
            .map_err(|kind| FsError::path("readlink", path, kind))
    }

    fn symlink(&self, old: &str, new: &str) -> Result<(), FsError> {
        self.state
            .borrow_mut()
            .symlink(old, new)
            .map_err(|kind| FsError::link("symlink", old, new, kind))
    }
}

/// Handle to an entry of a [`MemoryFs`].
#[derive(Debug)]
pub struct MemoryFile {
    state: Rc<RefCell<State>>,
    /// Name as passed to open
    name: String,
    /// Resolved absolute path
    path: String,
    flags: OpenFlags,
    offset: u64,
    dir_offset: usize,
}

impl MemoryFile {
    fn err(&self, op: &str, kind: ErrorKind) -> FsError {
        FsError::path(op, self.name.as_str(), kind)
    }

    fn check_readable(&self, op: &str) -> Result<(), FsError> {
        match self.flags.access_mode() {
            Some(AccessMode::WriteOnly) => Err(self.err(op, ErrorKind::PermissionDenied)),
            _ => Ok(()),
        }
    }

    fn check_writable(&self, op: &str) -> Result<(), FsError> {
        if self.flags.is_writable() {
            Ok(())
        } else {
            Err(self.err(op, ErrorKind::PermissionDenied))
        }
    }

    /// Write `buf` at `offset` (end of file when `None`). Returns the end position.
    fn write_bytes(&self, buf: &[u8], offset: Option<u64>) -> Result<u64, FsError> {
        self.check_writable("write")?;

        let mut state = self.state.borrow_mut();
        let now = state.tick();
        let node = state
            .nodes
            .get_mut(&self.path)
            .ok_or_else(|| self.err("write", ErrorKind::NotFound))?;

        match &mut node.kind {
            NodeKind::File(data) => {
                let start = offset.unwrap_or(data.len() as u64);
                let end = checked_len(start.checked_add(buf.len() as u64), "offset")
                    .map_err(|kind| self.err("write", kind))?;
                let start = end - buf.len();
                if data.len() < end {
                    data.resize(end, 0);
                }
                data[start..end].copy_from_slice(buf);
                node.modified_at = now;
                Ok(end as u64)
            }
            _ => Err(self.err("write", ErrorKind::IsADirectory)),
        }
    }
}

impl File for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, FsError> {
        self.check_readable("read")?;
        let n = {
            let state = self.state.borrow();
            let data = state
                .file_data(&self.path)
                .map_err(|kind| self.err("read", kind))?;
            copy_at(data, self.offset, buf)
        };
        self.offset += n as u64;
        Ok(n)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> Result<usize, FsError> {
        self.check_readable("read")?;
        let state = self.state.borrow();
        let data = state
            .file_data(&self.path)
            .map_err(|kind| self.err("read", kind))?;
        Ok(copy_at(data, offset, buf))
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, FsError> {
        let offset = if self.flags.contains(OpenFlags::APPEND) {
            None
        } else {
            Some(self.offset)
        };
        self.offset = self.write_bytes(buf, offset)?;
        Ok(buf.len())
    }

    fn write_at(&mut self, buf: &[u8], offset: u64) -> Result<usize, FsError> {
        self.write_bytes(buf, Some(offset))?;
        Ok(buf.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<u64, FsError> {
        let len = {
            let state = self.state.borrow();
            match state.nodes.get(&self.path) {
                Some(node) => node.info("").size,
                None => return Err(self.err("seek", ErrorKind::NotFound)),
            }
        };

        let target = match pos {
            SeekFrom::Start(n) => Some(n),
            SeekFrom::Current(delta) => self.offset.checked_add_signed(delta),
            SeekFrom::End(delta) => len.checked_add_signed(delta),
        };

        match target {
            Some(offset) => {
                self.offset = offset;
                Ok(offset)
            }
            None => Err(self.err(
                "seek",
                ErrorKind::InvalidInput(String::from("negative position")),
            )),
        }
    }

    fn stat(&self) -> Result<FileInfo, FsError> {
        self.state
            .borrow()
            .stat(&self.path, false)
            .map_err(|kind| self.err("stat", kind))
    }

    fn sync(&mut self) -> Result<(), FsError> {
        Ok(())
    }

    fn read_dir(&mut self, limit: Option<usize>) -> Result<Vec<FileInfo>, FsError> {
        let entries = self
            .state
            .borrow()
            .list(&self.path)
            .map_err(|kind| self.err("readdir", kind))?;

        let remaining = entries.into_iter().skip(self.dir_offset);
        let taken: Vec<FileInfo> = match limit {
            Some(n) => remaining.take(n).collect(),
            None => remaining.collect(),
        };
        self.dir_offset += taken.len();
        Ok(taken)
    }

    fn truncate(&mut self, size: u64) -> Result<(), FsError> {
        self.check_writable("truncate")?;

        let mut state = self.state.borrow_mut();
        let now = state.tick();
        let node = state
            .nodes
            .get_mut(&self.path)
            .ok_or_else(|| self.err("truncate", ErrorKind::NotFound))?;
        resize(node, size, now).map_err(|kind| self.err("truncate", kind))
    }

    fn close(self) -> Result<(), FsError> {
        Ok(())
    }
}
