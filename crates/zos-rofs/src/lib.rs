//! Zero OS Read-Only Filesystem Layer
//!
//! Wraps any filesystem in a view that can be observed but never changed:
//!
//! - **Core**: OpenFlags, FileMode, FileInfo and the shared error type
//! - **Service**: capability traits (`Filer`, `FileSystem`, `SymlinkFileSystem`)
//!   and the `File` handle trait
//! - **Read-only**: `ReadOnlyFs` store wrapper, `ReadOnlyFile` handle wrapper
//!   and the read/write partition they enforce
//! - **Testing**: in-memory stores for exercising wrappers
//!
//! # Design Principles
//!
//! 1. **Fail closed**: every mutating operation is rejected before the
//!    backing store sees it
//! 2. **Transparent reads**: observing operations return exactly what the
//!    backing store returns, errors included
//! 3. **Capability preserving**: the wrapper offers the same tiers as the
//!    store it wraps, no more
//! 4. **Native error shapes**: rejections look like the errors a real store
//!    reports for the same operation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                        ReadOnlyFs<B>                                 │
//! │                                                                      │
//! │   open_file ──► check_open ──┬── write access ──► PermissionDenied   │
//! │                              │                                       │
//! │                              └── read access ───┐                    │
//! │                                                 ▼                    │
//! │   stat, lstat, readlink,            ┌──────────────────────────┐     │
//! │   read_dir, chdir, getwd ──────────►│   Backing store B        │     │
//! │                                     │  (Filer / FileSystem /   │     │
//! │   mkdir, remove, rename,            │   SymlinkFileSystem)     │     │
//! │   chmod, chown, symlink, ...        └────────────┬─────────────┘     │
//! │        │                                         │ B::File           │
//! │        ▼                                         ▼                   │
//! │   PermissionDenied                    ┌──────────────────────────┐   │
//! │                                       │   ReadOnlyFile<B::File>  │   │
//! │                                       │  read, seek, stat ──► B  │   │
//! │                                       │  write, truncate ──► ✗   │   │
//! │                                       └──────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

#![no_std]
extern crate alloc;

pub mod core;
pub mod readonly;
pub mod service;
pub mod testing;

// Convenient re-exports at crate root
pub use crate::core::{normalize_path, parent_path, resolve_path};
pub use crate::core::{
    AccessMode, ErrorKind, FileInfo, FileMode, FileType, FsError, OpenFlags, SeekFrom, WalkEntry,
};
pub use readonly::{ReadOnlyFile, ReadOnlyFs};
pub use service::{write_file, File, FileSystem, Filer, SymlinkFileSystem};
pub use testing::{MemoryFs, PlainFs};
