//! Free-standing helpers built on the capability traits.

use super::file::File;
use super::trait_def::Filer;
use crate::core::{FileMode, FsError, OpenFlags};

/// Write `data` to `path`, creating the file with `perm` or truncating it.
pub fn write_file<F: Filer + ?Sized>(
    fs: &F,
    path: &str,
    data: &[u8],
    perm: FileMode,
) -> Result<(), FsError> {
    let mut file = fs.open_file(
        path,
        OpenFlags::WRONLY | OpenFlags::CREATE | OpenFlags::TRUNC,
        perm,
    )?;
    file.write_all(data)?;
    file.close()
}
