//! Path utilities.
//!
//! Paths are Unix-like strings. Stores may accept relative paths and resolve
//! them against their own working directory with [`resolve_path`].

use alloc::string::String;
use alloc::vec::Vec;

use super::error::ErrorKind;

/// Default path separator.
pub const SEPARATOR: char = '/';

/// Default separator for path lists.
pub const LIST_SEPARATOR: char = ':';

/// Clean an absolute path: collapse repeated slashes, drop `.` components,
/// and apply `..` lexically. `..` at the root stays at the root.
pub fn normalize_path(path: &str) -> Result<String, ErrorKind> {
    match path.as_bytes().first() {
        None => return Err(ErrorKind::InvalidPath(String::from("empty path"))),
        Some(b'/') => {}
        Some(_) => {
            return Err(ErrorKind::InvalidPath(alloc::format!(
                "not absolute: {}",
                path
            )))
        }
    }
    if path.contains('\0') {
        return Err(ErrorKind::InvalidPath(String::from("NUL byte in path")));
    }

    let kept = path.split(SEPARATOR).fold(Vec::new(), |mut stack, part| {
        match part {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            name => stack.push(name),
        }
        stack
    });

    if kept.is_empty() {
        return Ok(String::from("/"));
    }
    Ok(kept.iter().fold(String::with_capacity(path.len()), |mut out, name| {
        out.push(SEPARATOR);
        out.push_str(name);
        out
    }))
}

/// Resolve `path` against `cwd` (when relative) and normalize the result.
pub fn resolve_path(cwd: &str, path: &str) -> Result<String, ErrorKind> {
    match path.as_bytes().first() {
        Some(b'/') | None => normalize_path(path),
        Some(_) => normalize_path(&join_path(cwd, path)),
    }
}

/// Parent directory of a normalized path (`/` for the root).
pub fn parent_path(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => String::from("/"),
        Some(pos) => String::from(&path[..pos]),
    }
}

/// Last component of a path.
pub fn base_name(path: &str) -> &str {
    if path == "/" {
        return "/";
    }

    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

/// Append `name` to `base`.
pub fn join_path(base: &str, name: &str) -> String {
    if base.ends_with('/') {
        alloc::format!("{}{}", base, name)
    } else {
        alloc::format!("{}/{}", base, name)
    }
}

/// True when `path` is `base` or lies below it.
pub fn is_under(path: &str, base: &str) -> bool {
    if base == "/" {
        return true;
    }

    path.starts_with(base) && (path.len() == base.len() || path.as_bytes()[base.len()] == b'/')
}
