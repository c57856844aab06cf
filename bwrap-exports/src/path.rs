//! Lexical path helpers shared by the planner, the visibility oracle and the
//! directive emitter

use crate::error::ExposeError;
use std::path::{Component, Path, PathBuf};

/// Normalize an absolute path without touching the filesystem.
///
/// `.` components and redundant separators are dropped, `..` removes the
/// previous component (and stays put at `/`), and the result never carries a
/// trailing slash. Relative input is rejected.
pub fn canonicalize(path: &Path) -> Result<PathBuf, ExposeError> {
    if !path.is_absolute() {
        return Err(ExposeError::NotAbsolute(path.to_path_buf()));
    }

    Ok(path_clean::clean(path))
}

/// True if `path` is `prefix` or lies beneath it.
///
/// Both arguments must be canonical. The comparison is per component, so
/// `/usrlocal` is not under `/usr`.
pub fn has_path_prefix(path: &Path, prefix: &Path) -> bool {
    path.starts_with(prefix)
}

/// Express `target` relative to the directory `base`.
///
/// Climbs one `..` per component of `base` back to the root and then
/// descends into `target`, so the result is valid no matter what `base`
/// itself resolves to inside the sandbox.
pub fn make_relative(base: &Path, target: &Path) -> PathBuf {
    let mut relative = PathBuf::new();

    for component in base.components() {
        if !matches!(component, Component::RootDir | Component::Prefix(_)) {
            relative.push("..");
        }
    }

    relative.push(target.strip_prefix("/").unwrap_or(target));

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }

    relative
}
