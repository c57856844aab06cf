//! The export table and the recursive expose planner
//!
//! Requests to expose, hide or scaffold host paths are funneled through
//! [`Exports::expose`] and friends. Every request is checked against the
//! host filesystem, symlinks along the path are replaced by their targets,
//! and the result is merged into a table keyed by canonical path. Once all
//! requests are in, the table is read back by the visibility oracle and the
//! directive emitter.

use crate::error::ExposeError;
use crate::host::{HostFs, RealFs};
use crate::mode::{ExportMode, FilesystemMode};
use crate::path::{canonicalize, has_path_prefix};

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Host roots that are never exported.
///
/// They are read-only in the sandbox (so no mountpoints can be created in
/// them) and the sandbox copies do not match the host anyway.
pub const NEVER_EXPORT_ROOTS: &[&str] = &[
    "/lib", "/lib32", "/lib64", "/bin", "/sbin", "/usr", "/etc", "/app", "/dev",
];

/// Host directories passed through when host filesystem access is enabled,
/// with the location they appear at in the sandbox
pub const HOST_PASSTHROUGH: &[(&str, &str)] = &[
    ("/usr", "/run/host/usr"),
    ("/etc", "/run/host/etc"),
];

/// Paths that are never recreated as symlinks, even if they are on the host.
/// The sandbox already has its own `/tmp` directory.
pub const NEVER_EXPORT_AS_SYMLINK: &[&str] = &["/tmp"];

/// Symlink hops followed before giving up, matching the kernel's ELOOP limit
pub const MAX_SYMLINK_DEPTH: u32 = 40;

/// A path in the export table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedPath {
    /// Canonical absolute path on the host
    pub path: PathBuf,

    /// Merged export mode
    pub mode: ExportMode,
}

/// The set of host paths exported into a sandbox
#[derive(Debug, Clone)]
pub struct Exports<F = RealFs> {
    pub(crate) fs: F,

    /// Keyed by the raw path bytes so iteration is in plain byte order,
    /// which puts every path before its descendants
    pub(crate) entries: BTreeMap<OsString, ExportedPath>,

    pub(crate) host_fs: FilesystemMode,
}

impl Exports<RealFs> {
    /// Create an empty export table for the real host filesystem
    pub fn new() -> Self {
        Self::with_fs(RealFs)
    }
}

impl Default for Exports<RealFs> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: HostFs> Exports<F> {
    /// Create an empty export table backed by the given filesystem
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            entries: BTreeMap::new(),
            host_fs: FilesystemMode::None,
        }
    }

    /// Expose `path` with the given access
    pub fn expose(
        &mut self,
        mode: FilesystemMode,
        path: impl AsRef<Path>,
    ) -> Result<(), ExposeError> {
        self.expose_mode(ExportMode::from(mode), path.as_ref())
    }

    /// Hide the contents of `path` behind an empty tmpfs
    pub fn expose_tmpfs(&mut self, path: impl AsRef<Path>) -> Result<(), ExposeError> {
        self.expose_mode(ExportMode::Tmpfs, path.as_ref())
    }

    /// Expose `path` with the given access, or hide it if `mode` grants none
    pub fn expose_or_hide(
        &mut self,
        mode: FilesystemMode,
        path: impl AsRef<Path>,
    ) -> Result<(), ExposeError> {
        match mode {
            FilesystemMode::None => self.expose_tmpfs(path),
            _ => self.expose(mode, path),
        }
    }

    /// Make sure `path` exists as a directory in the sandbox without
    /// exposing what is in it
    pub fn expose_dir(&mut self, path: impl AsRef<Path>) -> Result<(), ExposeError> {
        self.expose_mode(ExportMode::Dir, path.as_ref())
    }

    /// Pass the host `/usr` and `/etc` through to `/run/host`
    pub fn set_host_fs(&mut self, mode: FilesystemMode) {
        self.host_fs = mode;
    }

    /// Host passthrough mode
    pub fn host_fs(&self) -> FilesystemMode {
        self.host_fs
    }

    /// All entries in ascending path byte order
    pub fn entries(&self) -> impl Iterator<Item = &ExportedPath> {
        self.entries.values()
    }

    /// Mode registered for exactly this canonical path
    pub fn get(&self, path: impl AsRef<Path>) -> Option<ExportMode> {
        self.entries
            .get(path.as_ref().as_os_str())
            .map(|ep| ep.mode)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn expose_mode(&mut self, mode: ExportMode, path: &Path) -> Result<(), ExposeError> {
        self.expose_at(mode, path, 0).map_err(|err| {
            debug!(path = %path.display(), %mode, "Not exposing: {}", err);
            err
        })
    }

    /// Merge `mode` into the entry for `path`, keeping the higher rank
    fn register(&mut self, path: PathBuf, mode: ExportMode) {
        trace!(path = %path.display(), %mode, "Registering export");
        self.entries
            .entry(path.clone().into_os_string())
            .and_modify(|ep| ep.mode = ep.mode.max(mode))
            .or_insert(ExportedPath { path, mode });
    }

    /// Register `path`, redirecting through any symlink on the way.
    /// `level` counts the symlink hops taken so far.
    fn expose_at(&mut self, mode: ExportMode, path: &Path, level: u32) -> Result<(), ExposeError> {
        if level > MAX_SYMLINK_DEPTH {
            return Err(ExposeError::TooDeep {
                path: path.to_path_buf(),
            });
        }

        if !path.is_absolute() {
            return Err(ExposeError::NotAbsolute(path.to_path_buf()));
        }

        let kind = self
            .fs
            .file_kind(path)
            .map_err(|source| ExposeError::Missing {
                path: path.to_path_buf(),
                source,
            })?;
        if !kind.is_exportable() {
            return Err(ExposeError::UnsupportedType(path.to_path_buf()));
        }

        let canonical = canonicalize(path)?;

        if let Some(root) = NEVER_EXPORT_ROOTS
            .iter()
            .copied()
            .find(|root| has_path_prefix(&canonical, Path::new(root)))
        {
            return Err(ExposeError::DenyListed {
                path: canonical,
                root,
            });
        }

        // Any symlink along the way, the path itself included, is replaced
        // by its target and recreated in the sandbox.
        let parts: Vec<&OsStr> = canonical.iter().skip(1).collect();
        let mut prefix = PathBuf::from("/");
        for (i, part) in parts.iter().enumerate() {
            prefix.push(part);

            if !self.fs.is_symlink(&prefix) || never_export_as_symlink(&prefix) {
                continue;
            }

            let mut target = self
                .fs
                .resolve_link(&prefix)
                .map_err(|source| ExposeError::BrokenLink {
                    path: prefix.clone(),
                    source,
                })?;
            target.extend(&parts[i + 1..]);

            trace!(
                link = %prefix.display(),
                target = %target.display(),
                level,
                "Following symlink"
            );
            self.expose_at(mode, &target, level + 1)?;
            self.register(prefix, ExportMode::Symlink);
            return Ok(());
        }

        self.register(canonical, mode);
        Ok(())
    }
}

fn never_export_as_symlink(path: &Path) -> bool {
    NEVER_EXPORT_AS_SYMLINK
        .iter()
        .any(|never| path == Path::new(never))
}
