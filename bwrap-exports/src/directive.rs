//! Sandbox construction directives produced from an export plan

use crate::mode::Access;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One step of building the sandbox filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Bind mount a host path into the sandbox
    BindMount {
        /// Source path on host
        source: PathBuf,

        /// Target path in sandbox
        target: PathBuf,

        access: Access,
    },

    /// Create an empty directory (mountpoint scaffolding)
    EnsureDirectory(PathBuf),

    /// Mount an empty tmpfs over a path to hide what is below it
    MountTmpfsMask(PathBuf),

    /// Create a symlink at `path` pointing to `target`
    CreateSymlink { target: PathBuf, path: PathBuf },
}

impl Directive {
    /// Create a read-only bind mount
    pub fn ro<P: AsRef<Path>>(source: P, target: P) -> Self {
        Self::BindMount {
            source: source.as_ref().to_path_buf(),
            target: target.as_ref().to_path_buf(),
            access: Access::ReadOnly,
        }
    }

    /// Create a read-write bind mount
    pub fn rw<P: AsRef<Path>>(source: P, target: P) -> Self {
        Self::BindMount {
            source: source.as_ref().to_path_buf(),
            target: target.as_ref().to_path_buf(),
            access: Access::ReadWrite,
        }
    }

    /// Create a bind mount with the given access
    pub fn bind<P: AsRef<Path>>(source: P, target: P, access: Access) -> Self {
        match access {
            Access::ReadOnly => Self::ro(source, target),
            Access::ReadWrite => Self::rw(source, target),
        }
    }

    /// Ensure a directory exists
    pub fn dir<P: AsRef<Path>>(path: P) -> Self {
        Self::EnsureDirectory(path.as_ref().to_path_buf())
    }

    /// Create a tmpfs mount
    pub fn tmpfs<P: AsRef<Path>>(path: P) -> Self {
        Self::MountTmpfsMask(path.as_ref().to_path_buf())
    }

    /// Create a symlink
    pub fn symlink<P: AsRef<Path>>(link_target: P, link_path: P) -> Self {
        Self::CreateSymlink {
            target: link_target.as_ref().to_path_buf(),
            path: link_path.as_ref().to_path_buf(),
        }
    }

    /// Convert this directive to bwrap command arguments
    pub fn to_args(&self) -> Vec<OsString> {
        match self {
            Directive::BindMount {
                source,
                target,
                access,
            } => {
                let flag = match access {
                    Access::ReadOnly => "--ro-bind",
                    Access::ReadWrite => "--bind",
                };
                vec![flag.into(), source.clone().into(), target.clone().into()]
            }
            Directive::EnsureDirectory(path) => {
                vec!["--dir".into(), path.clone().into()]
            }
            Directive::MountTmpfsMask(path) => {
                vec!["--tmpfs".into(), path.clone().into()]
            }
            Directive::CreateSymlink { target, path } => {
                vec!["--symlink".into(), target.clone().into(), path.clone().into()]
            }
        }
    }
}
