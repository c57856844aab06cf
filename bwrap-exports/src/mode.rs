//! Access levels and export modes

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an exported path appears in the sandbox.
///
/// Variants are declared from least to most visible and the derived `Ord`
/// is the rank used to merge conflicting requests for the same path. A
/// `Dir` placeholder ranks below `Tmpfs`, and `Symlink` outranks every bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExportMode {
    /// Make sure a directory exists to mount things on, nothing more
    Dir,

    /// Hide the contents behind an empty tmpfs
    Tmpfs,

    /// Read-only bind mount
    ReadOnly,

    /// Read-write bind mount
    ReadWrite,

    /// Recreate the host symlink pointing at its exported target
    Symlink,
}

impl From<FilesystemMode> for ExportMode {
    fn from(mode: FilesystemMode) -> Self {
        match mode {
            FilesystemMode::None => ExportMode::Tmpfs,
            FilesystemMode::ReadOnly => ExportMode::ReadOnly,
            FilesystemMode::ReadWrite => ExportMode::ReadWrite,
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportMode::Dir => write!(f, "dir"),
            ExportMode::Tmpfs => write!(f, "tmpfs"),
            ExportMode::ReadOnly => write!(f, "ro"),
            ExportMode::ReadWrite => write!(f, "rw"),
            ExportMode::Symlink => write!(f, "symlink"),
        }
    }
}

/// Access requested for a host path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
pub enum FilesystemMode {
    /// No access: the path is hidden
    #[default]
    #[serde(rename = "none")]
    #[value(name = "none")]
    None,

    #[serde(rename = "ro", alias = "read-only")]
    #[value(name = "ro", alias = "read-only")]
    ReadOnly,

    #[serde(rename = "rw", alias = "read-write")]
    #[value(name = "rw", alias = "read-write")]
    ReadWrite,
}

impl FilesystemMode {
    /// Bind access for this mode, if it grants any
    pub fn access(self) -> Option<Access> {
        match self {
            FilesystemMode::None => None,
            FilesystemMode::ReadOnly => Some(Access::ReadOnly),
            FilesystemMode::ReadWrite => Some(Access::ReadWrite),
        }
    }
}

impl FromStr for FilesystemMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(FilesystemMode::None),
            "ro" | "read-only" => Ok(FilesystemMode::ReadOnly),
            "rw" | "read-write" => Ok(FilesystemMode::ReadWrite),
            _ => Err(format!("Invalid filesystem mode: {}", s)),
        }
    }
}

impl fmt::Display for FilesystemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilesystemMode::None => write!(f, "none"),
            FilesystemMode::ReadOnly => write!(f, "ro"),
            FilesystemMode::ReadWrite => write!(f, "rw"),
        }
    }
}

/// Access level of a bind mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadOnly,
    ReadWrite,
}
