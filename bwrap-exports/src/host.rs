//! Host filesystem access used while planning exports
//!
//! The planner never mutates the host; it only asks what kind of file sits
//! at a path and where a symlink points. Everything goes through [`HostFs`]
//! so the metadata source can be swapped out.

use std::fs;
use std::io;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

/// Type of a directory entry as reported by `lstat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Directory,
    Regular,
    Symlink,
    Socket,
    /// Devices, fifos and anything else that cannot be exported
    Other,
}

impl FileKind {
    /// Whether a path of this kind may be exposed into the sandbox
    pub fn is_exportable(self) -> bool {
        !matches!(self, FileKind::Other)
    }
}

/// Trait for querying host filesystem metadata
pub trait HostFs {
    /// Kind of the file at `path`, without following a final symlink
    fn file_kind(&self, path: &Path) -> io::Result<FileKind>;

    /// Raw target of the symlink at `path`
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// True if `path` is a directory itself, not a symlink to one
    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.file_kind(path), Ok(FileKind::Directory))
    }

    /// True if `path` is a symlink
    fn is_symlink(&self, path: &Path) -> bool {
        matches!(self.file_kind(path), Ok(FileKind::Symlink))
    }

    /// Follow the symlink at `path` by exactly one hop.
    ///
    /// Relative link targets are joined onto the directory containing the
    /// link. The result is not normalized.
    fn resolve_link(&self, path: &Path) -> io::Result<PathBuf> {
        let link = self.read_link(path)?;
        if link.is_absolute() {
            return Ok(link);
        }

        let parent = path.parent().unwrap_or_else(|| Path::new("/"));
        Ok(parent.join(link))
    }
}

/// The real host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl HostFs for RealFs {
    fn file_kind(&self, path: &Path) -> io::Result<FileKind> {
        let file_type = fs::symlink_metadata(path)?.file_type();

        let kind = if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_file() {
            FileKind::Regular
        } else if file_type.is_socket() {
            FileKind::Socket
        } else {
            FileKind::Other
        };

        Ok(kind)
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path)
    }
}
