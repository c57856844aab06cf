//! Queries for whether a path is governed by an export
//!
//! Entries are scanned in ascending byte order, and every entry that covers
//! the path overwrites the answer. Parents sort before their children, so
//! the deepest covering export decides. `Dir` placeholders do not change
//! visibility and are skipped, leaving the enclosing answer in place.

use crate::exports::{ExportedPath, Exports};
use crate::host::HostFs;
use crate::mode::ExportMode;
use crate::path::has_path_prefix;

use std::ffi::OsStr;
use std::ops::Bound;
use std::path::Path;

impl<F: HostFs> Exports<F> {
    /// True if some strict ancestor of `path` is exported, so that `path`
    /// is already visible through the parent's export
    pub fn parent_is_mapped(&self, path: &Path) -> bool {
        let mut is_mapped = false;

        for ep in self.covering(path) {
            if ep.path == path {
                continue;
            }

            if ep.mode == ExportMode::Dir {
                continue;
            }

            is_mapped = ep.mode != ExportMode::Tmpfs;
        }

        is_mapped
    }

    /// True if `path` itself is exported, directly or through an ancestor.
    ///
    /// A recreated symlink only maps the link itself, never anything below
    /// it.
    pub fn path_is_mapped(&self, path: &Path) -> bool {
        let mut is_mapped = false;

        for ep in self.covering(path) {
            match ep.mode {
                ExportMode::Dir => continue,
                ExportMode::Symlink => is_mapped = ep.path == path,
                mode => is_mapped = mode != ExportMode::Tmpfs,
            }
        }

        is_mapped
    }

    /// Entries equal to or above `path`, shallowest first.
    ///
    /// An ancestor is a byte prefix of `path`, so only keys up to and
    /// including `path` can match.
    fn covering<'a>(&'a self, path: &'a Path) -> impl Iterator<Item = &'a ExportedPath> + 'a {
        self.entries
            .range::<OsStr, _>((Bound::Unbounded, Bound::Included(path.as_os_str())))
            .map(|(_, ep)| ep)
            .filter(move |ep| has_path_prefix(path, &ep.path))
    }
}

#[cfg(test)]
mod tests {
    use crate::exports::Exports;
    use crate::memfs::MemoryFs;
    use crate::mode::FilesystemMode;
    use std::path::Path;

    fn home_fs() -> MemoryFs {
        MemoryFs::new()
            .dir("/home/user/.ssh/keys")
            .dir("/home/user/src/project")
            .dir("/home/user-data")
            .dir("/mnt/data/cache")
            .symlink("/home/user/data", "/mnt/data")
    }

    #[test]
    fn test_path_is_mapped_by_ancestor() {
        let mut exports = Exports::with_fs(home_fs());
        exports.expose(FilesystemMode::ReadOnly, "/home/user").unwrap();

        assert!(exports.path_is_mapped(Path::new("/home/user")));
        assert!(exports.path_is_mapped(Path::new("/home/user/src/project")));
        assert!(!exports.path_is_mapped(Path::new("/home")));
        assert!(!exports.path_is_mapped(Path::new("/home/user-data")));
    }

    #[test]
    fn test_parent_is_mapped_excludes_self() {
        let mut exports = Exports::with_fs(home_fs());
        exports.expose(FilesystemMode::ReadOnly, "/home/user").unwrap();

        assert!(!exports.parent_is_mapped(Path::new("/home/user")));
        assert!(exports.parent_is_mapped(Path::new("/home/user/src")));
    }

    #[test]
    fn test_deepest_export_wins() {
        let mut exports = Exports::with_fs(home_fs());
        exports.expose(FilesystemMode::ReadWrite, "/home/user").unwrap();
        exports.expose_tmpfs("/home/user/.ssh").unwrap();

        assert!(exports.path_is_mapped(Path::new("/home/user/src")));
        assert!(!exports.path_is_mapped(Path::new("/home/user/.ssh")));
        assert!(!exports.path_is_mapped(Path::new("/home/user/.ssh/keys")));
        assert!(exports.parent_is_mapped(Path::new("/home/user/.ssh")));
        assert!(!exports.parent_is_mapped(Path::new("/home/user/.ssh/keys")));

        exports
            .expose(FilesystemMode::ReadOnly, "/home/user/.ssh/keys")
            .unwrap();
        assert!(exports.path_is_mapped(Path::new("/home/user/.ssh/keys")));
    }

    #[test]
    fn test_dir_placeholder_is_transparent() {
        let mut exports = Exports::with_fs(home_fs());
        exports.expose_dir("/home/user/src").unwrap();
        assert!(!exports.path_is_mapped(Path::new("/home/user/src/project")));

        exports.expose(FilesystemMode::ReadOnly, "/home/user").unwrap();
        assert!(exports.path_is_mapped(Path::new("/home/user/src")));
        assert!(exports.path_is_mapped(Path::new("/home/user/src/project")));
    }

    #[test]
    fn test_symlink_maps_only_itself() {
        let mut exports = Exports::with_fs(home_fs());
        exports
            .expose(FilesystemMode::ReadOnly, "/home/user/data")
            .unwrap();

        assert!(exports.path_is_mapped(Path::new("/home/user/data")));
        assert!(!exports.path_is_mapped(Path::new("/home/user/data/cache")));
        assert!(exports.path_is_mapped(Path::new("/mnt/data/cache")));
    }

    #[test]
    fn test_parent_is_mapped_counts_symlink_parent() {
        let mut exports = Exports::with_fs(home_fs());
        exports
            .expose(FilesystemMode::ReadOnly, "/home/user/data")
            .unwrap();

        // A symlink entry is not tmpfs, so it maps its children for the
        // excluding-self query
        assert!(exports.parent_is_mapped(Path::new("/home/user/data/cache")));
        assert!(!exports.parent_is_mapped(Path::new("/home/user/data")));
    }
}
