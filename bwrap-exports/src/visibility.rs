//! Whether a host path can be seen from inside the sandbox

use crate::exports::{Exports, MAX_SYMLINK_DEPTH};
use crate::host::{FileKind, HostFs};
use crate::path::canonicalize;

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

impl<F: HostFs> Exports<F> {
    /// True if `path` would be visible in the sandbox.
    ///
    /// A path is visible if its last component is exported and no exported
    /// element on the way to it is a symlink; symlinks that are exported are
    /// followed and the walk continues from their target. Anything that
    /// cannot be stat'ed or resolved counts as not visible.
    pub fn is_visible(&self, path: impl AsRef<Path>) -> bool {
        self.visible_at(path.as_ref(), 0)
    }

    fn visible_at(&self, path: &Path, level: u32) -> bool {
        if level > MAX_SYMLINK_DEPTH {
            debug!(path = %path.display(), "Symlink chain too deep, treating as hidden");
            return false;
        }

        let Ok(canonical) = canonicalize(path) else {
            return false;
        };

        let parts: Vec<&OsStr> = canonical.iter().skip(1).collect();
        let mut prefix = PathBuf::from("/");
        for (i, part) in parts.iter().enumerate() {
            prefix.push(part);

            if self.path_is_mapped(&prefix) {
                let Ok(kind) = self.fs.file_kind(&prefix) else {
                    return false;
                };

                if kind == FileKind::Symlink {
                    let Ok(mut target) = self.fs.resolve_link(&prefix) else {
                        return false;
                    };
                    target.extend(&parts[i + 1..]);

                    return self.visible_at(&target, level + 1);
                }
            } else if i + 1 == parts.len() {
                return false;
            }
        }

        true
    }
}
