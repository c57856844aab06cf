//! Turning a finished export table into sandbox directives

use crate::directive::Directive;
use crate::exports::{Exports, HOST_PASSTHROUGH};
use crate::host::HostFs;
use crate::mode::ExportMode;
use crate::path::make_relative;

use std::ffi::OsString;
use std::path::Path;
use tracing::debug;

impl<F: HostFs> Exports<F> {
    /// Directives that build the exported filesystem, in the order they
    /// must be applied
    pub fn directives(&self) -> Vec<Directive> {
        let mut directives = Vec::new();

        for ep in self.entries() {
            let path = ep.path.as_path();

            match ep.mode {
                ExportMode::Symlink => {
                    // Already there if the parent is bind mounted
                    if self.parent_is_mapped(path) {
                        continue;
                    }

                    match self.fs.resolve_link(path) {
                        Ok(resolved) => {
                            let parent = path.parent().unwrap_or_else(|| Path::new("/"));
                            directives.push(Directive::symlink(
                                make_relative(parent, &resolved),
                                path.to_path_buf(),
                            ));
                        }
                        Err(err) => {
                            debug!(path = %path.display(), "Skipping symlink: {}", err);
                        }
                    }
                }
                ExportMode::Tmpfs => {
                    // Only hide something we can mount on
                    if !self.fs.is_dir(path) {
                        continue;
                    }

                    // An unmapped parent is an empty tmpfs already
                    if self.parent_is_mapped(path) {
                        directives.push(Directive::tmpfs(path));
                    } else {
                        directives.push(Directive::dir(path));
                    }
                }
                ExportMode::Dir => {
                    if self.fs.is_dir(path) {
                        directives.push(Directive::dir(path));
                    }
                }
                ExportMode::ReadOnly => directives.push(Directive::ro(path, path)),
                ExportMode::ReadWrite => directives.push(Directive::rw(path, path)),
            }
        }

        if let Some(access) = self.host_fs.access() {
            for (host, sandbox) in HOST_PASSTHROUGH {
                if self.fs.is_dir(Path::new(host)) {
                    directives.push(Directive::bind(*host, *sandbox, access));
                }
            }
        }

        directives
    }

    /// The directives as bwrap command arguments
    pub fn to_args(&self) -> Vec<OsString> {
        self.directives()
            .iter()
            .flat_map(Directive::to_args)
            .collect()
    }
}
