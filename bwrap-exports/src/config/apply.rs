//! Applying a resolved profile to an export table

use super::schema::ExportProfile;
use crate::error::ExposeError;
use crate::exports::Exports;
use crate::host::HostFs;
use crate::mode::FilesystemMode;
use std::path::{Path, PathBuf};

/// Outcome of applying a profile
#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Requests that made it into the table
    pub applied: usize,

    /// Requests that were rejected, with the reason
    pub rejected: Vec<(PathBuf, ExposeError)>,
}

impl ApplyReport {
    /// Record a profile request. Missing paths are skipped quietly since
    /// optional paths routinely don't exist on every host.
    pub(crate) fn record(&mut self, path: PathBuf, outcome: Result<(), ExposeError>) {
        match outcome {
            Err(ExposeError::Missing { .. }) => {
                tracing::debug!("Skipping missing export path: {}", path.display());
            }
            outcome => self.record_explicit(path, outcome),
        }
    }

    /// Record a request the user asked for by name; every failure is reported
    pub(crate) fn record_explicit(&mut self, path: PathBuf, outcome: Result<(), ExposeError>) {
        match outcome {
            Ok(()) => self.applied += 1,
            Err(err) => {
                tracing::warn!("Rejected export path {}: {}", path.display(), err);
                self.rejected.push((path, err));
            }
        }
    }
}

impl ExportProfile {
    /// Feed every request in this profile into `exports`.
    ///
    /// A leading `~` in a path is replaced by `home`. Requests are issued
    /// in a fixed order (binds, then hidden paths, then placeholders) but
    /// the table merges them the same way regardless.
    pub fn apply<F: HostFs>(&self, exports: &mut Exports<F>, home: &Path) -> ApplyReport {
        let mut report = ApplyReport::default();

        for path in &self.ro_paths {
            let path = expand_tilde(path, home);
            let outcome = exports.expose(FilesystemMode::ReadOnly, &path);
            report.record(path, outcome);
        }

        for path in &self.rw_paths {
            let path = expand_tilde(path, home);
            let outcome = exports.expose(FilesystemMode::ReadWrite, &path);
            report.record(path, outcome);
        }

        for path in &self.hidden_paths {
            let path = expand_tilde(path, home);
            let outcome = exports.expose_tmpfs(&path);
            report.record(path, outcome);
        }

        for path in &self.dirs {
            let path = expand_tilde(path, home);
            let outcome = exports.expose_dir(&path);
            report.record(path, outcome);
        }

        if let Some(mode) = self.host_fs {
            exports.set_host_fs(mode);
        }

        report
    }
}

/// Expand a leading `~` to `home`. Embedded tildes are left alone.
pub fn expand_tilde(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}
