//! Common CLI argument structure for export planning

use crate::config::ApplyReport;
use crate::exports::Exports;
use crate::host::HostFs;
use crate::mode::FilesystemMode;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// How the finished plan is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// bwrap arguments, one directive per line
    Args,

    /// Export table entries with their merged mode
    Plan,
}

/// CLI arguments for building an export plan
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// Expose a path read-only (can be used multiple times)
    #[arg(long = "ro", value_name = "PATH")]
    pub ro_paths: Vec<PathBuf>,

    /// Expose a path read-write (can be used multiple times)
    #[arg(long = "rw", value_name = "PATH")]
    pub rw_paths: Vec<PathBuf>,

    /// Hide a directory behind an empty tmpfs (can be used multiple times)
    #[arg(long = "hide", value_name = "PATH")]
    pub hidden_paths: Vec<PathBuf>,

    /// Create a directory placeholder without exposing its contents
    #[arg(long = "dir", value_name = "PATH")]
    pub dirs: Vec<PathBuf>,

    /// Pass host /usr and /etc through to /run/host
    #[arg(long, value_enum, value_name = "MODE")]
    pub host_fs: Option<FilesystemMode>,

    /// Export profile to start from (default: the config's default_profile)
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Skip profiles entirely and use only paths given on the command line
    #[arg(long, conflicts_with = "profile")]
    pub no_profile: bool,

    /// Configuration file (TOML format)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report whether a path would be visible in the sandbox (can be used multiple times)
    #[arg(long = "check", value_name = "PATH")]
    pub check_paths: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Args)]
    pub format: OutputFormat,

    /// Log planning decisions to stderr
    #[arg(long, short)]
    pub verbose: bool,
}

impl ExportArgs {
    /// Feed the command-line requests into `exports`.
    ///
    /// Relative paths are taken relative to `cwd`.
    pub fn apply<F: HostFs>(&self, exports: &mut Exports<F>, cwd: &Path) -> ApplyReport {
        let mut report = ApplyReport::default();

        for path in &self.ro_paths {
            let path = cwd.join(path);
            let outcome = exports.expose(FilesystemMode::ReadOnly, &path);
            report.record_explicit(path, outcome);
        }

        for path in &self.rw_paths {
            let path = cwd.join(path);
            let outcome = exports.expose(FilesystemMode::ReadWrite, &path);
            report.record_explicit(path, outcome);
        }

        for path in &self.hidden_paths {
            let path = cwd.join(path);
            let outcome = exports.expose_tmpfs(&path);
            report.record_explicit(path, outcome);
        }

        for path in &self.dirs {
            let path = cwd.join(path);
            let outcome = exports.expose_dir(&path);
            report.record_explicit(path, outcome);
        }

        if let Some(mode) = self.host_fs {
            exports.set_host_fs(mode);
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExposeError;
    use crate::memfs::MemoryFs;
    use crate::mode::ExportMode;

    #[test]
    fn test_parse_args() {
        let args = ExportArgs::try_parse_from([
            "bw-exports",
            "--ro",
            "/srv",
            "--rw",
            "src",
            "--hide",
            "/home/user/.ssh",
            "--host-fs",
            "ro",
            "--check",
            "/srv/file",
            "--format",
            "plan",
        ])
        .unwrap();

        assert_eq!(args.ro_paths, vec![PathBuf::from("/srv")]);
        assert_eq!(args.rw_paths, vec![PathBuf::from("src")]);
        assert_eq!(args.host_fs, Some(FilesystemMode::ReadOnly));
        assert_eq!(args.format, OutputFormat::Plan);
        assert!(args.profile.is_none());
    }

    #[test]
    fn test_profile_conflicts_with_no_profile() {
        let result = ExportArgs::try_parse_from(["bw-exports", "--profile", "home", "--no-profile"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_resolves_relative_paths() {
        let fs = MemoryFs::new().dir("/work/project/src").dir("/srv");
        let mut exports = Exports::with_fs(fs);

        let args = ExportArgs::try_parse_from([
            "bw-exports",
            "--rw",
            "src",
            "--ro",
            "/srv",
            "--host-fs",
            "rw",
        ])
        .unwrap();
        let report = args.apply(&mut exports, Path::new("/work/project"));

        assert_eq!(report.applied, 2);
        assert_eq!(exports.get("/work/project/src"), Some(ExportMode::ReadWrite));
        assert_eq!(exports.get("/srv"), Some(ExportMode::ReadOnly));
        assert_eq!(exports.host_fs(), FilesystemMode::ReadWrite);
    }

    #[test]
    fn test_apply_reports_missing_paths() {
        let mut exports = Exports::with_fs(MemoryFs::new().dir("/srv"));

        let args = ExportArgs::try_parse_from(["bw-exports", "--ro", "/srv", "--ro", "/typo"]).unwrap();
        let report = args.apply(&mut exports, Path::new("/"));

        assert_eq!(report.applied, 1);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, PathBuf::from("/typo"));
        assert!(matches!(report.rejected[0].1, ExposeError::Missing { .. }));
    }
}
