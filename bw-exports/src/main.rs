//! Plan the filesystem exports of a bubblewrap sandbox

use anyhow::{Context, Result};
use bwrap_exports::config::resolve_profile;
use bwrap_exports::{
    Config, ConfigLoader, ExportArgs, ExportError, Exports, FilesystemMode, HostFs, OutputFormat,
};
use clap::Parser;
use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser)]
#[command(
    name = "bw-exports",
    about = "Plan the filesystem exports of a bubblewrap sandbox",
    version
)]
struct Args {
    #[command(flatten)]
    exports: ExportArgs,
}

fn main() -> Result<()> {
    let args = Args::parse().exports;

    // The config can turn on verbose logging, so it is loaded first
    let config = ConfigLoader::load_with_priority(args.config.as_deref())
        .context("Failed to load configuration")?;

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&args, &config))
        .with_writer(std::io::stderr)
        .init();

    let home = env::var("HOME")
        .map(PathBuf::from)
        .map_err(|_| ExportError::EnvVarNotFound("HOME".to_string()))?;
    let cwd = env::current_dir().context("Failed to get current directory")?;

    let exports = build_exports(&args, &config, &home, &cwd)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_plan(&mut out, &exports, args.format)?;
    write_checks(&mut out, &exports, &args.check_paths, &cwd)?;

    Ok(())
}

fn log_filter(args: &ExportArgs, config: &Config) -> &'static str {
    if args.verbose || config.common.verbose {
        "debug"
    } else {
        "warn"
    }
}

/// Profile to start from: the one named on the command line, or the
/// config's default
fn select_profile(args: &ExportArgs, config: &Config) -> Option<String> {
    if args.no_profile {
        return None;
    }

    args.profile
        .clone()
        .or_else(|| config.common.default_profile.clone())
}

fn build_exports(args: &ExportArgs, config: &Config, home: &Path, cwd: &Path) -> Result<Exports> {
    let mut exports = Exports::new();

    if let Some(name) = select_profile(args, config) {
        let profile = resolve_profile(config, &name)
            .with_context(|| format!("Failed to resolve export profile '{}'", name))?;

        let report = profile.apply(&mut exports, home);
        info!(
            profile = %name,
            applied = report.applied,
            rejected = report.rejected.len(),
            "Applied export profile"
        );
    }

    let report = args.apply(&mut exports, cwd);
    debug!(
        applied = report.applied,
        rejected = report.rejected.len(),
        "Applied command-line exports"
    );

    Ok(exports)
}

fn write_plan<W: Write, F: HostFs>(
    out: &mut W,
    exports: &Exports<F>,
    format: OutputFormat,
) -> io::Result<()> {
    match format {
        OutputFormat::Args => {
            for directive in exports.directives() {
                let line = directive
                    .to_args()
                    .iter()
                    .map(|arg| arg.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" ");
                writeln!(out, "{}", line)?;
            }
        }
        OutputFormat::Plan => {
            for ep in exports.entries() {
                writeln!(out, "{:<8}{}", ep.mode.to_string(), ep.path.display())?;
            }
            if exports.host_fs() != FilesystemMode::None {
                writeln!(out, "{:<8}/run/host", format!("host-{}", exports.host_fs()))?;
            }
        }
    }

    Ok(())
}

fn write_checks<W: Write, F: HostFs>(
    out: &mut W,
    exports: &Exports<F>,
    paths: &[PathBuf],
    cwd: &Path,
) -> io::Result<()> {
    for path in paths {
        let path = cwd.join(path);
        let state = if exports.is_visible(&path) {
            "visible"
        } else {
            "hidden"
        };
        writeln!(out, "{}\t{}", state, path.display())?;
    }

    Ok(())
}
