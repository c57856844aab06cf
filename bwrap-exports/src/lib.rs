//! Filesystem export planning for bubblewrap sandboxes
//!
//! Collects requests to expose host paths (read-only, read-write, hidden
//! behind a tmpfs, or as bare directories), resolves symlinks along the
//! way, and turns the merged result into an ordered list of bwrap
//! directives. The finished table can also be asked whether a given host
//! path will be reachable inside the sandbox.

pub mod args;
pub mod config;
pub mod directive;
mod emit;
pub mod error;
pub mod exports;
pub mod host;
mod mapped;
pub mod mode;
pub mod path;
mod visibility;

#[cfg(test)]
mod memfs;

pub use args::{ExportArgs, OutputFormat};
pub use config::{ApplyReport, Config, ConfigLoader, ExportProfile};
pub use directive::Directive;
pub use error::{ExportError, ExposeError, Result};
pub use exports::{ExportedPath, Exports};
pub use host::{FileKind, HostFs, RealFs};
pub use mode::{Access, ExportMode, FilesystemMode};
