//! Configuration system for bw-exports
//!
//! Export profiles are read from TOML files layered on top of a built-in
//! default set:
//! - schema: file format
//! - loader: finding and merging config layers
//! - resolver: `extends` composition
//! - apply: feeding a profile into an export table

pub mod apply;
pub mod builtin;
pub mod loader;
pub mod resolver;
pub mod schema;

// Re-export commonly used types
pub use apply::{expand_tilde, ApplyReport};
pub use loader::ConfigLoader;
pub use resolver::resolve_profile;
pub use schema::{CommonConfig, Config, ExportProfile};
