//! Built-in default configuration embedded in the binary
//!
//! The builtin configuration serves as the lowest-priority configuration layer,
//! providing a handful of ready-made export profiles. It is lazy-loaded on first
//! access and cached using LazyLock to avoid repeated deserialization.

use super::schema::Config;
use std::sync::LazyLock;

/// Lazy-initialized builtin configuration
static BUILTIN_CONFIG: LazyLock<Config> = LazyLock::new(load_builtin_config);

/// Get the builtin configuration
pub fn get_builtin() -> &'static Config {
    &BUILTIN_CONFIG
}

/// Load builtin configuration from embedded TOML string
fn load_builtin_config() -> Config {
    const BUILTIN_TOML: &str = include_str!("../builtin-exports.toml");
    toml::from_str(BUILTIN_TOML).expect("Failed to parse builtin configuration")
}
