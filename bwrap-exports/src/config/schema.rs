//! Configuration schema types

use crate::mode::FilesystemMode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub common: CommonConfig,
    /// Named export profiles
    #[serde(default)]
    pub profiles: IndexMap<String, ExportProfile>,
}

/// Settings that are not tied to a profile
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CommonConfig {
    #[serde(default = "default_config_version")]
    pub config_version: String,
    #[serde(default)]
    pub verbose: bool,
    /// Profile used when none is requested explicitly
    #[serde(default)]
    pub default_profile: Option<String>,
}

fn default_config_version() -> String {
    "1.0".to_string()
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            verbose: false,
            default_profile: None,
        }
    }
}

/// A named set of export requests
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExportProfile {
    #[serde(default)]
    pub description: Option<String>,
    /// Paths to bind read-only (a leading `~` is the home directory)
    #[serde(default)]
    pub ro_paths: Vec<String>,
    /// Paths to bind read-write
    #[serde(default)]
    pub rw_paths: Vec<String>,
    /// Directories whose contents are hidden behind a tmpfs
    #[serde(default)]
    pub hidden_paths: Vec<String>,
    /// Directories that only need to exist as mountpoints
    #[serde(default)]
    pub dirs: Vec<String>,
    /// Pass the host /usr and /etc through to /run/host
    #[serde(default)]
    pub host_fs: Option<FilesystemMode>,
    /// Other profiles to extend (composition)
    #[serde(default)]
    pub extends: Vec<String>,
}
