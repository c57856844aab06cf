//! Configuration file loading and merging

use super::builtin;
use super::schema::Config;
use crate::error::{ExportError, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for in the working directory and its parents
pub const PROJECT_CONFIG_NAME: &str = ".bwexports.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Find user config by checking environment and standard locations
    pub fn find_user_config() -> Option<PathBuf> {
        // 1. $BW_EXPORTS_CONFIG
        if let Ok(path) = env::var("BW_EXPORTS_CONFIG") {
            let p = PathBuf::from(path);
            if p.exists() {
                return Some(p);
            }
        }

        // 2. $XDG_CONFIG_HOME/bw-exports/config.toml
        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            let p = PathBuf::from(xdg).join("bw-exports/config.toml");
            if p.exists() {
                return Some(p);
            }
        }

        // 3. ~/.config/bw-exports/config.toml
        if let Ok(home) = env::var("HOME") {
            let p = PathBuf::from(home).join(".config/bw-exports/config.toml");
            if p.exists() {
                return Some(p);
            }
        }

        None
    }

    /// Find project config by searching up the directory tree from `start`
    pub fn find_project_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let project_config = current.join(PROJECT_CONFIG_NAME);
            if project_config.exists() {
                return Some(project_config);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Load config from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ExportError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load built-in configuration embedded in the binary
    pub fn load_builtin() -> Config {
        builtin::get_builtin().clone()
    }

    /// Merge a higher-priority config on top of `base`.
    /// Profiles are replaced by name, the common table is replaced whole.
    pub fn merge_configs(mut base: Config, override_cfg: Config) -> Config {
        for (name, profile) in override_cfg.profiles {
            base.profiles.insert(name, profile);
        }

        base.common = override_cfg.common;

        base
    }

    /// Load with full config priority order
    /// Priority: built-in < user < project < explicit
    pub fn load_with_priority(explicit_config: Option<&Path>) -> Result<Config> {
        let mut configs = vec![Self::load_builtin()];

        // User config
        if let Some(user_path) = Self::find_user_config() {
            tracing::debug!("Loading user config from {:?}", user_path);
            configs.push(Self::load_from_file(&user_path)?);
        }

        // Project config
        let cwd = env::current_dir()?;
        if let Some(project_path) = Self::find_project_config(&cwd) {
            tracing::debug!("Loading project config from {:?}", project_path);
            configs.push(Self::load_from_file(&project_path)?);
        }

        // Explicit --config option (highest priority)
        if let Some(explicit_path) = explicit_config {
            tracing::debug!("Loading explicit config from {:?}", explicit_path);
            configs.push(Self::load_from_file(explicit_path)?);
        }

        // Merge all configs, later ones override earlier ones
        Ok(configs
            .into_iter()
            .reduce(Self::merge_configs)
            .unwrap_or_default())
    }
}
