//! Error types for export planning

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to load config from {path}: {source}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Environment variable {0} not found")]
    EnvVarNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reason an expose request was not added to the export table
#[derive(Debug, Error)]
pub enum ExposeError {
    #[error("Symlink chain too deep at {path}")]
    TooDeep { path: PathBuf },

    #[error("Not exposing relative path {0}")]
    NotAbsolute(PathBuf),

    #[error("Path does not exist: {path}: {source}")]
    Missing {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unsupported file type at {0}")]
    UnsupportedType(PathBuf),

    #[error("Path {path} is inside non-exportable root {root}")]
    DenyListed { path: PathBuf, root: &'static str },

    #[error("Failed to resolve symlink {path}: {source}")]
    BrokenLink {
        path: PathBuf,
        source: std::io::Error,
    },
}
