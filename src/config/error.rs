//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors. All fatal at startup: the watch
/// orchestrator never registers a watcher once one of these surfaces.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),

    /// TLS material could not be located. There is no plain-HTTP fallback.
    #[error("TLS file not found: `{0}`\n  hint: {1}")]
    MissingTls(PathBuf, String),
}
