//! Pipeline error taxonomy.
//!
//! Two recoverable classes flow out of task bodies:
//! - `Transform`: bad syntax in a watched source. The watch loop reports it
//!   once and keeps listening.
//! - `Io`: a read/write failure on an artifact path. Halts the invocation
//!   that hit it, nothing else.
//!
//! Configuration failures (missing TLS material, bad toml) live in
//! [`crate::config::ConfigError`] and are fatal at startup instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors produced while running a task pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A transform step rejected its input (syntax error in a source file).
    #[error("{path}: {message}")]
    Transform { path: String, message: String },

    /// Reading or writing an artifact failed.
    #[error("io error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}

impl PipelineError {
    /// Build a transform error for a source path.
    pub fn transform(path: &Path, message: impl Into<String>) -> Self {
        Self::Transform {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Build an io error for an artifact path.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io(path.to_path_buf(), source)
    }

    /// True for the fail-soft class (watch mode notifies and continues).
    #[allow(dead_code)] // Used by tests; watch mode treats both classes fail-soft
    pub fn is_transform(&self) -> bool {
        matches!(self, Self::Transform { .. })
    }
}
