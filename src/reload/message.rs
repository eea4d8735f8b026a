//! Live-reload message protocol.
//!
//! JSON messages sent over the WebSocket between the dev session and
//! browser clients.
//!
//! # Message Types
//!
//! - `reload`: trigger full page reload (scripts, markup)
//! - `css`: swap an updated stylesheet without a page navigation
//! - `connected`: handshake acknowledgement
//! - `error`: transform failure for an overlay, no reload

use serde::{Deserialize, Serialize};

/// Live-reload message sent over the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReloadMessage {
    /// Full page reload.
    Reload {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },

    /// Stylesheet update (fast path, no navigation).
    Css {
        /// Artifact file name, e.g. "style.css"
        target: String,
        /// New CSS content (used when no matching <link> exists)
        content: String,
    },

    /// Connection established.
    Connected {
        /// Server version for compatibility check
        version: String,
    },

    /// Transform error (display overlay, no reload).
    Error { path: String, error: String },
}

impl ReloadMessage {
    pub fn reload(reason: impl Into<String>) -> Self {
        Self::Reload {
            reason: Some(reason.into()),
        }
    }

    pub fn css(target: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Css {
            target: target.into(),
            content: content.into(),
        }
    }

    pub fn connected() -> Self {
        Self::Connected {
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn error(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self::Error {
            path: path.into(),
            error: error.into(),
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"reload"}"#.to_string())
    }
}
