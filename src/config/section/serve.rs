//! `[serve]` section configuration.
//!
//! Contains development proxy settings.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! port = 8000                 # HTTPS proxy port
//! ws_port = 35729             # live-reload WebSocket port
//! tls_key = "~/certs/example.test.key"    # optional override
//! tls_cert = "~/certs/example.test.crt"   # optional override
//! ```
//!
//! When `tls_key`/`tls_cert` are unset the paths are derived from
//! `[site]` as `/Users/{user}/.valet/Certificates/{host}.key` / `.crt`.

use serde::{Deserialize, Serialize};

/// Development proxy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// HTTPS port the proxy listens on.
    pub port: u16,

    /// WebSocket port for the live-reload session.
    pub ws_port: u16,

    /// TLS private key path override (tilde-expanded).
    pub tls_key: Option<String>,

    /// TLS certificate path override (tilde-expanded).
    pub tls_cert: Option<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            ws_port: 35729,
            tls_key: None,
            tls_cert: None,
        }
    }
}
