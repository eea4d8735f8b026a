//! `[site]` section configuration.
//!
//! Identifies the upstream development site the proxy forwards to.
//!
//! # Example
//!
//! ```toml
//! [site]
//! host = "genesis-sample.test"   # proxy target + certificate hostname
//! user = "alice"                 # used only to derive the certificate path
//! ```

use serde::{Deserialize, Serialize};

/// Upstream site settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site hostname. Used for both the reverse-proxy target
    /// (`https://{host}`) and the derived certificate file names.
    pub host: String,

    /// Local user identifier. Used only to construct the default
    /// certificate path under `/Users/{user}/.valet/Certificates/`.
    pub user: String,
}
