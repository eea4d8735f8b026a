//! `[scripts]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [scripts]
//! dir = "js"                # script directory, relative to the root
//! include = ["*.js"]        # inputs, relative to dir
//! exclude = ["*.min.js"]    # never re-select minified outputs
//! ```

use serde::{Deserialize, Serialize};

/// Script pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Directory holding script sources, relative to the project root.
    pub dir: String,

    /// Include globs, relative to `dir`.
    pub include: Vec<String>,

    /// Exclude globs, relative to `dir`. The minified naming convention
    /// stays excluded so outputs are never re-selected as inputs.
    pub exclude: Vec<String>,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            dir: "js".into(),
            include: vec!["*.js".into()],
            exclude: vec!["*.min.js".into()],
        }
    }
}

impl ScriptsConfig {
    /// Watch globs relative to the project root (`js/*.js`, ...).
    pub fn watch_includes(&self) -> Vec<String> {
        self.include
            .iter()
            .map(|p| format!("{}/{}", self.dir, p))
            .collect()
    }

    /// Exclude globs relative to the project root (`js/*.min.js`, ...).
    pub fn watch_excludes(&self) -> Vec<String> {
        self.exclude
            .iter()
            .map(|p| format!("{}/{}", self.dir, p))
            .collect()
    }
}
