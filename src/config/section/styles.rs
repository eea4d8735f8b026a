//! `[styles]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! entry = "sass/style.scss"       # stylesheet entry point
//! out_dir = "."                   # where style.css / style.min.css land
//! watch = ["sass/**/*.scss"]      # globs bound to the styles task
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Stylesheet pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Entry-point Sass file, relative to the project root. Its import
    /// graph is resolved by the compiler.
    pub entry: String,

    /// Output directory for the compiled artifacts, relative to the root.
    pub out_dir: String,

    /// Glob patterns (relative to the root) that re-trigger the styles
    /// task while watching.
    pub watch: Vec<String>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            entry: "sass/style.scss".into(),
            out_dir: ".".into(),
            watch: vec!["sass/**/*.scss".into()],
        }
    }
}

impl StylesConfig {
    /// File stem of the compiled artifact, taken from the entry file
    /// (`sass/style.scss` -> `style`).
    pub fn artifact_stem(&self) -> &str {
        Path::new(&self.entry)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("style")
    }
}
