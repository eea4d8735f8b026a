//! `[markup]` section configuration.
//!
//! Markup sources carry no transform; a change only triggers a full
//! browser reload.
//!
//! ```toml
//! [markup]
//! watch = ["*.php", "lib/**/*.php"]
//! ```

use serde::{Deserialize, Serialize};

/// Markup watch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    /// Glob patterns (relative to the root) that trigger a page reload.
    pub watch: Vec<String>,
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            watch: vec!["*.php".into(), "lib/**/*.php".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_markup_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(
            config.markup.watch,
            vec!["*.php".to_string(), "lib/**/*.php".to_string()]
        );
    }

    #[test]
    fn test_markup_config_custom() {
        let config = test_parse_config("[markup]\nwatch = [\"templates/**/*.html\"]");
        assert_eq!(config.markup.watch, vec!["templates/**/*.html"]);
    }
}
