//! Pipeline configuration management for `pipewright.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | `[site]`    | Upstream hostname + user (certificate path)         |
//! | `[serve]`   | Proxy port, WebSocket port, TLS path overrides      |
//! | `[styles]`  | Sass entry, output directory, watch globs           |
//! | `[scripts]` | Script directory, include/exclude globs             |
//! | `[markup]`  | Reload-only watch globs                             |
//!
//! A missing config file is not an error: every section has defaults and
//! the project root falls back to the current directory. Validation of the
//! proxy surface (host, TLS material) happens when the watch task starts.

pub mod section;

mod error;

pub use error::ConfigError;
pub use section::{MarkupConfig, ScriptsConfig, ServeConfig, SiteConfig, StylesConfig};

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::cli::Cli;

/// Root configuration structure representing pipewright.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Upstream site settings
    pub site: SiteConfig,

    /// Development proxy settings
    pub serve: ServeConfig,

    /// Stylesheet pipeline settings
    pub styles: StylesConfig,

    /// Script pipeline settings
    pub scripts: ScriptsConfig,

    /// Markup watch settings
    pub markup: MarkupConfig,
}

impl PipelineConfig {
    /// Load configuration, resolving the project root.
    ///
    /// The config path comes from `-C/--config` (default `pipewright.toml`),
    /// resolved against the current directory. When the file exists its
    /// parent becomes the project root; otherwise defaults apply with the
    /// current directory as root.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()
            .map_err(|e| ConfigError::Io(PathBuf::from("."), e))?;
        let config_path = cwd.join(&cli.config);

        let mut config = if config_path.is_file() {
            let raw = fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::Io(config_path.clone(), e))?;
            toml::from_str::<PipelineConfig>(&raw)?
        } else {
            PipelineConfig::default()
        };

        config.root = config_path.parent().map(Path::to_path_buf).unwrap_or(cwd);
        config.config_path = config_path;
        config.validate()?;
        Ok(config)
    }

    /// Resolve a project-relative path against the root.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Output directory for stylesheet artifacts.
    pub fn styles_out_dir(&self) -> PathBuf {
        self.root_join(&self.styles.out_dir)
    }

    /// Structural checks that hold for every task. Proxy-only requirements
    /// (hostname, TLS material) are enforced by the watch orchestrator.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.styles.entry.trim().is_empty() {
            return Err(ConfigError::Validation(
                "[styles] entry must not be empty".into(),
            ));
        }
        if self.scripts.dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "[scripts] dir must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Validate the proxy surface before entering the Watching state.
    pub fn validate_for_serve(&self) -> Result<(), ConfigError> {
        if self.site.host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "[site] host is required for the watch task (proxy upstream)".into(),
            ));
        }
        Ok(())
    }
}

/// Parse a config from a TOML string (tests only).
#[cfg(test)]
pub fn test_parse_config(toml_str: &str) -> PipelineConfig {
    toml::from_str(toml_str).expect("test config should parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parses_with_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.serve.port, 8000);
        assert_eq!(config.styles.entry, "sass/style.scss");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_section_rejected_softly() {
        // serde(default) tolerates missing sections; unknown keys are kept
        // permissive the way toml-to-serde defaults behave.
        let config = toml::from_str::<PipelineConfig>("[site]\nhost = \"a.test\"");
        assert!(config.is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_entry() {
        let config = test_parse_config("[styles]\nentry = \"  \"");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_for_serve_requires_host() {
        let config = test_parse_config("");
        assert!(config.validate_for_serve().is_err());

        let config = test_parse_config("[site]\nhost = \"example.test\"");
        assert!(config.validate_for_serve().is_ok());
    }
}
