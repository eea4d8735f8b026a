//! Sass compilation, expanded output style.
//!
//! The entry file's `@use`/`@import` graph is resolved relative to the
//! entry by the compiler itself.

use std::path::Path;

use crate::error::PipelineError;

/// Compile a Sass entry file to expanded-format CSS.
pub fn compile(entry: &Path) -> Result<String, PipelineError> {
    let options = grass::Options::default().style(grass::OutputStyle::Expanded);
    grass::from_path(entry, &options).map_err(|e| PipelineError::transform(entry, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_compile_expands_nesting() {
        let temp = TempDir::new().unwrap();
        let entry = temp.path().join("style.scss");
        fs::write(&entry, ".site-header { a { color: red; } }").unwrap();

        let css = compile(&entry).unwrap();
        assert!(css.contains(".site-header a"));
        assert!(css.contains("color: red"));
    }

    #[test]
    fn test_compile_resolves_partials() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("_colors.scss"), "$accent: #336699;").unwrap();
        let entry = temp.path().join("style.scss");
        fs::write(&entry, "@use \"colors\";\nh1 { color: colors.$accent; }").unwrap();

        let css = compile(&entry).unwrap();
        assert!(css.contains("#336699") || css.contains("#369"));
    }

    #[test]
    fn test_compile_syntax_error_is_transform() {
        let temp = TempDir::new().unwrap();
        let entry = temp.path().join("style.scss");
        fs::write(&entry, ".broken { color: ").unwrap();

        let err = compile(&entry).unwrap_err();
        assert!(err.is_transform());
    }

    #[test]
    fn test_compile_missing_entry_is_transform() {
        let temp = TempDir::new().unwrap();
        let err = compile(&temp.path().join("missing.scss")).unwrap_err();
        assert!(err.is_transform());
    }
}
