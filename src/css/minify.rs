//! CSS minification for the `.min.css` artifact.
//!
//! "Unsafe" structural merging: duplicate and overlapping rules are
//! combined even when that can reorder the cascade for order-dependent
//! input. Accepted tradeoff for size.

use std::path::Path;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};

use super::optimize::browser_targets;
use crate::error::PipelineError;

/// Minify CSS source, stripping comments and whitespace and merging rules.
pub fn minify_css(path: &Path, source: &str) -> Result<String, PipelineError> {
    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: path.display().to_string(),
            ..ParserOptions::default()
        },
    )
    .map_err(|e| PipelineError::transform(path, e.to_string()))?;

    stylesheet
        .minify(MinifyOptions {
            targets: browser_targets(),
            ..MinifyOptions::default()
        })
        .map_err(|e| PipelineError::transform(path, e.to_string()))?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            targets: browser_targets(),
            ..PrinterOptions::default()
        })
        .map_err(|e| PipelineError::transform(path, e.to_string()))?;

    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_minify_strips_comments_and_whitespace() {
        let source = "/* banner */\na {\n  color: red;\n}\n";
        let out = minify_css(Path::new("style.css"), source).unwrap();
        assert!(!out.contains("banner"));
        assert!(!out.contains('\n') || out.trim_end().lines().count() == 1);
        assert!(out.contains("color:red"));
    }

    #[test]
    fn test_minify_merges_duplicate_rules() {
        let source = "a { color: red; }\na { background: blue; }\n";
        let out = minify_css(Path::new("style.css"), source).unwrap();
        assert_eq!(out.matches('{').count(), 1);
    }

    #[test]
    fn test_minify_never_grows_rule_count() {
        let source = "a { color: red; }\n@media (min-width: 600px) { b { color: blue; } }\n";
        let expanded_rules = source.matches('{').count();
        let out = minify_css(Path::new("style.css"), source).unwrap();
        assert!(out.matches('{').count() <= expanded_rules);
    }

    #[test]
    fn test_minify_is_idempotent() {
        let source = "a { color: red; margin: 0 auto; }\n";
        let once = minify_css(Path::new("style.css"), source).unwrap();
        let twice = minify_css(Path::new("style.min.css"), &once).unwrap();
        assert_eq!(once, twice);
    }
}
