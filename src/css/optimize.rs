//! Stylesheet optimization: vendor prefixing, rule and media-query
//! consolidation, expanded printing with a source map.
//!
//! Uses lightningcss end to end; the browser floor mirrors the old
//! autoprefixer defaults and is deliberately not configurable.

use std::path::Path;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};
use parcel_sourcemap::SourceMap;

use crate::error::PipelineError;

/// The optimized expanded artifact plus its source map JSON.
#[derive(Debug)]
pub struct Optimized {
    pub css: String,
    pub map: String,
}

/// Encode a browser version the way lightningcss expects.
const fn v(major: u32) -> u32 {
    major << 16
}

/// Browser floor for prefixing and syntax lowering.
pub fn browser_targets() -> Targets {
    Targets {
        browsers: Some(Browsers {
            chrome: Some(v(60)),
            edge: Some(v(16)),
            firefox: Some(v(55)),
            ios_saf: Some(v(11)),
            opera: Some(v(48)),
            safari: Some(v(11)),
            ..Browsers::default()
        }),
        ..Targets::default()
    }
}

/// Prefix and consolidate compiled CSS, printing expanded output with a
/// source map.
pub fn optimize(entry: &Path, source: &str) -> Result<Optimized, PipelineError> {
    let filename = entry.display().to_string();
    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename,
            ..ParserOptions::default()
        },
    )
    .map_err(|e| PipelineError::transform(entry, e.to_string()))?;

    stylesheet
        .minify(MinifyOptions {
            targets: browser_targets(),
            ..MinifyOptions::default()
        })
        .map_err(|e| PipelineError::transform(entry, e.to_string()))?;

    let mut map = SourceMap::new("/");
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: false,
            source_map: Some(&mut map),
            targets: browser_targets(),
            ..PrinterOptions::default()
        })
        .map_err(|e| PipelineError::transform(entry, e.to_string()))?;

    let map_json = map
        .to_json(None)
        .map_err(|e| PipelineError::transform(entry, e.to_string()))?;

    Ok(Optimized {
        css: result.code,
        map: map_json,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_optimize_adds_vendor_prefixes() {
        let source = ".nav {\n  user-select: none;\n}\n";
        let out = optimize(Path::new("style.scss"), source).unwrap();
        assert!(out.css.contains("-webkit-user-select"));
        assert!(out.css.contains("user-select: none"));
    }

    #[test]
    fn test_optimize_output_stays_expanded() {
        let source = "a {\n  color: red;\n  background: blue;\n}\n";
        let out = optimize(Path::new("style.scss"), source).unwrap();
        assert!(out.css.contains('\n'));
        assert!(out.css.contains("color:"));
    }

    #[test]
    fn test_optimize_emits_source_map() {
        let source = "a {\n  color: red;\n}\n";
        let out = optimize(Path::new("style.scss"), source).unwrap();
        let map: serde_json::Value = serde_json::from_str(&out.map).unwrap();
        assert!(map.get("mappings").is_some());
    }

    #[test]
    fn test_optimize_rejects_invalid_selector() {
        // An empty declaration value parses fine; a malformed selector
        // does not
        let err = optimize(Path::new("style.scss"), ".. { color: red; }").unwrap_err();
        assert!(err.is_transform());
    }

    #[test]
    fn test_optimize_consolidates_duplicate_selectors() {
        let source = "a {\n  color: red;\n}\n\na {\n  background: blue;\n}\n";
        let out = optimize(Path::new("style.scss"), source).unwrap();
        // Two rules with the same selector collapse into one
        assert_eq!(out.css.matches("a {").count(), 1);
    }
}
