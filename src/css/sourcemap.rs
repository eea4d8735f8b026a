//! Source-map adjustment for inserted fallback lines.
//!
//! A rev-3 source map encodes one generated line per `;` segment in the
//! `mappings` string. Remify only ever inserts whole lines, so the map
//! stays accurate after inserting an empty segment per inserted line.

use anyhow::{Context, Result};

/// Insert empty generated lines into a source map's mappings.
///
/// `inserted` holds 0-based output line indices in ascending order, as
/// produced by [`super::remify::remify`].
pub fn insert_empty_lines(map_json: &str, inserted: &[usize]) -> Result<String> {
    if inserted.is_empty() {
        return Ok(map_json.to_string());
    }

    let mut map: serde_json::Value =
        serde_json::from_str(map_json).context("source map is not valid JSON")?;

    let mappings = map
        .get("mappings")
        .and_then(|m| m.as_str())
        .unwrap_or("")
        .to_string();

    let mut lines: Vec<&str> = mappings.split(';').collect();
    for &idx in inserted {
        if idx <= lines.len() {
            lines.insert(idx, "");
        } else {
            lines.resize(idx, "");
            lines.push("");
        }
    }

    map["mappings"] = serde_json::Value::String(lines.join(";"));
    serde_json::to_string(&map).context("failed to re-serialize source map")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with(mappings: &str) -> String {
        format!(
            r#"{{"version":3,"sources":["style.scss"],"names":[],"mappings":"{mappings}"}}"#
        )
    }

    fn mappings_of(json: &str) -> String {
        let v: serde_json::Value = serde_json::from_str(json).unwrap();
        v["mappings"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_insert_middle_line() {
        let out = insert_empty_lines(&map_with("AAAA;AACA"), &[1]).unwrap();
        assert_eq!(mappings_of(&out), "AAAA;;AACA");
    }

    #[test]
    fn test_insert_multiple_ascending() {
        let out = insert_empty_lines(&map_with("AAAA;AACA;AAEA"), &[1, 3]).unwrap();
        assert_eq!(mappings_of(&out), "AAAA;;AACA;;AAEA");
    }

    #[test]
    fn test_no_insertions_is_identity() {
        let json = map_with("AAAA");
        assert_eq!(insert_empty_lines(&json, &[]).unwrap(), json);
    }

    #[test]
    fn test_insert_past_end_pads() {
        let out = insert_empty_lines(&map_with("AAAA"), &[3]).unwrap();
        assert_eq!(mappings_of(&out), "AAAA;;;");
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(insert_empty_lines("not json", &[0]).is_err());
    }
}
