//! Ordered file-set selection by include/exclude glob patterns.
//!
//! Order is sorted-by-path so concatenation-style consumers produce
//! deterministic output; correctness never depends on it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::error::PipelineError;

/// An ordered sequence of paths selected from a directory walk.
#[derive(Debug, Clone)]
pub struct FileSet {
    files: Vec<PathBuf>,
}

impl FileSet {
    /// Select files under `root` matching any include glob and no exclude
    /// glob. Globs are matched against `/`-separated paths relative to
    /// `root`. Results are sorted.
    pub fn select(root: &Path, include: &[String], exclude: &[String]) -> Result<Self> {
        let include_set = build_globset(include)?;
        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude)?)
        };

        let mut files = Vec::new();
        for entry in jwalk::WalkDir::new(root).sort(true) {
            let Ok(entry) = entry else { continue };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let rel = slash_path(rel);
            if !include_set.is_match(&rel) {
                continue;
            }
            if let Some(ref exclude) = exclude_set
                && exclude.is_match(&rel)
            {
                continue;
            }
            files.push(path);
        }

        files.sort();
        Ok(Self { files })
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

/// Build a GlobSet from simple string patterns.
pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// Relative path with forward slashes for glob matching.
pub fn slash_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        raw.into_owned()
    } else {
        raw.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Write an artifact only when its content changed.
///
/// Returns `true` when bytes hit the disk. Unchanged content is skipped
/// (blake3 comparison), which keeps re-runs byte-for-byte idempotent and
/// avoids re-triggering watchers on no-op writes.
pub fn write_if_changed(path: &Path, content: &[u8]) -> Result<bool, PipelineError> {
    if let Ok(existing) = fs::read(path)
        && blake3::hash(&existing) == blake3::hash(content)
    {
        return Ok(false);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| PipelineError::io(path, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_select_excludes_minified_outputs() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "js/app.js");
        touch(temp.path(), "js/app.min.js");
        touch(temp.path(), "js/vendor.js");

        let set = FileSet::select(
            temp.path(),
            &["js/*.js".into()],
            &["js/*.min.js".into()],
        )
        .unwrap();

        let names: Vec<_> = set
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["app.js", "vendor.js"]);
    }

    #[test]
    fn test_select_order_is_sorted() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "js/z.js");
        touch(temp.path(), "js/a.js");

        let set = FileSet::select(temp.path(), &["js/*.js".into()], &[]).unwrap();
        let names: Vec<_> = set
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.js", "z.js"]);
    }

    #[test]
    fn test_select_empty_dir() {
        let temp = TempDir::new().unwrap();
        let set = FileSet::select(temp.path(), &["**/*.js".into()], &[]).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_write_if_changed_skips_identical_content() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.css");

        assert!(write_if_changed(&path, b"a{color:red}").unwrap());
        assert!(!write_if_changed(&path, b"a{color:red}").unwrap());
        assert!(write_if_changed(&path, b"a{color:blue}").unwrap());
        assert_eq!(fs::read(&path).unwrap(), b"a{color:blue}");
    }

    #[test]
    fn test_invalid_glob_is_an_error() {
        assert!(build_globset(&["a{".into()]).is_err());
    }
}
