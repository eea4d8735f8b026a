//! Script pipeline task.
//!
//! Selects every script in the configured directory except files already
//! carrying the `.min.js` convention, writes a minified sibling per input
//! and triggers a full reload of any live session (scripts cannot be
//! hot-swapped like styles).

mod minify;

use std::fs;

use crate::error::PipelineError;
use crate::fileset::{FileSet, write_if_changed};
use crate::logger;
use crate::task::{TaskContext, TaskGraph};

pub const TASK: &str = "scripts";

/// Register the scripts task.
pub fn register(graph: &mut TaskGraph) {
    graph.add(TASK, &[], minify_all);
}

/// Minify every selected script into a `.min.js` sibling.
pub fn minify_all(ctx: &TaskContext) -> anyhow::Result<()> {
    let config = ctx.config;
    let dir = config.root_join(&config.scripts.dir);
    if !dir.is_dir() {
        crate::debug!("scripts"; "no script directory at {}", dir.display());
        return Ok(());
    }

    let set = FileSet::select(&dir, &config.scripts.include, &config.scripts.exclude)?;
    let mut written = false;

    for path in set.iter() {
        let source = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        let minified = minify::minify_js(path, &source)?;
        let out_path = path.with_extension("min.js");
        written |= write_if_changed(&out_path, minified.as_bytes())?;
    }

    if written && let Some(session) = ctx.session {
        session.reload("scripts changed");
    }
    logger::status_success("scripts are minified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use std::fs;
    use tempfile::TempDir;

    fn theme_config(temp: &TempDir) -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.root = temp.path().to_path_buf();
        config
    }

    fn ctx(config: &PipelineConfig) -> TaskContext<'_> {
        TaskContext {
            config,
            session: None,
        }
    }

    #[test]
    fn test_minify_all_writes_siblings() {
        let temp = TempDir::new().unwrap();
        let config = theme_config(&temp);
        fs::create_dir_all(temp.path().join("js")).unwrap();
        fs::write(
            temp.path().join("js/app.js"),
            "function add(a, b) {\n  return a + b;\n}\nwindow.add = add;\n",
        )
        .unwrap();

        minify_all(&ctx(&config)).unwrap();
        assert!(temp.path().join("js/app.min.js").is_file());
    }

    #[test]
    fn test_minified_outputs_are_never_inputs() {
        let temp = TempDir::new().unwrap();
        let config = theme_config(&temp);
        fs::create_dir_all(temp.path().join("js")).unwrap();
        fs::write(temp.path().join("js/app.js"), "console.log(1);\n").unwrap();

        minify_all(&ctx(&config)).unwrap();
        let first = fs::read(temp.path().join("js/app.min.js")).unwrap();

        // Second run: app.min.js exists but must not become an input, and
        // unchanged input yields byte-identical output.
        minify_all(&ctx(&config)).unwrap();
        let second = fs::read(temp.path().join("js/app.min.js")).unwrap();
        assert_eq!(first, second);
        assert!(!temp.path().join("js/app.min.min.js").exists());
    }

    #[test]
    fn test_missing_script_dir_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let config = theme_config(&temp);
        assert!(minify_all(&ctx(&config)).is_ok());
    }

    #[test]
    fn test_syntax_error_halts_invocation() {
        let temp = TempDir::new().unwrap();
        let config = theme_config(&temp);
        fs::create_dir_all(temp.path().join("js")).unwrap();
        fs::write(temp.path().join("js/bad.js"), "function (").unwrap();

        assert!(minify_all(&ctx(&config)).is_err());
        assert!(!temp.path().join("js/bad.min.js").exists());
    }
}
