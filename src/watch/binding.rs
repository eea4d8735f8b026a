//! Glob-to-task bindings.
//!
//! Each binding pairs a task name with include/exclude glob sets; the
//! dispatcher matches changed paths (relative to the project root)
//! against them to decide which tasks to run.

use anyhow::Result;
use globset::GlobSet;

use crate::config::PipelineConfig;
use crate::fileset::build_globset;

/// One watch rule: paths matching the globs trigger `task`.
pub struct WatchBinding {
    pub task: &'static str,
    include: GlobSet,
    exclude: Option<GlobSet>,
}

impl WatchBinding {
    fn new(task: &'static str, include: &[String], exclude: &[String]) -> Result<Self> {
        let include = build_globset(include)?;
        let exclude = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude)?)
        };
        Ok(Self {
            task,
            include,
            exclude,
        })
    }

    /// Match a `/`-separated root-relative path.
    pub fn matches(&self, rel: &str) -> bool {
        if !self.include.is_match(rel) {
            return false;
        }
        match &self.exclude {
            Some(exclude) => !exclude.is_match(rel),
            None => true,
        }
    }
}

/// The standard rule set: stylesheets, scripts, markup (reload only).
///
/// Binding order is dispatch order; an empty glob list yields a binding
/// that never fires.
pub fn default_bindings(config: &PipelineConfig) -> Result<Vec<WatchBinding>> {
    Ok(vec![
        WatchBinding::new(crate::css::TASK, &config.styles.watch, &[])?,
        WatchBinding::new(
            crate::js::TASK,
            &config.scripts.watch_includes(),
            &config.scripts.watch_excludes(),
        )?,
        WatchBinding::new(crate::task::RELOAD_TASK, &config.markup.watch, &[])?,
    ])
}
