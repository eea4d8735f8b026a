//! File watching and task dispatch.
//!
//! Watcher-first pattern: the watcher is registered and buffering events
//! before the dispatcher starts, so changes made during the initial build
//! are never lost.
//!
//! ```text
//! notify → channel → Debouncer (timing/dedup) → bindings → task graph
//! ```
//!
//! One failing task body produces one status notification and the loop
//! keeps running; only whole-process shutdown ends it.

mod binding;
mod debouncer;

pub use binding::{WatchBinding, default_bindings};

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use crossbeam::channel::{Receiver, RecvTimeoutError, unbounded};
use notify::{RecommendedWatcher, RecursiveMode, Watcher as _};

use crate::fileset::slash_path;
use crate::task::{TaskContext, TaskGraph};
use debouncer::Debouncer;

/// Upper bound on dispatcher sleep so shutdown is noticed promptly.
const MAX_POLL_MS: u64 = 500;

/// A registered watcher plus its dispatch rules.
pub struct Watcher {
    /// Watcher handle (must be kept alive)
    _watcher: RecommendedWatcher,
    events: Receiver<notify::Result<notify::Event>>,
    root: PathBuf,
    bindings: Vec<WatchBinding>,
    debouncer: Debouncer,
}

impl Watcher {
    /// Register a recursive watch on `root`. Events start buffering
    /// immediately; call [`run`](Self::run) to start dispatching them.
    pub fn register(root: &Path, bindings: Vec<WatchBinding>) -> Result<Self> {
        let (tx, events) = unbounded();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        // Symlinked roots (e.g. /tmp on macOS) report resolved paths
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        crate::log!("watch"; "watching {}", root.display());

        Ok(Self {
            _watcher: watcher,
            events,
            root,
            bindings,
            debouncer: Debouncer::new(),
        })
    }

    /// Dispatch loop (blocking). Returns when shutdown is requested.
    pub fn run(mut self, graph: &TaskGraph, ctx: &TaskContext) {
        loop {
            if crate::core::is_shutdown() {
                return;
            }

            let timeout = self
                .debouncer
                .sleep_duration()
                .min(Duration::from_millis(MAX_POLL_MS));

            match self.events.recv_timeout(timeout) {
                Ok(Ok(event)) => self.debouncer.add_event(&event),
                Ok(Err(e)) => crate::log!("watch"; "notify error: {}", e),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }

            if let Some(changes) = self.debouncer.take_if_ready() {
                let tasks = self.tasks_for(changes.keys());
                self.dispatch(&tasks, graph, ctx);
            }
        }
    }

    /// Map changed paths to task names, deduplicated in binding order.
    fn tasks_for<'a>(&self, paths: impl Iterator<Item = &'a PathBuf>) -> Vec<&'static str> {
        let rels: Vec<String> = paths
            .filter_map(|p| p.strip_prefix(&self.root).ok())
            .map(slash_path)
            .collect();

        self.bindings
            .iter()
            .filter(|binding| rels.iter().any(|rel| binding.matches(rel)))
            .map(|binding| binding.task)
            .collect()
    }

    /// Run each triggered task; a failure notifies once and moves on.
    fn dispatch(&self, tasks: &[&str], graph: &TaskGraph, ctx: &TaskContext) {
        for task in tasks {
            crate::log!("watch"; "change -> {}", task);
            if let Err(e) = graph.run(task, ctx) {
                crate::logger::status_error(&format!("{task} failed"), &format!("{e:#}"));
                if let Some(session) = ctx.session {
                    session.notify_error(task, &format!("{e:#}"));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    fn watcher_in(dir: &Path) -> Watcher {
        let bindings = default_bindings(&test_parse_config("")).unwrap();
        Watcher::register(dir, bindings).unwrap()
    }

    #[test]
    fn test_tasks_for_maps_and_dedups() {
        let dir = tempfile::tempdir().unwrap();
        let watcher = watcher_in(dir.path());
        let root = &watcher.root;

        let changed = [
            root.join("sass/style.scss"),
            root.join("sass/_nav.scss"),
            root.join("js/app.js"),
        ];
        let tasks = watcher.tasks_for(changed.iter());
        assert_eq!(tasks, vec!["styles", "scripts"]);
    }

    #[test]
    fn test_paths_outside_root_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let watcher = watcher_in(dir.path());

        let changed = [PathBuf::from("/elsewhere/sass/style.scss")];
        assert!(watcher.tasks_for(changed.iter()).is_empty());
    }

    #[test]
    fn test_artifact_writes_do_not_trigger() {
        let dir = tempfile::tempdir().unwrap();
        let watcher = watcher_in(dir.path());
        let root = &watcher.root;

        let changed = [root.join("style.css"), root.join("js/app.min.js")];
        assert!(watcher.tasks_for(changed.iter()).is_empty());
    }
}
