//! Task model: named units of work composed into an explicit DAG.
//!
//! Each pipeline registers its tasks into a shared [`TaskGraph`]; the CLI
//! and the watch dispatcher both run tasks by name, so a watched file
//! change and a manual invocation take the same path.

mod graph;

pub use graph::{GraphError, TaskGraph};

use crate::config::PipelineConfig;
use crate::reload::ReloadSession;

/// Everything a task body may touch. The reload session is an explicit
/// handle, present only while the watch orchestrator is serving.
pub struct TaskContext<'a> {
    pub config: &'a PipelineConfig,
    pub session: Option<&'a ReloadSession>,
}

/// A task body: borrows the context, returns the first failure.
pub type TaskBody = Box<dyn Fn(&TaskContext) -> anyhow::Result<()> + Send + Sync>;

/// Reload-only task bound to markup globs: no transform, just a full
/// browser reload when a session is live.
pub const RELOAD_TASK: &str = "reload";

/// Register the reload-only task.
pub fn register_reload(graph: &mut TaskGraph) {
    graph.add(RELOAD_TASK, &[], |ctx| {
        if let Some(session) = ctx.session {
            session.reload("markup changed");
        }
        Ok(())
    });
}
