//! Named-task DAG with topological execution.
//!
//! Tasks are nodes, prerequisite declarations are edges. Registration is
//! order-preserving so execution is deterministic; `validate` rejects
//! unknown references and cycles before anything runs.

use std::collections::HashMap;

use thiserror::Error;

use super::{TaskBody, TaskContext};

/// Task graph construction/lookup errors.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("unknown task `{0}`")]
    UnknownTask(String),

    #[error("task `{task}` depends on unknown task `{dep}`")]
    UnknownDependency { task: String, dep: String },

    #[error("task dependency cycle through `{0}`")]
    Cycle(String),
}

struct Node {
    deps: Vec<String>,
    /// None for alias tasks (prerequisites only, no work of their own).
    body: Option<TaskBody>,
}

/// Directed acyclic graph of named tasks.
pub struct TaskGraph {
    nodes: HashMap<String, Node>,
    /// Registration order, kept for deterministic traversal.
    order: Vec<String>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a task with prerequisites and a body.
    pub fn add<F>(&mut self, name: &str, deps: &[&str], body: F)
    where
        F: Fn(&TaskContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.insert(name, deps, Some(Box::new(body)));
    }

    /// Register an alias: prerequisites only, no body.
    pub fn add_alias(&mut self, name: &str, deps: &[&str]) {
        self.insert(name, deps, None);
    }

    fn insert(&mut self, name: &str, deps: &[&str], body: Option<TaskBody>) {
        if !self.nodes.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.nodes.insert(
            name.to_string(),
            Node {
                deps: deps.iter().map(|d| d.to_string()).collect(),
                body,
            },
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Reject unknown dependency references and cycles.
    pub fn validate(&self) -> Result<(), GraphError> {
        for name in &self.order {
            for dep in &self.nodes[name].deps {
                if !self.nodes.contains_key(dep) {
                    return Err(GraphError::UnknownDependency {
                        task: name.clone(),
                        dep: dep.clone(),
                    });
                }
            }
        }
        // DFS cycle check over every root
        for name in &self.order {
            self.execution_order(name)?;
        }
        Ok(())
    }

    /// Topological execution order ending at `name` (prerequisites first,
    /// each task at most once).
    pub fn execution_order(&self, name: &str) -> Result<Vec<&str>, GraphError> {
        let mut done = Vec::new();
        let mut in_progress = Vec::new();
        self.visit(name, &mut done, &mut in_progress)?;
        Ok(done)
    }

    fn visit<'a>(
        &'a self,
        name: &str,
        done: &mut Vec<&'a str>,
        in_progress: &mut Vec<&'a str>,
    ) -> Result<(), GraphError> {
        let (key, node) = self
            .nodes
            .get_key_value(name)
            .ok_or_else(|| GraphError::UnknownTask(name.to_string()))?;

        if done.contains(&key.as_str()) {
            return Ok(());
        }
        if in_progress.contains(&key.as_str()) {
            return Err(GraphError::Cycle(key.clone()));
        }

        in_progress.push(key);
        for dep in &node.deps {
            self.visit(dep, done, in_progress)?;
        }
        in_progress.pop();
        done.push(key);
        Ok(())
    }

    /// Run a task: prerequisites in topological order, then the task body.
    /// The first failing body halts this invocation's chain.
    pub fn run(&self, name: &str, ctx: &TaskContext) -> anyhow::Result<()> {
        let order = self.execution_order(name)?;
        for task in order {
            let node = &self.nodes[task];
            if let Some(body) = &node.body {
                crate::debug!("task"; "running {}", task);
                body(ctx)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ctx(config: &PipelineConfig) -> TaskContext<'_> {
        TaskContext {
            config,
            session: None,
        }
    }

    #[test]
    fn test_prerequisites_run_first_and_once() {
        let config = PipelineConfig::default();
        let trace = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let mut graph = TaskGraph::new();
        let t = Arc::clone(&trace);
        graph.add("compile", &[], move |_| {
            t.lock().push("compile");
            Ok(())
        });
        let t = Arc::clone(&trace);
        graph.add("minify", &["compile"], move |_| {
            t.lock().push("minify");
            Ok(())
        });
        graph.add_alias("styles", &["minify"]);

        graph.validate().unwrap();
        graph.run("styles", &ctx(&config)).unwrap();
        assert_eq!(*trace.lock(), vec!["compile", "minify"]);
    }

    #[test]
    fn test_diamond_runs_shared_dep_once() {
        let config = PipelineConfig::default();
        let count = Arc::new(AtomicUsize::new(0));

        let mut graph = TaskGraph::new();
        let c = Arc::clone(&count);
        graph.add("base", &[], move |_| {
            c.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        graph.add("left", &["base"], |_| Ok(()));
        graph.add("right", &["base"], |_| Ok(()));
        graph.add_alias("all", &["left", "right"]);

        graph.run("all", &ctx(&config)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let mut graph = TaskGraph::new();
        graph.add("a", &["missing"], |_| Ok(()));
        assert!(matches!(
            graph.validate(),
            Err(GraphError::UnknownDependency { .. })
        ));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut graph = TaskGraph::new();
        graph.add("a", &["b"], |_| Ok(()));
        graph.add("b", &["a"], |_| Ok(()));
        assert!(matches!(graph.validate(), Err(GraphError::Cycle(_))));
    }

    #[test]
    fn test_failing_prerequisite_halts_chain() {
        let config = PipelineConfig::default();
        let ran = Arc::new(AtomicUsize::new(0));

        let mut graph = TaskGraph::new();
        graph.add("compile", &[], |_| anyhow::bail!("boom"));
        let r = Arc::clone(&ran);
        graph.add("minify", &["compile"], move |_| {
            r.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        assert!(graph.run("minify", &ctx(&config)).is_err());
        assert_eq!(ran.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_execution_order_is_deterministic() {
        let mut graph = TaskGraph::new();
        graph.add("b", &[], |_| Ok(()));
        graph.add("a", &[], |_| Ok(()));
        graph.add_alias("all", &["b", "a"]);
        assert_eq!(graph.execution_order("all").unwrap(), vec!["b", "a", "all"]);
    }
}
