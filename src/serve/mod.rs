//! Watch orchestration: one-shot build, reload session, HTTPS proxy.
//!
//! Startup order matters:
//! 1. validate the proxy surface and load TLS material (fatal on failure,
//!    no watcher gets registered),
//! 2. register the watcher so events buffer during the initial build,
//! 3. run the one-shot build (failures are reported, not fatal),
//! 4. start the reload session and the proxy,
//! 5. enter the dispatch loop until Ctrl+C.

mod proxy;

pub mod tls;

use std::thread::{self, JoinHandle};

use anyhow::{Context, Result};

use crate::config::PipelineConfig;
use crate::reload::ReloadSession;
use crate::task::{TaskContext, TaskGraph};
use crate::watch::{Watcher, default_bindings};

/// Run the default task: build once, then watch and serve.
pub fn watch_and_serve(graph: &TaskGraph, config: &PipelineConfig) -> Result<()> {
    config.validate_for_serve()?;
    let tls = tls::load(config)?;

    // Watcher-first: changes made during the initial build are buffered,
    // not lost
    let bindings = default_bindings(config)?;
    let watcher = Watcher::register(&config.root, bindings)?;

    initial_build(graph, config);

    let session = ReloadSession::start(config.serve.ws_port)
        .context("failed to start live-reload session")?;

    let server = proxy::ProxyServer::bind(
        &config.site.host,
        config.serve.port,
        session.port(),
        &tls,
    )?;
    let proxy_handle = spawn_proxy(server);

    let ctx = TaskContext {
        config,
        session: Some(&session),
    };
    watcher.run(graph, &ctx);

    session.stop();
    wait_for_shutdown(proxy_handle);
    Ok(())
}

/// Build everything once before watching. Failures surface in the status
/// line; the session still starts so fixes rebuild live.
fn initial_build(graph: &TaskGraph, config: &PipelineConfig) {
    let ctx = TaskContext {
        config,
        session: None,
    };
    for task in [crate::css::TASK, crate::js::TASK] {
        if let Err(e) = graph.run(task, &ctx) {
            crate::logger::status_error(&format!("{task} failed"), &format!("{e:#}"));
        }
    }
}

fn spawn_proxy(server: proxy::ProxyServer) -> JoinHandle<()> {
    thread::spawn(move || server.run())
}

/// Wait for the proxy thread to drain (max 2 seconds).
fn wait_for_shutdown(handle: JoinHandle<()>) {
    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(std::time::Duration::from_millis(50));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_missing_host_fails_before_any_side_effect() {
        let graph = TaskGraph::new();
        let config = test_parse_config("");
        assert!(watch_and_serve(&graph, &config).is_err());
    }

    #[test]
    fn test_missing_tls_fails_before_watcher_registration() {
        let graph = TaskGraph::new();
        let config =
            test_parse_config("[site]\nhost = \"example.test\"\nuser = \"nobody-here\"");
        let err = watch_and_serve(&graph, &config).unwrap_err();
        assert!(err.to_string().contains("TLS"));
    }
}
