//! Pipewright - an asset pipeline runner with live reload.

#![allow(dead_code)]

mod cli;
mod config;
mod core;
mod css;
mod error;
mod fileset;
mod js;
mod logger;
mod reload;
mod serve;
mod task;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};

use cli::{Cli, Commands};
use config::PipelineConfig;
use task::{TaskContext, TaskGraph};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = PipelineConfig::load(&cli)?;
    let graph = build_graph();
    graph.validate()?;

    match &cli.command {
        Some(Commands::Styles) => run_once(&graph, css::TASK, &config),
        Some(Commands::Scripts) => run_once(&graph, js::TASK, &config),
        Some(Commands::Watch) | None => serve::watch_and_serve(&graph, &config),
    }
}

/// Register every task and alias.
fn build_graph() -> TaskGraph {
    let mut graph = TaskGraph::new();
    css::register(&mut graph);
    js::register(&mut graph);
    task::register_reload(&mut graph);
    graph
}

/// One-shot task invocation, no reload session.
fn run_once(graph: &TaskGraph, name: &str, config: &PipelineConfig) -> Result<()> {
    let ctx = TaskContext {
        config,
        session: None,
    };
    graph.run(name, &ctx)
}
