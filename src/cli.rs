//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Pipewright asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: pipewright.toml)
    #[arg(short = 'C', long, default_value = "pipewright.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Task to run (defaults to `watch`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available tasks
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Compile and optimize stylesheets (compile + minify)
    #[command(visible_alias = "css")]
    Styles,

    /// Minify scripts
    #[command(visible_alias = "js")]
    Scripts,

    /// Build once, then watch sources and serve through the live-reload
    /// proxy (default task)
    #[command(visible_alias = "w")]
    Watch,
}

#[allow(unused)]
impl Cli {
    pub const fn is_watch(&self) -> bool {
        matches!(self.command, None | Some(Commands::Watch))
    }
}
