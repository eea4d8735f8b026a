//! Stylesheet pipeline tasks.
//!
//! ```text
//! sass entry -> grass (expanded) -> lightningcss (prefix + consolidate,
//! source map) -> remify (px fallbacks, map patched) -> style.css/.map
//!                                                   -> style.min.css
//! ```
//!
//! `styles:minify` declares `styles:compile` as a prerequisite, so the
//! minified artifact is always derived from a fresh compiled artifact.

mod minify;
mod optimize;
mod remify;
mod sass;
mod sourcemap;

pub use optimize::browser_targets;

use std::fs;

use crate::error::PipelineError;
use crate::fileset::write_if_changed;
use crate::logger;
use crate::task::{TaskContext, TaskGraph};

pub const COMPILE_TASK: &str = "styles:compile";
pub const MINIFY_TASK: &str = "styles:minify";
pub const TASK: &str = "styles";

/// Register the stylesheet tasks: compile, minify (depends on compile),
/// and the `styles` alias.
pub fn register(graph: &mut TaskGraph) {
    graph.add(COMPILE_TASK, &[], compile);
    graph.add(MINIFY_TASK, &[COMPILE_TASK], minify_artifact);
    graph.add_alias(TASK, &[MINIFY_TASK]);
}

/// Compile the entry stylesheet into the expanded artifact + source map.
pub fn compile(ctx: &TaskContext) -> anyhow::Result<()> {
    let config = ctx.config;
    let entry = config.root_join(&config.styles.entry);
    let stem = config.styles.artifact_stem();
    let out_dir = config.styles_out_dir();
    let css_name = format!("{stem}.css");
    let map_name = format!("{stem}.css.map");

    let compiled = sass::compile(&entry)?;
    let optimized = optimize::optimize(&entry, &compiled)?;
    let remified = remify::remify(&optimized.css);
    let map = sourcemap::insert_empty_lines(&optimized.map, &remified.inserted)?;

    let mut css = remified.css;
    if !css.ends_with('\n') {
        css.push('\n');
    }
    css.push_str(&format!("/*# sourceMappingURL={map_name} */\n"));

    write_if_changed(&out_dir.join(&css_name), css.as_bytes())?;
    write_if_changed(&out_dir.join(&map_name), map.as_bytes())?;

    if let Some(session) = ctx.session {
        session.inject_css(&css_name, &css);
    }
    crate::debug!("styles"; "{} -> {}", config.styles.entry, css_name);
    Ok(())
}

/// Minify the compiled artifact into `{stem}.min.css` and push it to any
/// live session.
pub fn minify_artifact(ctx: &TaskContext) -> anyhow::Result<()> {
    let config = ctx.config;
    let stem = config.styles.artifact_stem();
    let out_dir = config.styles_out_dir();
    let css_path = out_dir.join(format!("{stem}.css"));
    let min_name = format!("{stem}.min.css");

    let source =
        fs::read_to_string(&css_path).map_err(|e| PipelineError::io(&css_path, e))?;
    let minified = minify::minify_css(&css_path, &source)?;
    write_if_changed(&out_dir.join(&min_name), minified.as_bytes())?;

    if let Some(session) = ctx.session {
        session.inject_css(&min_name, &minified);
    }
    logger::status_success("styles are built");
    Ok(())
}
