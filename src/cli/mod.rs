//! CLI module for pyarch

mod args;

pub use args::Args;

use crate::analysis::Crawler;
use crate::config::{Config, OutputFormat, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use crate::output::{render_tree, to_json};
use std::io;
use std::path::Path;
use std::process::ExitCode;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    match execute(args) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides the level
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Crawl the requested path and render it in the configured format
fn execute(args: Args) -> Result<String> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
    };
    config.merge_cli(args.format, args.indent, args.detail_level);

    tracing::debug!("format: {:?}", config.output.format);

    let mut crawler = Crawler::new()?.with_progress(args.verbose);
    let package = crawler.crawl(&args.path);

    for (path, message) in &package.parse_errors {
        tracing::warn!("skipped {}: {}", path.display(), message);
    }
    for path in &package.shadowed {
        tracing::debug!("shadowed {}", path.display());
    }

    match config.output.format {
        OutputFormat::Tree => Ok(render_tree(&package)),
        OutputFormat::Json => to_json(&package, config.output.indent),
        OutputFormat::Mermaid => Ok(config.diagram.generator().package_diagram(&package)),
    }
}
