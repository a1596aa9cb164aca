//! CLI argument parsing

use crate::config::OutputFormat;
use crate::output::DetailLevel;
use clap::Parser;
use std::path::PathBuf;

/// Print the structure of a Python source tree
#[derive(Parser, Debug)]
#[command(name = "pyarch")]
#[command(about = "Print the structure of a Python source tree")]
#[command(version)]
pub struct Args {
    /// Directory to crawl
    pub path: PathBuf,

    /// Output format [default: tree]
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Spaces per level for JSON output [default: 2]
    #[arg(long)]
    pub indent: Option<usize>,

    /// Methods listed in Mermaid diagrams (all, public, none)
    #[arg(long)]
    pub detail_level: Option<DetailLevel>,

    /// Config file path [default: ./pyarch.toml if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}
