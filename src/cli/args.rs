use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the dgc binary.
#[derive(Parser, Debug)]
#[command(
    name = "dgc",
    version,
    about = "Dependency graph compiler - resolves component object graphs at build time"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve every component of the given manifests and report diagnostics.
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Manifest files, or directories searched for `*.dgc.json` manifests.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Only resolve the named component. May be repeated.
    #[arg(short = 'c', long = "component")]
    pub components: Vec<String>,

    /// Print the resolved graph of each component.
    #[arg(long)]
    pub graph: bool,

    /// Print graph summaries and diagnostics as JSON on stdout.
    #[arg(long, conflicts_with = "graph")]
    pub json: bool,

    /// Enable color and formatting in the output to make diagnostics easier to read.
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub pretty: Option<bool>,

    /// Disable colored output regardless of the terminal.
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Number of components resolved in parallel. Defaults to one per core.
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,
}

impl CheckArgs {
    /// Whether diagnostics are colored, given whether stderr is a terminal.
    pub fn use_color(&self, is_terminal: bool) -> bool {
        !self.no_color && self.pretty.unwrap_or(is_terminal)
    }
}
