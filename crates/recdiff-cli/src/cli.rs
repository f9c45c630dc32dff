use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "recdiff",
    about = "recdiff — structural diff of test and sample records",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the classified line sequence
    Lines(LinesArgs),
    /// Render the test and sample views as markup
    Render(RenderArgs),
    /// Print the flattened entries of one record file
    Flatten(FlattenArgs),
}

/// Where the two records come from.
#[derive(Args)]
pub struct SourceArgs {
    /// Test record: a JSON file, or a record number with --store
    pub test: String,
    /// Sample record: a JSON file, or a record number with --store
    pub sample: String,
    /// Record store directory (<dir>/test/<n>.json, <dir>/sample/<n>.json)
    #[arg(long)]
    pub store: Option<PathBuf>,
    /// File of ignored keys, one per line
    #[arg(long)]
    pub ignored: Option<PathBuf>,
    /// TOML diff configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct LinesArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Hide unchanged lines
    #[arg(long)]
    pub only_changes: bool,
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Write test.html and sample.html into this directory
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct FlattenArgs {
    pub file: PathBuf,
}
