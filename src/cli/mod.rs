pub mod completions;
pub mod export;

use clap::{Parser, Subcommand};

/// spinex - Layered document to Spine 2D exporter
#[derive(Parser, Debug)]
#[command(name = "spinex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a layer manifest to spine.json plus image assets
    Export(export::ExportArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
