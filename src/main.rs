use clap::Parser;
use miette::Result;
use spinex::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Export(args) => spinex::cli::export::run(args)?,
        Commands::Completions(args) => spinex::cli::completions::run(args)?,
    }

    Ok(())
}
