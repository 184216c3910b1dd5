//! bowtie-build CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bowtie_build::util::Shell;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("bowtie_build=debug")
    } else {
        EnvFilter::new("bowtie_build=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);

    // Execute command
    match cli.command {
        Commands::Build(args) => commands::build::execute(args, &shell),
        Commands::Header(args) => commands::header::execute(args, &shell),
        Commands::Flags(args) => commands::flags::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
