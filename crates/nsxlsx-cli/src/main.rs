//! nsxlsx CLI
//!
//! Fetches nation statistics and appends them to a spreadsheet store

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "nsxlsx")]
#[command(about = "nsxlsx - NationStates statistics to XLSX", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    // Flags of `output` when no subcommand is given
    #[command(flatten)]
    output: commands::output::OutputArgs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Acquire one snapshot and append it to the store
    Output(commands::output::OutputArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Output(args)) => commands::output::execute(args),
        None => commands::output::execute(cli.output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
