use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

mod commands;

use commands::{histogram, run, table, threshold};

#[derive(Parser, Debug)]
#[command(
    name = "hbdist",
    about = "Measures hydrogen-bond distances to mutation sites across a corpus of mutant structures.",
    version,
    author,
    arg_required_else_help = true
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect hydrogen bonds in every structure and record their distances to the mutation sites.
    Run(run::RunArgs),
    /// Count distances above and below a threshold per pair of mutation sites.
    Threshold(threshold::ThresholdArgs),
    /// Bucket distances per residue-type pair.
    Histogram(histogram::HistogramArgs),
    /// Convert an output file into a CSV table.
    Table(table::TableArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    commands::init_logging(cli.verbose);

    match &cli.command {
        Command::Run(args) => run::run(args)?,
        Command::Threshold(args) => threshold::run(args)?,
        Command::Histogram(args) => histogram::run(args)?,
        Command::Table(args) => table::run(args)?,
    }

    Ok(())
}
