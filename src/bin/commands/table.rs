use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use hbdist::report::export_table;

use crate::commands::{for_each_input, open_records, output_prefix};

/// Converts an output file into a CSV table with one column per bond distance.
#[derive(Debug, Args)]
pub struct TableArgs {
    /// Output files of `hbdist run`; each one is converted separately.
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,
    /// Output CSV path. Only valid with a single input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: &TableArgs) -> Result<()> {
    if args.output.is_some() && args.inputs.len() > 1 {
        anyhow::bail!("--output can only be used with a single input file");
    }

    for_each_input(&args.inputs, |input| {
        let path = output_prefix(input, args.output.as_deref(), "_hbonds.csv");
        let records = open_records(input)?;
        let mut buffer = Vec::new();
        let count = export_table(records, &mut buffer)
            .with_context(|| format!("Failed to convert {}", input.display()))?;

        fs::write(&path, &buffer)
            .with_context(|| format!("Failed to write output file {}", path.display()))?;
        info!("{}: {} records written to {}", input.display(), count, path.display());
        Ok(())
    })
}
