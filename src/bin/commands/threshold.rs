use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use log::info;

use hbdist::report::{DEFAULT_RESIDUE_COUNT, ThresholdKeys, ThresholdTable};

use crate::commands::{for_each_input, open_records, output_prefix};

/// Keys used for the rows and columns of the threshold matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum KeyArg {
    /// Residue positions `1..=residue-count`.
    #[default]
    #[value(name = "location")]
    Location,
    /// One-letter residue types.
    #[value(name = "type")]
    Type,
}

/// Counts distances above and below a threshold for every pair of mutation sites.
#[derive(Debug, Args)]
pub struct ThresholdArgs {
    /// Output files of `hbdist run`; each one is tabulated separately.
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,
    /// Distance threshold in ångström; distances equal to it count as above.
    #[arg(short, long, default_value_t = 15.0)]
    pub threshold: f64,
    /// Matrix keys.
    #[arg(short, long, value_enum, default_value_t = KeyArg::Location)]
    pub keys: KeyArg,
    /// Number of residue positions when keying by location.
    #[arg(long, default_value_t = DEFAULT_RESIDUE_COUNT)]
    pub residue_count: usize,
    /// Output prefix; `_above_thresh.csv` and `_below_thresh.csv` are appended.
    /// Only valid with a single input.
    #[arg(short, long, value_name = "PREFIX")]
    pub output: Option<PathBuf>,
}

pub fn run(args: &ThresholdArgs) -> Result<()> {
    if args.output.is_some() && args.inputs.len() > 1 {
        anyhow::bail!("--output can only be used with a single input file");
    }

    let keys = match args.keys {
        KeyArg::Location => ThresholdKeys::ResidueNumbers(args.residue_count),
        KeyArg::Type => ThresholdKeys::ResidueTypes,
    };
    let suffix = match args.keys {
        KeyArg::Location => "_residue_location",
        KeyArg::Type => "_residue_type",
    };

    for_each_input(&args.inputs, |input| {
        let table = ThresholdTable::from_records(open_records(input)?, keys, args.threshold)
            .with_context(|| format!("Failed to tabulate {}", input.display()))?;
        let prefix = output_prefix(input, args.output.as_deref(), suffix);
        let (above, below) = table
            .write_files(&prefix)
            .context("Failed to write threshold tables")?;
        info!(
            "{}: {} distances tabulated, wrote {} and {}",
            input.display(),
            table.total(),
            above.display(),
            below.display()
        );
        Ok(())
    })
}
