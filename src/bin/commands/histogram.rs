use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use log::info;

use hbdist::report::{DEFAULT_BUCKET_COUNT, Histogram};

use crate::commands::{for_each_input, open_records, output_prefix};

/// Buckets distances by whole ångström for every residue-type pair.
#[derive(Debug, Args)]
pub struct HistogramArgs {
    /// Output files of `hbdist run`; each one is tabulated separately.
    #[arg(required = true, value_name = "FILE")]
    pub inputs: Vec<PathBuf>,
    /// Number of buckets; the last one collects every larger distance.
    #[arg(short, long, default_value_t = DEFAULT_BUCKET_COUNT)]
    pub buckets: usize,
    /// Output CSV path. Only valid with a single input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: &HistogramArgs) -> Result<()> {
    if args.output.is_some() && args.inputs.len() > 1 {
        anyhow::bail!("--output can only be used with a single input file");
    }

    for_each_input(&args.inputs, |input| {
        let histogram = Histogram::from_records(open_records(input)?, args.buckets)
            .with_context(|| format!("Failed to tabulate {}", input.display()))?;
        let path = output_prefix(input, args.output.as_deref(), "_histogram.csv");
        histogram
            .write_file(&path)
            .context("Failed to write histogram")?;
        info!(
            "{}: {} distances bucketed into {}",
            input.display(),
            histogram.total(),
            path.display()
        );
        Ok(())
    })
}
