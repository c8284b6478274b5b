use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use log::warn;
use prettytable::{Table, format, row};

use hbdist::ops::{FailurePolicy, Hbplus, RunConfig, RunSummary, run_pipeline};

use crate::commands::{print_boxed_label, run_with_spinner, unit_progress};

/// Failure handling selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Log failed units and keep going.
    #[value(name = "skip")]
    Skip,
    /// Stop the run at the first failed unit.
    #[value(name = "abort")]
    Abort,
}

impl From<PolicyArg> for FailurePolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Skip => FailurePolicy::Skip,
            PolicyArg::Abort => FailurePolicy::Abort,
        }
    }
}

/// Runs the detector over a corpus and writes one record per structure.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// TOML configuration file; flags below override its values.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Directory holding the input structures (searched recursively).
    #[arg(short, long, value_name = "DIR")]
    pub input: Option<PathBuf>,
    /// Combined output file.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Only process files with this extension.
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,
    /// Number of concurrent workers.
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,
    /// Parent directory for per-worker scratch space.
    #[arg(long, value_name = "DIR")]
    pub scratch: Option<PathBuf>,
    /// Detector executable (name on PATH or a path).
    #[arg(long, value_name = "PROGRAM")]
    pub detector: Option<PathBuf>,
    /// Extra detector argument; repeat for several. Replaces the configured arguments.
    #[arg(long = "detector-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub detector_args: Vec<String>,
    /// Index of the first mutation token in the split file name.
    #[arg(long, value_name = "INDEX")]
    pub descriptor_offset: Option<usize>,
    /// What to do when a unit fails.
    #[arg(long, value_enum)]
    pub failure_policy: Option<PolicyArg>,
    /// Keep scratch directories after a successful run.
    #[arg(long)]
    pub keep_scratch: bool,
}

impl RunArgs {
    fn resolve_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input_dir = input.clone();
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = Some(extension.clone());
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(scratch) = &self.scratch {
            config.scratch_dir = scratch.clone();
        }
        if let Some(detector) = &self.detector {
            config.detector.program = detector.clone();
        }
        if !self.detector_args.is_empty() {
            config.detector.args = self.detector_args.clone();
        }
        if let Some(offset) = self.descriptor_offset {
            config.descriptor_offset = offset;
        }
        if let Some(policy) = self.failure_policy {
            config.failure_policy = policy.into();
        }
        config.keep_scratch |= self.keep_scratch;

        config.validate().context("Invalid run configuration")?;
        Ok(config)
    }
}

/// Enumerates the corpus, runs the pipeline, and prints a per-worker summary to stderr.
pub fn run(args: &RunArgs) -> Result<()> {
    let config = args.resolve_config()?;
    let detector = Hbplus::new(config.detector.program.clone(), config.detector.args.clone())
        .context("Detector is not available")?;

    let units = run_with_spinner("Enumerating work units", || {
        config.work_units().with_context(|| {
            format!("Failed to list input directory {}", config.input_dir.display())
        })
    })?;
    if units.is_empty() {
        warn!("No work units found under {}", config.input_dir.display());
    }

    let progress = unit_progress(units.len());
    let failed = AtomicUsize::new(0);
    let result = run_pipeline(&config, &units, &detector, |_, ok| {
        if !ok {
            let count = failed.fetch_add(1, Ordering::Relaxed) + 1;
            progress.set_message(format!("{count} failed"));
        }
        progress.inc(1);
    });

    match &result {
        Ok(_) => progress.finish(),
        Err(_) => progress.abandon(),
    }
    let summary = result.context("Pipeline run failed")?;

    print_summary(&summary)
}

fn print_summary(summary: &RunSummary) -> Result<()> {
    let mut stderr = io::stderr().lock();

    print_boxed_label(&mut stderr, "hbdist Run Summary")?;
    writeln!(&mut stderr)?;

    let mut worker_table = Table::new();
    worker_table.set_format(*format::consts::FORMAT_BOX_CHARS);
    worker_table.set_titles(row!["Worker", "Assigned", "Processed", "Failed"]);
    for worker in &summary.workers {
        worker_table.add_row(row![
            worker.worker,
            worker.assigned,
            worker.processed,
            worker.failures.len()
        ]);
    }
    worker_table
        .print(&mut stderr)
        .context("Failed to render worker summary")?;
    writeln!(&mut stderr)?;

    let mut totals = Table::new();
    totals.set_format(*format::consts::FORMAT_BOX_CHARS);
    totals.set_titles(row!["Metric", "Value"]);
    totals.add_row(row!["Work Units", summary.total_units]);
    totals.add_row(row!["Records Written", summary.processed()]);
    totals.add_row(row!["Units Skipped", summary.failed()]);
    totals.add_row(row!["Output", summary.output.display()]);
    totals
        .print(&mut stderr)
        .context("Failed to render run totals")?;

    for unit in summary.failures() {
        writeln!(&mut stderr, "skipped: {}", unit.display())?;
    }

    Ok(())
}
