//! Parallel driver: partition, run workers, join, merge, clean up.
//!
//! Each worker owns one contiguous chunk of the sorted unit list and a private scratch
//! directory. Workers append records to their own partial file; after every worker has
//! finished, the partial files are concatenated in worker-id order, so the combined output
//! follows the enumeration order regardless of scheduling.
//!
//! A worker that stops early raises a shared flag; the other workers check it before each unit
//! and return without touching the rest of their chunks.

use crate::io::{self, write_output_record};
use crate::ops::config::{FailurePolicy, RunConfig};
use crate::ops::detector::BondDetector;
use crate::ops::error::{Error, Stage};
use crate::ops::partition::partition;
use crate::ops::process::StructureProcessor;
use crate::ops::scratch::ScratchSpace;
use crate::utils::parallel::*;
use log::{debug, error, info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of one worker's chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker: usize,
    /// Units in the worker's chunk.
    pub assigned: usize,
    /// Units whose record reached the output.
    pub processed: usize,
    /// Units skipped after a failure, in processing order.
    pub failures: Vec<PathBuf>,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub workers: Vec<WorkerSummary>,
    pub output: PathBuf,
    pub total_units: usize,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.workers.iter().map(|w| w.processed).sum()
    }

    pub fn failed(&self) -> usize {
        self.workers.iter().map(|w| w.failures.len()).sum()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Path> {
        self.workers
            .iter()
            .flat_map(|w| w.failures.iter().map(PathBuf::as_path))
    }
}

/// Processes `units` with `config.workers` concurrent workers and writes the combined output.
///
/// # Arguments
///
/// * `config` - Validated run settings; `input_dir` is not consulted here.
/// * `units` - Work units in the order their records should appear.
/// * `detector` - Shared bond detector invoked once per unit.
/// * `on_unit` - Called after each unit with its path and whether it succeeded.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] for unusable settings, [`Error::Scratch`] when the scratch
/// root cannot be created, and [`Error::Worker`] for the lowest-numbered worker that stopped
/// early. A stopped worker leaves the output untouched and the scratch space in place.
pub fn run_pipeline<D, F>(
    config: &RunConfig,
    units: &[PathBuf],
    detector: &D,
    on_unit: F,
) -> Result<RunSummary, Error>
where
    D: BondDetector + ?Sized,
    F: Fn(&Path, bool) + Sync,
{
    config.validate()?;
    let chunks = partition(units, config.workers)?;

    fs::create_dir_all(&config.scratch_dir).map_err(|e| Error::scratch(&config.scratch_dir, e))?;

    info!(
        "Processing {} units with {} workers using detector '{}'",
        units.len(),
        config.workers,
        detector.name()
    );

    let stop = AtomicBool::new(false);
    let results: Vec<Result<WorkerSummary, Error>> = install_pool(config.workers, || {
        chunks
            .par_iter()
            .enumerate()
            .map(|(worker, chunk)| {
                let result = run_worker(worker, chunk, config, detector, &stop, &on_unit);
                if result.is_err() {
                    stop.store(true, Ordering::Release);
                }
                result
            })
            .collect()
    })
    .map_err(|e| Error::invalid_config(format!("cannot start worker pool: {e}")))?;

    let mut summaries = Vec::with_capacity(results.len());
    for (worker, result) in results.into_iter().enumerate() {
        match result {
            Ok(summary) => summaries.push(summary),
            Err(source) => {
                warn!(
                    "Run aborted; scratch space '{}' kept for inspection",
                    config.scratch_dir.display()
                );
                return Err(Error::Worker {
                    worker,
                    source: Box::new(source),
                });
            }
        }
    }

    merge_outputs(&config.output, &config.scratch_dir, &summaries)?;

    if config.keep_scratch {
        info!("Scratch space kept at '{}'", config.scratch_dir.display());
    } else {
        clean_scratch(&config.scratch_dir, &summaries);
    }

    let summary = RunSummary {
        workers: summaries,
        output: config.output.clone(),
        total_units: units.len(),
    };
    info!(
        "Wrote {} records to '{}' ({} units skipped)",
        summary.processed(),
        summary.output.display(),
        summary.failed()
    );
    Ok(summary)
}

fn run_worker<D, F>(
    worker: usize,
    chunk: &[PathBuf],
    config: &RunConfig,
    detector: &D,
    stop: &AtomicBool,
    on_unit: &F,
) -> Result<WorkerSummary, Error>
where
    D: BondDetector + ?Sized,
    F: Fn(&Path, bool) + Sync,
{
    let scratch = ScratchSpace::create(&config.scratch_dir, worker)?;
    let records_path = scratch.records_path();
    let file = File::create(&records_path).map_err(|e| Error::scratch(&records_path, e))?;
    let mut writer = BufWriter::new(file);

    let processor = StructureProcessor::new(detector, &scratch, config.descriptor_offset);
    let mut summary = WorkerSummary {
        worker,
        assigned: chunk.len(),
        processed: 0,
        failures: Vec::new(),
    };

    debug!("Worker {} starting with {} units", worker, chunk.len());

    for unit in chunk {
        if stop.load(Ordering::Acquire) {
            debug!("Worker {} stopping: another worker aborted the run", worker);
            return Ok(summary);
        }

        let outcome = processor.process(unit).and_then(|record| {
            write_output_record(&mut writer, &record).map_err(|source| {
                let emitted = Error::Scratch {
                    path: records_path.clone(),
                    source,
                };
                Error::unit(unit, Stage::RecordEmitted, emitted)
            })
        });

        match outcome {
            Ok(()) => {
                summary.processed += 1;
                on_unit(unit, true);
            }
            Err(e) if e.is_setup_failure() || config.failure_policy == FailurePolicy::Abort => {
                on_unit(unit, false);
                error!("Worker {} stopped: {}", worker, e);
                return Err(e);
            }
            Err(e) => {
                on_unit(unit, false);
                warn!("Worker {} skipped unit: {}", worker, e);
                summary.failures.push(unit.clone());
            }
        }
    }

    writer
        .flush()
        .map_err(|e| Error::scratch(&records_path, e))?;

    debug!(
        "Worker {} finished: {} of {} units processed",
        worker, summary.processed, summary.assigned
    );
    Ok(summary)
}

fn merge_outputs(
    output: &Path,
    scratch_root: &Path,
    summaries: &[WorkerSummary],
) -> Result<(), Error> {
    let output_err =
        |e: std::io::Error| Error::from(io::Error::from_io(e, Some(output.to_path_buf())));

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_err)?;
    }
    let mut writer = BufWriter::new(File::create(output).map_err(output_err)?);

    for summary in summaries {
        let partial = ScratchSpace::existing(scratch_root, summary.worker).records_path();
        let mut reader = File::open(&partial).map_err(|e| Error::scratch(&partial, e))?;
        std::io::copy(&mut reader, &mut writer).map_err(output_err)?;
    }

    writer.flush().map_err(output_err)
}

fn clean_scratch(scratch_root: &Path, summaries: &[WorkerSummary]) {
    for summary in summaries {
        if let Err(e) = ScratchSpace::existing(scratch_root, summary.worker).remove() {
            warn!("Could not clean up: {}", e);
        }
    }
    if let Err(e) = fs::remove_dir(scratch_root) {
        debug!(
            "Scratch root '{}' left in place: {}",
            scratch_root.display(),
            e
        );
    }
}
