//! Run configuration for the parallel pipeline.
//!
//! A [`RunConfig`] can be built in code, deserialized from a TOML file, or both: the CLI loads
//! the file first and then overrides individual fields from its flags.
//!
//! ```toml
//! input_dir = "/data/mutants/1hhp"
//! output = "1hhp_hbonds.txt"
//! workers = 8
//! failure_policy = "skip"
//!
//! [detector]
//! program = "/opt/hbplus/hbplus"
//! args = ["-o"]
//! ```

use crate::model::descriptor::DEFAULT_DESCRIPTOR_OFFSET;
use crate::ops::error::Error;
use crate::ops::partition::enumerate_work_units;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

/// What a worker does when one of its units fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failed unit and continue with the next one in the chunk.
    #[default]
    Skip,
    /// Stop the worker at the first failed unit and fail the whole run.
    Abort,
}

/// External detector executable and its extra arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DetectorConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("hbplus"),
            args: vec!["-o".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Root of the input corpus; every file below it is one work unit.
    pub input_dir: PathBuf,
    /// Only files with this extension are enumerated when set.
    pub extension: Option<String>,
    /// Combined output file.
    pub output: PathBuf,
    /// Parent of the per-worker scratch directories.
    pub scratch_dir: PathBuf,
    /// Number of workers, and therefore of chunks.
    pub workers: usize,
    /// Index of the first mutation token in the split file name.
    pub descriptor_offset: usize,
    pub failure_policy: FailurePolicy,
    /// Leave scratch directories in place after a successful run.
    pub keep_scratch: bool,
    pub detector: DetectorConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            extension: None,
            output: PathBuf::from("hbonds.txt"),
            scratch_dir: PathBuf::from("hbdist_scratch"),
            workers: default_worker_count(),
            descriptor_offset: DEFAULT_DESCRIPTOR_OFFSET,
            failure_policy: FailurePolicy::Skip,
            keep_scratch: false,
            detector: DetectorConfig::default(),
        }
    }
}

impl RunConfig {
    /// Loads a configuration from a TOML file; absent keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::from(crate::io::Error::from_io(e, Some(path.to_path_buf())))
        })?;
        Self::from_toml_str(&content)
            .map_err(|e| Error::invalid_config(format!("{}: {}", path.display(), e)))
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::invalid_config(e.to_string()))
    }

    /// Enumerates the input corpus, leaving out the combined output and the scratch root so a
    /// rerun over the same directory does not pick up files of an earlier run.
    pub fn work_units(&self) -> Result<Vec<PathBuf>, Error> {
        enumerate_work_units(
            &self.input_dir,
            self.extension.as_deref(),
            &[self.output.as_path(), self.scratch_dir.as_path()],
        )
    }

    /// Checks the settings that would otherwise only fail once workers are running.
    pub fn validate(&self) -> Result<(), Error> {
        if self.workers == 0 {
            return Err(Error::invalid_config("worker count must be at least 1"));
        }
        if self.detector.program.as_os_str().is_empty() {
            return Err(Error::invalid_config("detector program must not be empty"));
        }
        if self.output.as_os_str().is_empty() {
            return Err(Error::invalid_config("output path must not be empty"));
        }
        Ok(())
    }
}

fn default_worker_count() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
