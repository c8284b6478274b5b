use crate::model::{descriptor::InvalidDescriptor, index::KeyNotFound};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Step of the per-unit state machine that a unit was working towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Descriptor parsed and payload copied into the scratch structure file.
    Loaded,
    /// External detector ran and produced its augmented structure and bond report.
    DetectorInvoked,
    /// Structure index built from the augmented structure.
    IndexBuilt,
    /// Bond report parsed and every bond reduced to its nearest-site distance.
    BondsParsed,
    /// Output record formatted and appended to the worker output.
    RecordEmitted,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Loaded => "loaded",
            Stage::DetectorInvoked => "detector-invoked",
            Stage::IndexBuilt => "index-built",
            Stage::BondsParsed => "bonds-parsed",
            Stage::RecordEmitted => "record-emitted",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] crate::io::Error),

    #[error(transparent)]
    KeyNotFound(#[from] KeyNotFound),

    #[error(transparent)]
    InvalidDescriptor(#[from] InvalidDescriptor),

    #[error("bond on report line {line_number} cannot be resolved: {source}")]
    UnresolvedBond {
        line_number: usize,
        #[source]
        source: KeyNotFound,
    },

    #[error("detector '{program}' failed ({status_desc}): {details}", status_desc = StatusDisplay(*status))]
    DetectorFailure {
        program: String,
        status: Option<i32>,
        details: String,
    },

    #[error("detector '{program}' could not be started: {source}")]
    DetectorUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("scratch space '{}' is unusable: {source}", .path.display())]
    Scratch {
        path: PathBuf,
        #[source]
        source: crate::io::Error,
    },

    #[error("unit '{}' failed before reaching stage '{stage}': {source}", .unit.display())]
    Unit {
        unit: PathBuf,
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    #[error("worker {worker} stopped: {source}")]
    Worker {
        worker: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid configuration: {details}")]
    InvalidConfig { details: String },
}

impl Error {
    pub fn detector_failure(
        program: impl Into<String>,
        status: Option<i32>,
        details: impl Into<String>,
    ) -> Self {
        Self::DetectorFailure {
            program: program.into(),
            status,
            details: details.into(),
        }
    }

    pub fn scratch(path: &Path, source: std::io::Error) -> Self {
        Self::Scratch {
            path: path.to_path_buf(),
            source: crate::io::Error::from_io(source, Some(path.to_path_buf())),
        }
    }

    pub fn unit(unit: &Path, stage: Stage, source: impl Into<Error>) -> Self {
        Self::Unit {
            unit: unit.to_path_buf(),
            stage,
            source: Box::new(source.into()),
        }
    }

    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig {
            details: details.into(),
        }
    }

    /// Returns `true` for failures of the worker's environment rather than of one unit.
    ///
    /// A missing detector binary or an unwritable scratch directory would fail every remaining
    /// unit of the chunk, so these stop the worker regardless of the failure policy.
    pub fn is_setup_failure(&self) -> bool {
        match self {
            Self::DetectorUnavailable { .. } | Self::Scratch { .. } | Self::InvalidConfig { .. } => {
                true
            }
            Self::Unit { source, .. } | Self::Worker { source, .. } => source.is_setup_failure(),
            _ => false,
        }
    }

    /// Stage recorded for per-unit failures.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Unit { stage, .. } => Some(*stage),
            Self::Worker { source, .. } => source.stage(),
            _ => None,
        }
    }
}

struct StatusDisplay(Option<i32>);

impl fmt::Display for StatusDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "exit status {}", code),
            None => write!(f, "no exit status"),
        }
    }
}
