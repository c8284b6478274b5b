//! Pipeline operations: distance evaluation, detector invocation, per-unit processing, and the
//! parallel driver.
//!
//! The layers build on each other. [`bond_distances`] reduces parsed bonds to nearest-site
//! distances, [`StructureProcessor`] walks one unit through its stages with the
//! help of a [`BondDetector`], and [`run_pipeline`] partitions the corpus across workers and
//! merges their output. Every layer shares the single [`Error`] type.

mod config;
mod detector;
mod distance;
mod driver;
mod error;
mod partition;
mod process;
mod scratch;

#[cfg(test)]
mod test_support;

pub use config::{DetectorConfig, FailurePolicy, RunConfig};

pub use detector::{
    AUGMENTED_EXTENSION, BOND_REPORT_EXTENSION, BondDetector, DetectorOutput, Hbplus,
};

pub use distance::{
    bond_distances, euclidean_distance, evaluate_bond_report, midpoint, nearest_site_distance,
};

pub use driver::{RunSummary, WorkerSummary, run_pipeline};

pub use partition::{enumerate_work_units, partition};

pub use process::StructureProcessor;

pub use scratch::ScratchSpace;

pub use error::{Error, Stage};
