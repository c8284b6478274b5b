//! Aggregation of the combined output into CSV summaries.
//!
//! Three tabulators read an output file produced by the pipeline:
//!
//! - [`ThresholdTable`] counts distances above and below a threshold for every pair of
//!   mutation sites, keyed either by residue position or by residue type.
//! - [`Histogram`] buckets distances by whole ångström for every unordered residue-type pair.
//! - [`export_table`] rewrites the records as a rectangular CSV table.
//!
//! A malformed record stops the tabulation of its file and reports the offending line.

mod error;
mod histogram;
mod table;
mod threshold;

pub use error::Error;
pub use histogram::{DEFAULT_BUCKET_COUNT, Histogram};
pub use table::export_table;
pub use threshold::{DEFAULT_RESIDUE_COUNT, ThresholdKeys, ThresholdTable};

use crate::io::{self, parse_output_record};
use crate::model::record::OutputRecord;
use std::io::BufRead;

/// Parses records together with their 1-based line numbers, skipping blank lines.
fn numbered_records<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = Result<(usize, OutputRecord), Error>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(
                parse_output_record(&line, idx + 1)
                    .map(|record| (idx + 1, record))
                    .map_err(Error::from),
            ),
            Err(e) => Some(Err(Error::from(io::Error::from_io(e, None)))),
        })
}
