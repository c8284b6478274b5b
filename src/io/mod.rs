//! Readers and writers for the text formats the pipeline touches.
//!
//! Structure files (`.h`, PDB-style `ATOM` records) become a [`StructureIndex`], HBPLUS bond
//! reports (`.hb2`) become bond records, input units are unwrapped from their optional JSON
//! envelope, and output records are written and read back one line each. All readers take a
//! `BufRead` and share a single [`Error`] type whose path can be attached after the fact.
//!
//! [`StructureIndex`]: crate::model::index::StructureIndex

mod envelope;
mod error;
mod hb2;
mod pdb;
mod record;

pub use pdb::reader::{AtomLayout, read as read_structure_index};

pub use hb2::reader::{HEADER_LINES as BOND_REPORT_HEADER_LINES, read as read_bond_report};

pub use envelope::{PayloadKind, extract as extract_payload, read as read_payload};

pub use record::{
    parse_line as parse_output_record, read as read_output_records,
    write as write_output_record,
};

pub use error::Error;
