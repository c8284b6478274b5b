//! # hbdist
//!
//! **hbdist** measures how far the hydrogen bonds of mutant protein structures lie from their
//! mutation sites. Each input structure names two insertion sites in its file name; an external
//! detector (HBPLUS) adds hydrogens and reports every hydrogen bond, and for each bond the
//! distance from its donor/acceptor midpoint to the nearer of the two sites' alpha carbons is
//! recorded. A corpus of structures is processed by a fixed pool of workers whose outputs are
//! merged into one deterministic, sorted output file.
//!
//! ## Features
//!
//! - **Typed structure index** – Atoms keyed by residue number, atom name, and residue type,
//!   with `nalgebra` coordinates and explicit lookup failures.
//! - **Format readers** – Tokenized and fixed-column `ATOM` records, HBPLUS `.hb2` reports, JSON
//!   envelopes, and the output record line format, all with line-numbered diagnostics.
//! - **Per-unit state machine** – `StructureProcessor` walks each structure through loading,
//!   detection, indexing, and bond evaluation, tagging failures with the stage reached.
//! - **Parallel driver** – Contiguous partitioning, per-worker scratch namespaces, a bounded
//!   `rayon` pool, and an ordered merge with skip or abort failure policies.
//! - **Reports** – Threshold matrices, per-pair distance histograms, and CSV table export.

pub mod io;
pub mod model;
pub mod ops;
pub mod report;

mod utils;

pub use model::atom::{Atom, AtomKey};
pub use model::bond::BondRecord;
pub use model::descriptor::MutationDescriptor;
pub use model::index::StructureIndex;
pub use model::record::OutputRecord;
pub use model::types::{AminoAcid, Point};
