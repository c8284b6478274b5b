//! Core data structures for hydrogen-bond distance analysis.
//!
//! This module defines atoms and their lookup keys, the per-structure coordinate index, the
//! mutation descriptors parsed from input names, and the output records emitted per structure.
//! These types are produced by the readers in `io` and consumed by the pipeline in `ops` and
//! the tabulators in `report`.

pub mod atom;
pub mod bond;
pub mod descriptor;
pub mod index;
pub mod record;
pub mod types;
