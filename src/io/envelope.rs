//! Structure payload extraction from input units.
//!
//! Corpus files come in two shapes: a raw PDB text file, or a JSON document that nests the PDB
//! text under `pdb_data.pdb`. The shape is sniffed from the first non-whitespace byte.

use crate::io::error::Error;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct Envelope {
    pdb_data: PdbData,
}

#[derive(Debug, Deserialize)]
struct PdbData {
    pdb: String,
}

/// Shape detected for an input payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Json,
    Raw,
}

impl PayloadKind {
    pub fn detect(text: &str) -> Self {
        if text.trim_start().starts_with('{') {
            Self::Json
        } else {
            Self::Raw
        }
    }
}

/// Reads an input unit and returns the structure text it carries.
pub fn read<R: Read>(mut reader: R) -> Result<String, Error> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| Error::from_io(e, None))?;
    extract(text)
}

/// Unwraps the structure text from an already-loaded payload.
pub fn extract(text: String) -> Result<String, Error> {
    match PayloadKind::detect(&text) {
        PayloadKind::Json => serde_json::from_str::<Envelope>(&text)
            .map(|envelope| envelope.pdb_data.pdb)
            .map_err(|e| Error::envelope(e, None)),
        PayloadKind::Raw => Ok(text),
    }
}
