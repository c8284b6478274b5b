//! Mutation descriptors naming the two insertion sites of a mutant structure.
//!
//! Input files encode their mutation pair in the file name, e.g.
//! `1hhp_mut_25_A_50_G.json`. Splitting the name on `_` and `.` yields the tokens
//! `["1hhp", "mut", "25", "A", "50", "G", "json"]`; the four tokens starting at a fixed offset
//! (2 by default) are the two locations and their one-letter residue types. Directory
//! components are never consulted.

use super::atom::AtomKey;
use super::types::AminoAcid;
use smol_str::SmolStr;
use std::fmt;
use thiserror::Error;

/// Atom name used to anchor a mutation site.
pub const ALPHA_CARBON: &str = "CA";

/// Token offset used when the caller does not configure one.
pub const DEFAULT_DESCRIPTOR_OFFSET: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid mutation descriptor in '{name}': {details}")]
pub struct InvalidDescriptor {
    pub name: String,
    pub details: String,
}

impl InvalidDescriptor {
    fn new(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: details.into(),
        }
    }
}

/// Two mutation sites: residue positions with their canonical residue types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MutationDescriptor {
    pub location_1: SmolStr,
    pub residue_1: AminoAcid,
    pub location_2: SmolStr,
    pub residue_2: AminoAcid,
}

impl MutationDescriptor {
    /// Builds a descriptor from its four textual fields, validating each one.
    ///
    /// Locations must parse as integers and residue types must be canonical one-letter codes.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDescriptor`] naming `source` when any field fails validation.
    pub fn from_fields(
        source: &str,
        location_1: &str,
        residue_1: &str,
        location_2: &str,
        residue_2: &str,
    ) -> Result<Self, InvalidDescriptor> {
        Ok(Self {
            location_1: parse_location(source, location_1)?,
            residue_1: parse_residue(source, residue_1)?,
            location_2: parse_location(source, location_2)?,
            residue_2: parse_residue(source, residue_2)?,
        })
    }

    /// Extracts the descriptor from a file name using the delimiter-split convention.
    ///
    /// # Arguments
    ///
    /// * `file_name` - Bare file name, without directories.
    /// * `offset` - Index of the first location token after splitting on `_` and `.`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDescriptor`] when fewer than `offset + 4` tokens exist or a token is
    /// not a valid location/residue code.
    pub fn from_file_name(file_name: &str, offset: usize) -> Result<Self, InvalidDescriptor> {
        let tokens: Vec<&str> = file_name.split(['_', '.']).collect();
        let window = offset.checked_add(4).and_then(|end| tokens.get(offset..end));
        match window {
            Some([loc1, typ1, loc2, typ2]) => {
                Self::from_fields(file_name, loc1, typ1, loc2, typ2)
            }
            _ => Err(InvalidDescriptor::new(
                file_name,
                format!(
                    "expected 4 tokens starting at index {} after splitting on '_' and '.', found {} tokens",
                    offset,
                    tokens.len()
                ),
            )),
        }
    }

    /// Index keys of the alpha carbons anchoring both mutation sites.
    pub fn site_keys(&self) -> (AtomKey, AtomKey) {
        (
            AtomKey::new(
                &self.location_1,
                ALPHA_CARBON,
                self.residue_1.three_letter(),
            ),
            AtomKey::new(
                &self.location_2,
                ALPHA_CARBON,
                self.residue_2.three_letter(),
            ),
        )
    }
}

impl fmt::Display for MutationDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.location_1,
            self.residue_1.one_letter(),
            self.location_2,
            self.residue_2.one_letter()
        )
    }
}

fn parse_location(source: &str, token: &str) -> Result<SmolStr, InvalidDescriptor> {
    token
        .parse::<i32>()
        .map(|_| SmolStr::new(token))
        .map_err(|_| {
            InvalidDescriptor::new(source, format!("'{}' is not a residue number", token))
        })
}

fn parse_residue(source: &str, token: &str) -> Result<AminoAcid, InvalidDescriptor> {
    let mut chars = token.chars();
    let residue = match (chars.next(), chars.next()) {
        (Some(code), None) => AminoAcid::from_one_letter(code),
        _ => None,
    };
    residue.ok_or_else(|| {
        InvalidDescriptor::new(
            source,
            format!("'{}' is not a canonical one-letter residue code", token),
        )
    })
}
