//! Keyed atom lookup for a single structure.
//!
//! The index maps `(residue number, atom name, residue type)` to coordinates and is rebuilt for
//! every structure the pipeline processes. It is normally populated from the hydrogen-augmented
//! `.h` file written by HBPLUS rather than from the raw input, because that file carries the
//! hydrogens the bond report refers to and has already resolved alternate locations.

use super::atom::{Atom, AtomKey};
use super::types::Point;
use std::collections::HashMap;
use thiserror::Error;

/// Raised when a requested atom is absent from the index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("atom '{0}' not found in structure index")]
pub struct KeyNotFound(pub AtomKey);

/// Coordinate lookup table for one structure.
///
/// Each key holds exactly one coordinate triple. When a key is inserted twice the later
/// coordinates replace the earlier ones (last write wins); the number of replacements is
/// tracked so callers can report it instead of relying on it silently.
#[derive(Debug, Clone, Default)]
pub struct StructureIndex {
    atoms: HashMap<AtomKey, Point>,
    overwritten: usize,
}

impl StructureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the coordinates for `key`.
    ///
    /// # Returns
    ///
    /// The previous coordinates when the key was already present.
    pub fn insert(&mut self, key: AtomKey, pos: Point) -> Option<Point> {
        let previous = self.atoms.insert(key, pos);
        if previous.is_some() {
            self.overwritten += 1;
        }
        previous
    }

    pub fn get(&self, key: &AtomKey) -> Option<&Point> {
        self.atoms.get(key)
    }

    /// Resolves an atom by its identifying triple.
    ///
    /// # Errors
    ///
    /// Returns [`KeyNotFound`] when the exact triple was never inserted.
    pub fn lookup(
        &self,
        residue_number: &str,
        atom_name: &str,
        residue_type: &str,
    ) -> Result<Atom, KeyNotFound> {
        self.resolve(&AtomKey::new(residue_number, atom_name, residue_type))
    }

    /// Resolves an atom from an already-built key.
    pub fn resolve(&self, key: &AtomKey) -> Result<Atom, KeyNotFound> {
        self.atoms
            .get(key)
            .map(|pos| Atom::new(key.clone(), *pos))
            .ok_or_else(|| KeyNotFound(key.clone()))
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Number of insertions that replaced an existing key.
    pub fn overwritten_count(&self) -> usize {
        self.overwritten
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AtomKey, &Point)> {
        self.atoms.iter()
    }
}
