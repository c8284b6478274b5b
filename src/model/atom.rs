//! Atom identity and coordinate types shared by the index, the bond resolver, and geometry.
//!
//! Atoms are addressed by the triple that HBPLUS uses to name them in its reports: residue
//! sequence number, atom name, and three-letter residue type. All three are kept as strings so
//! that lookups compare exactly what the detector printed, without numeric normalization beyond
//! what the readers apply.

use super::types::Point;
use smol_str::SmolStr;
use std::fmt;

/// Lookup key identifying one atom within a single structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomKey {
    /// Residue sequence number as printed (e.g. `"25"`).
    pub residue_number: SmolStr,
    /// Atom label such as `"CA"` or `"OD1"`.
    pub atom_name: SmolStr,
    /// Three-letter residue type such as `"ASP"`.
    pub residue_type: SmolStr,
}

impl AtomKey {
    /// Creates a key from its three identifying fields.
    ///
    /// # Arguments
    ///
    /// * `residue_number` - Residue sequence number without leading zeros.
    /// * `atom_name` - Atom label.
    /// * `residue_type` - Three-letter residue name.
    pub fn new(residue_number: &str, atom_name: &str, residue_type: &str) -> Self {
        Self {
            residue_number: SmolStr::new(residue_number),
            atom_name: SmolStr::new(atom_name),
            residue_type: SmolStr::new(residue_type),
        }
    }
}

impl fmt::Display for AtomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.residue_type, self.residue_number, self.atom_name
        )
    }
}

/// Atom resolved from a structure index: identity plus Cartesian position.
///
/// Instances are immutable once constructed; geometry helpers read the position only.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub key: AtomKey,
    /// Cartesian coordinates measured in ångströms.
    pub pos: Point,
}

impl Atom {
    pub fn new(key: AtomKey, pos: Point) -> Self {
        Self { key, pos }
    }

    /// Computes the Euclidean distance from this atom to an arbitrary point.
    pub fn distance_to(&self, point: &Point) -> f64 {
        nalgebra::distance(&self.pos, point)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Atom {{ key: \"{}\", pos: [{:.3}, {:.3}, {:.3}] }}",
            self.key, self.pos.x, self.pos.y, self.pos.z
        )
    }
}
