//! Bond-to-site geometry.
//!
//! Every hydrogen bond is represented by the midpoint between its donor and acceptor atoms.
//! The distance reported for a bond is the distance from that midpoint to the closer of the
//! two mutation-site alpha carbons. Distances are exact Euclidean norms in ångströms.

use crate::io::read_bond_report;
use crate::model::{
    atom::{Atom, AtomKey},
    bond::BondRecord,
    index::StructureIndex,
    types::Point,
};
use crate::ops::error::Error;
use std::io::BufRead;

/// Componentwise average of two points.
pub fn midpoint(a: &Point, b: &Point) -> Point {
    nalgebra::center(a, b)
}

/// Straight-line distance between two points.
pub fn euclidean_distance(p: &Point, q: &Point) -> f64 {
    nalgebra::distance(p, q)
}

/// Distance from `point` to whichever of the two sites is closer.
pub fn nearest_site_distance(point: &Point, site_1: &Atom, site_2: &Atom) -> f64 {
    site_1.distance_to(point).min(site_2.distance_to(point))
}

/// Reduces each bond to the distance between its midpoint and the nearest mutation site.
///
/// # Arguments
///
/// * `bonds` - Donor/acceptor pairs in report order.
/// * `index` - Coordinates of the structure the report describes.
/// * `site_1`, `site_2` - Resolved alpha carbons of the two mutation sites.
///
/// # Returns
///
/// One distance per bond, in the same order as `bonds`.
///
/// # Errors
///
/// Returns [`Error::UnresolvedBond`] for the first bond whose donor or acceptor is missing
/// from `index`. Unresolvable bonds are never skipped.
pub fn bond_distances(
    bonds: &[BondRecord],
    index: &StructureIndex,
    site_1: &Atom,
    site_2: &Atom,
) -> Result<Vec<f64>, Error> {
    bonds
        .iter()
        .map(|bond| {
            let resolve = |key: &AtomKey| {
                index.resolve(key).map_err(|source| Error::UnresolvedBond {
                    line_number: bond.line_number,
                    source,
                })
            };
            let donor = resolve(&bond.donor)?;
            let acceptor = resolve(&bond.acceptor)?;
            let center = midpoint(&donor.pos, &acceptor.pos);
            Ok(nearest_site_distance(&center, site_1, site_2))
        })
        .collect()
}

/// Parses an HBPLUS bond report and evaluates every bond against the two mutation sites.
pub fn evaluate_bond_report<R: BufRead>(
    reader: R,
    index: &StructureIndex,
    site_1: &Atom,
    site_2: &Atom,
) -> Result<Vec<f64>, Error> {
    let bonds = read_bond_report(reader)?;
    bond_distances(&bonds, index, site_1, site_2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn atom(residue: &str, name: &str, res_type: &str, pos: Point) -> Atom {
        Atom::new(AtomKey::new(residue, name, res_type), pos)
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = Point::new(1.5, -2.25, 8.0);
        assert_eq!(euclidean_distance(&p, &p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let p = Point::new(0.3, 1.7, -9.1);
        let q = Point::new(-4.4, 2.2, 5.05);
        assert_eq!(euclidean_distance(&p, &q), euclidean_distance(&q, &p));
    }

    #[test]
    fn distance_matches_pythagorean_triple() {
        let p = Point::new(1.0, 2.0, 3.0);
        let q = Point::new(3.0, 5.0, 9.0);
        assert!((euclidean_distance(&p, &q) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn midpoint_is_symmetric_and_componentwise() {
        let a = Point::new(1.0, -3.0, 10.0);
        let b = Point::new(4.0, 5.0, -2.0);

        assert_eq!(midpoint(&a, &b), midpoint(&b, &a));
        assert_eq!(midpoint(&a, &b), Point::new(2.5, 1.0, 4.0));
    }

    #[test]
    fn nearest_site_distance_keeps_minimum_of_two() {
        let point = Point::origin();
        let near = atom("1", "CA", "ALA", Point::new(3.0, 0.0, 0.0));
        let far = atom("2", "CA", "GLY", Point::new(0.0, 5.0, 0.0));

        assert_eq!(nearest_site_distance(&point, &near, &far), 3.0);
        assert_eq!(nearest_site_distance(&point, &far, &near), 3.0);
    }

    fn sample_index() -> StructureIndex {
        let mut index = StructureIndex::new();
        index.insert(AtomKey::new("10", "N", "SER"), Point::new(0.0, 0.0, 0.0));
        index.insert(AtomKey::new("14", "O", "LEU"), Point::new(2.0, 0.0, 0.0));
        index.insert(AtomKey::new("20", "OG", "SER"), Point::new(10.0, 10.0, 0.0));
        index.insert(AtomKey::new("21", "H", "GLY"), Point::new(10.0, 12.0, 0.0));
        index
    }

    fn bond(line: usize, donor: AtomKey, acceptor: AtomKey) -> BondRecord {
        BondRecord {
            donor,
            acceptor,
            line_number: line,
        }
    }

    #[test]
    fn bond_distances_follow_bond_order() {
        let index = sample_index();
        let site_1 = atom("1", "CA", "ALA", Point::new(1.0, 0.0, 4.0));
        let site_2 = atom("2", "CA", "GLY", Point::new(10.0, 11.0, 1.0));
        let bonds = vec![
            bond(
                9,
                AtomKey::new("20", "OG", "SER"),
                AtomKey::new("21", "H", "GLY"),
            ),
            bond(
                10,
                AtomKey::new("10", "N", "SER"),
                AtomKey::new("14", "O", "LEU"),
            ),
        ];

        let distances = bond_distances(&bonds, &index, &site_1, &site_2).unwrap();

        assert_eq!(distances.len(), 2);
        assert!((distances[0] - 1.0).abs() < 1e-12);
        assert!((distances[1] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn unresolved_bond_is_an_error_naming_the_report_line() {
        let index = sample_index();
        let site = atom("1", "CA", "ALA", Point::origin());
        let bonds = vec![bond(
            12,
            AtomKey::new("10", "N", "SER"),
            AtomKey::new("99", "O", "TRP"),
        )];

        let err = bond_distances(&bonds, &index, &site, &site).unwrap_err();
        match err {
            Error::UnresolvedBond {
                line_number,
                source,
            } => {
                assert_eq!(line_number, 12);
                assert_eq!(source.0, AtomKey::new("99", "O", "TRP"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn evaluate_bond_report_parses_and_measures() {
        let mut report = "header\n".repeat(8);
        report.push_str("A0010-SER N   A0014-LEU O   2.00 MM   4  5.00 150.0  1.10 160.0 140.0     1\n");
        let index = sample_index();
        let site_1 = atom("1", "CA", "ALA", Point::new(1.0, 3.0, 0.0));
        let site_2 = atom("2", "CA", "GLY", Point::new(1.0, 0.0, -5.0));

        let distances =
            evaluate_bond_report(Cursor::new(report), &index, &site_1, &site_2).unwrap();

        assert_eq!(distances, vec![3.0]);
    }
}
