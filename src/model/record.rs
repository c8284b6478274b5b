use super::descriptor::MutationDescriptor;
use std::fmt;

/// One processed structure: its mutation pair and the nearest-site distance of every bond.
///
/// The number of distances varies between records; consumers must not assume a fixed column
/// count. Distances keep the order in which the bond report listed the bonds.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord {
    pub descriptor: MutationDescriptor,
    pub distances: Vec<f64>,
}

impl OutputRecord {
    pub fn new(descriptor: MutationDescriptor, distances: Vec<f64>) -> Self {
        Self {
            descriptor,
            distances,
        }
    }

    pub fn bond_count(&self) -> usize {
        self.distances.len()
    }
}

/// Space-separated line without the trailing newline.
impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.descriptor)?;
        for distance in &self.distances {
            write!(f, " {}", distance)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> MutationDescriptor {
        MutationDescriptor::from_fields("test", "25", "A", "50", "G").unwrap()
    }

    #[test]
    fn display_appends_distances_after_descriptor() {
        let record = OutputRecord::new(descriptor(), vec![3.5, 12.25, 0.125]);
        assert_eq!(record.to_string(), "25 A 50 G 3.5 12.25 0.125");
        assert_eq!(record.bond_count(), 3);
    }

    #[test]
    fn display_without_bonds_has_no_trailing_space() {
        let record = OutputRecord::new(descriptor(), Vec::new());
        assert_eq!(record.to_string(), "25 A 50 G");
    }

    #[test]
    fn display_uses_round_trip_float_formatting() {
        let value = 0.1 + 0.2;
        let record = OutputRecord::new(descriptor(), vec![value]);

        let text = record.to_string();
        let parsed: f64 = text.rsplit(' ').next().unwrap().parse().unwrap();
        assert_eq!(parsed, value);
    }
}
