//! Processing of a single work unit.
//!
//! A unit moves through `Loaded -> DetectorInvoked -> IndexBuilt -> BondsParsed ->
//! RecordEmitted`. Any failure is wrapped in [`Error::Unit`] together with the stage the unit
//! was working towards, so the worker can log it and decide, according to its failure policy,
//! whether to continue with the rest of its chunk.

use crate::io::{self, AtomLayout, read_bond_report, read_payload, read_structure_index};
use crate::model::{descriptor::MutationDescriptor, record::OutputRecord};
use crate::ops::detector::BondDetector;
use crate::ops::distance::bond_distances;
use crate::ops::error::{Error, Stage};
use crate::ops::scratch::ScratchSpace;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Runs one unit at a time inside a worker's scratch namespace.
pub struct StructureProcessor<'a, D: BondDetector + ?Sized> {
    detector: &'a D,
    scratch: &'a ScratchSpace,
    descriptor_offset: usize,
}

impl<'a, D: BondDetector + ?Sized> StructureProcessor<'a, D> {
    pub fn new(detector: &'a D, scratch: &'a ScratchSpace, descriptor_offset: usize) -> Self {
        Self {
            detector,
            scratch,
            descriptor_offset,
        }
    }

    /// Runs the full state machine for `unit` and returns its output record.
    ///
    /// Site resolution and distance evaluation belong to the `RecordEmitted` stage. The record
    /// is not written anywhere; appending it to the worker output completes that stage and is
    /// the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unit`] wrapping the failure of whichever stage did not complete.
    pub fn process(&self, unit: &Path) -> Result<OutputRecord, Error> {
        let (descriptor, payload) = self
            .load(unit)
            .map_err(|e| Error::unit(unit, Stage::Loaded, e))?;
        let structure = self
            .scratch
            .write_structure(&payload)
            .map_err(|e| Error::unit(unit, Stage::Loaded, e))?;

        let output = self
            .detector
            .detect(&structure)
            .map_err(|e| Error::unit(unit, Stage::DetectorInvoked, e))?;

        let index = read_file(&output.augmented, |reader| {
            read_structure_index(reader, AtomLayout::Tokenized)
        })
        .map_err(|e| Error::unit(unit, Stage::IndexBuilt, e))?;
        if index.overwritten_count() > 0 {
            debug!(
                "{}: {} duplicate atom records replaced earlier coordinates",
                unit.display(),
                index.overwritten_count()
            );
        }

        let bonds = read_file(&output.bond_report, read_bond_report)
            .map_err(|e| Error::unit(unit, Stage::BondsParsed, e))?;

        let (site_key_1, site_key_2) = descriptor.site_keys();
        let distances = (|| -> Result<Vec<f64>, Error> {
            let site_1 = index.resolve(&site_key_1)?;
            let site_2 = index.resolve(&site_key_2)?;
            bond_distances(&bonds, &index, &site_1, &site_2)
        })()
        .map_err(|e| Error::unit(unit, Stage::RecordEmitted, e))?;

        debug!(
            "{}: {} atoms indexed, {} bonds evaluated",
            unit.display(),
            index.len(),
            distances.len()
        );

        Ok(OutputRecord::new(descriptor, distances))
    }

    fn load(&self, unit: &Path) -> Result<(MutationDescriptor, String), Error> {
        let file_name = unit
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let descriptor = MutationDescriptor::from_file_name(&file_name, self.descriptor_offset)?;
        let payload = read_file(unit, read_payload)?;
        Ok((descriptor, payload))
    }
}

fn read_file<T>(
    path: &Path,
    read: impl FnOnce(BufReader<File>) -> Result<T, io::Error>,
) -> Result<T, io::Error> {
    let file = File::open(path).map_err(|e| io::Error::from_io(e, Some(path.to_path_buf())))?;
    read(BufReader::new(file)).map_err(|e| e.with_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_support::{FAIL_MARKER, hb2_report, h_line, single_bond_fixture};
    use crate::ops::test_support::CannedDetector;
    use std::fs;
    use tempfile::TempDir;

    const PAYLOAD: &str = "ATOM      1  N   SER A  10       0.000   0.000   0.000\nEND\n";

    fn write_unit(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn single_bond_structure_yields_hand_computed_distance() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchSpace::create(root.path(), 0).unwrap();
        let detector = single_bond_fixture();
        let unit = write_unit(root.path(), "1hhp_mut_25_A_50_G.pdb", PAYLOAD);

        let processor = StructureProcessor::new(&detector, &scratch, 2);
        let record = processor.process(&unit).unwrap();

        assert_eq!(record.descriptor.to_string(), "25 A 50 G");
        assert_eq!(record.distances.len(), 1);
        assert!((record.distances[0] - 4.5_f64.sqrt()).abs() < 1e-9);
        assert_eq!(detector.calls(), 1);
    }

    #[test]
    fn json_envelope_payload_reaches_the_detector() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchSpace::create(root.path(), 0).unwrap();
        let detector = single_bond_fixture();
        let json = serde_json::json!({ "pdb_data": { "pdb": PAYLOAD } }).to_string();
        let unit = write_unit(root.path(), "1hhp_mut_25_A_50_G.json", &json);

        let processor = StructureProcessor::new(&detector, &scratch, 2);
        processor.process(&unit).unwrap();

        assert_eq!(
            fs::read_to_string(scratch.structure_path()).unwrap(),
            PAYLOAD
        );
    }

    #[test]
    fn invalid_file_name_fails_while_loading() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchSpace::create(root.path(), 0).unwrap();
        let detector = single_bond_fixture();
        let unit = write_unit(root.path(), "structure.pdb", PAYLOAD);

        let err = StructureProcessor::new(&detector, &scratch, 2)
            .process(&unit)
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Loaded));
        assert!(!err.is_setup_failure());
        assert_eq!(detector.calls(), 0);
    }

    #[test]
    fn detector_failure_is_reported_at_detector_stage() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchSpace::create(root.path(), 0).unwrap();
        let detector = single_bond_fixture();
        let unit = write_unit(root.path(), "1hhp_mut_25_A_50_G.pdb", FAIL_MARKER);

        let err = StructureProcessor::new(&detector, &scratch, 2)
            .process(&unit)
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::DetectorInvoked));
    }

    #[test]
    fn missing_mutation_site_fails_record_stage() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchSpace::create(root.path(), 0).unwrap();
        let detector = single_bond_fixture();
        let unit = write_unit(root.path(), "1hhp_mut_26_A_50_G.pdb", PAYLOAD);

        let err = StructureProcessor::new(&detector, &scratch, 2)
            .process(&unit)
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::RecordEmitted));
        assert!(err.to_string().contains("ALA 26 CA"));
    }

    #[test]
    fn truncated_bond_row_fails_bond_stage() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchSpace::create(root.path(), 0).unwrap();
        let augmented = [
            h_line("CA", "ALA", 25, [0.0, 0.0, 0.0]),
            h_line("CA", "GLY", 50, [1.0, 0.0, 0.0]),
        ]
        .concat();
        let report = format!("{}A12 N\n", hb2_report(&[]));
        let detector = CannedDetector::new(augmented, report);
        let unit = write_unit(root.path(), "1hhp_mut_25_A_50_G.pdb", PAYLOAD);

        let err = StructureProcessor::new(&detector, &scratch, 2)
            .process(&unit)
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::BondsParsed));
        assert!(err.to_string().contains("unit_0.hb2"));
    }

    #[test]
    fn malformed_augmented_structure_fails_index_stage() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchSpace::create(root.path(), 0).unwrap();
        let detector = CannedDetector::new(
            "ATOM      1  N   SER A  10       0.000   x.000   0.000\n".to_string(),
            hb2_report(&[]),
        );
        let unit = write_unit(root.path(), "1hhp_mut_25_A_50_G.pdb", PAYLOAD);

        let err = StructureProcessor::new(&detector, &scratch, 2)
            .process(&unit)
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::IndexBuilt));
        assert!(err.to_string().contains("unit_0.h"));
    }

    #[test]
    fn structure_without_bonds_yields_empty_distance_list() {
        let root = TempDir::new().unwrap();
        let scratch = ScratchSpace::create(root.path(), 0).unwrap();
        let augmented = [
            h_line("CA", "ALA", 25, [0.0, 0.0, 0.0]),
            h_line("CA", "GLY", 50, [1.0, 0.0, 0.0]),
        ]
        .concat();
        let detector = CannedDetector::new(augmented, hb2_report(&[]));
        let unit = write_unit(root.path(), "1hhp_mut_25_A_50_G.pdb", PAYLOAD);

        let record = StructureProcessor::new(&detector, &scratch, 2)
            .process(&unit)
            .unwrap();

        assert!(record.distances.is_empty());
        assert_eq!(record.to_string(), "25 A 50 G");
    }
}
