use crate::ops::detector::{BondDetector, DetectorOutput};
use crate::ops::error::Error;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

/// Payload marker that makes [`CannedDetector`] report a failed run.
pub const FAIL_MARKER: &str = "DETECTOR_FAIL";

/// Detector stand-in that writes fixed `.h` and `.hb2` contents next to the structure.
pub struct CannedDetector {
    augmented: String,
    report: String,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl CannedDetector {
    pub fn new(augmented: String, report: String) -> Self {
        Self {
            augmented,
            report,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Makes every successful run take at least `delay`; failing runs return immediately.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BondDetector for CannedDetector {
    fn name(&self) -> &str {
        "canned"
    }

    fn detect(&self, structure: &Path) -> Result<DetectorOutput, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let payload = fs::read_to_string(structure).map_err(|e| Error::scratch(structure, e))?;
        if payload.contains(FAIL_MARKER) {
            return Err(Error::detector_failure("canned", Some(1), "marker found"));
        }
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }

        let output = DetectorOutput::expected_for(structure);
        fs::write(&output.augmented, &self.augmented)
            .map_err(|e| Error::scratch(&output.augmented, e))?;
        fs::write(&output.bond_report, &self.report)
            .map_err(|e| Error::scratch(&output.bond_report, e))?;
        Ok(output)
    }
}

/// One `ATOM` record in the whitespace-separated layout HBPLUS writes to `.h` files.
pub fn h_line(name: &str, res_type: &str, res_seq: u32, pos: [f64; 3]) -> String {
    format!(
        "ATOM      1  {:<4}{:>3} A{:>4}    {:>8.3} {:>8.3} {:>8.3}  1.00  0.00\n",
        name, res_type, res_seq, pos[0], pos[1], pos[2]
    )
}

/// An `.hb2` report with the standard header followed by the given donor/acceptor rows.
///
/// Each row is `(donor_seq, donor_type, donor_atom, acceptor_seq, acceptor_type,
/// acceptor_atom)`.
pub fn hb2_report(rows: &[(u32, &str, &str, u32, &str, &str)]) -> String {
    let mut text = String::new();
    for i in 0..crate::io::BOND_REPORT_HEADER_LINES {
        text.push_str(&format!("header line {}\n", i + 1));
    }
    for (d_seq, d_type, d_atom, a_seq, a_type, a_atom) in rows {
        text.push_str(&format!(
            "A{:04}-{} {:<3} A{:04}-{} {:<3} 2.89 MM   1  4.52 131.2  2.04 150.6 146.1     1\n",
            d_seq, d_type, d_atom, a_seq, a_type, a_atom
        ));
    }
    text
}

/// Structure with one SER10 N -> LEU14 O bond whose midpoint is (1, 0, 0), and alpha carbons
/// for ALA25 at (1.5, 2, -0.5) and GLY50 at (7, 8, 9).
pub fn single_bond_fixture() -> CannedDetector {
    let augmented = [
        h_line("N", "SER", 10, [0.0, 0.0, 0.0]),
        h_line("O", "LEU", 14, [2.0, 0.0, 0.0]),
        h_line("CA", "ALA", 25, [1.5, 2.0, -0.5]),
        h_line("CA", "GLY", 50, [7.0, 8.0, 9.0]),
    ]
    .concat();
    let report = hb2_report(&[(10, "SER", "N", 14, "LEU", "O")]);
    CannedDetector::new(augmented, report)
}
