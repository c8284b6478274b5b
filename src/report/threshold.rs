use super::{Error, numbered_records};
use crate::model::{record::OutputRecord, types::AminoAcid};
use log::debug;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Number of residue positions tabulated when none is configured.
pub const DEFAULT_RESIDUE_COUNT: usize = 101;

/// Row and column order of the residue-type matrices.
const TYPE_ORDER: [AminoAcid; 20] = [
    AminoAcid::ALA,
    AminoAcid::ARG,
    AminoAcid::ASN,
    AminoAcid::ASP,
    AminoAcid::CYS,
    AminoAcid::GLU,
    AminoAcid::GLN,
    AminoAcid::GLY,
    AminoAcid::HIS,
    AminoAcid::ILE,
    AminoAcid::LEU,
    AminoAcid::LYS,
    AminoAcid::MET,
    AminoAcid::PHE,
    AminoAcid::PRO,
    AminoAcid::SER,
    AminoAcid::THR,
    AminoAcid::TRP,
    AminoAcid::TYR,
    AminoAcid::VAL,
];

const CORNER_LABEL: &str = "Second Insertion";

/// How mutation sites are mapped onto matrix rows and columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdKeys {
    /// Residue positions `1..=n`.
    ResidueNumbers(usize),
    /// One-letter residue types.
    ResidueTypes,
}

impl Default for ThresholdKeys {
    fn default() -> Self {
        Self::ResidueNumbers(DEFAULT_RESIDUE_COUNT)
    }
}

impl ThresholdKeys {
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::ResidueNumbers(count) => (1..=*count).map(|n| n.to_string()).collect(),
            Self::ResidueTypes => TYPE_ORDER.iter().map(|aa| aa.one_letter().to_string()).collect(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::ResidueNumbers(_) => "residue number",
            Self::ResidueTypes => "residue type",
        }
    }

    fn cell(&self, record: &OutputRecord, line_number: usize) -> Result<(usize, usize), Error> {
        let d = &record.descriptor;
        match self {
            Self::ResidueNumbers(count) => {
                let index = |location: &str| {
                    position_index(location, *count)
                        .ok_or_else(|| Error::unknown_key(line_number, self.kind(), location))
                };
                Ok((index(d.location_1.as_str())?, index(d.location_2.as_str())?))
            }
            Self::ResidueTypes => Ok((type_index(d.residue_1), type_index(d.residue_2))),
        }
    }
}

fn position_index(location: &str, count: usize) -> Option<usize> {
    location
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=count).contains(n))
        .map(|n| n - 1)
}

fn type_index(residue: AminoAcid) -> usize {
    TYPE_ORDER
        .iter()
        .position(|aa| *aa == residue)
        .unwrap_or_default()
}

/// Square matrices of distance counts at or above, and below, a threshold.
///
/// Rows are indexed by the first mutation site and columns by the second; the pair is not
/// symmetrized.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdTable {
    keys: ThresholdKeys,
    labels: Vec<String>,
    threshold: f64,
    above: Vec<Vec<u64>>,
    below: Vec<Vec<u64>>,
}

impl ThresholdTable {
    /// Creates an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSettings`] for a non-finite threshold or zero residue positions.
    pub fn new(keys: ThresholdKeys, threshold: f64) -> Result<Self, Error> {
        if !threshold.is_finite() {
            return Err(Error::invalid_settings(format!(
                "threshold must be finite, got {threshold}"
            )));
        }
        if keys == ThresholdKeys::ResidueNumbers(0) {
            return Err(Error::invalid_settings("residue count must be at least 1"));
        }

        let labels = keys.labels();
        let n = labels.len();
        Ok(Self {
            keys,
            labels,
            threshold,
            above: vec![vec![0; n]; n],
            below: vec![vec![0; n]; n],
        })
    }

    /// Tabulates every record of an output stream.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed record or unknown key and reports its line.
    pub fn from_records<R: BufRead>(
        reader: R,
        keys: ThresholdKeys,
        threshold: f64,
    ) -> Result<Self, Error> {
        let mut table = Self::new(keys, threshold)?;
        for entry in numbered_records(reader) {
            let (line_number, record) = entry?;
            table.add_record(&record, line_number)?;
        }
        debug!(
            "Tabulated {} distances against threshold {}",
            table.total(),
            table.threshold
        );
        Ok(table)
    }

    /// Counts the distances of one record; `line_number` is only used for error reporting.
    pub fn add_record(&mut self, record: &OutputRecord, line_number: usize) -> Result<(), Error> {
        let (row, col) = self.keys.cell(record, line_number)?;
        for &distance in &record.distances {
            if distance >= self.threshold {
                self.above[row][col] += 1;
            } else {
                self.below[row][col] += 1;
            }
        }
        Ok(())
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Count at or above the threshold for the labelled pair.
    pub fn above(&self, first: &str, second: &str) -> Option<u64> {
        self.lookup(&self.above, first, second)
    }

    /// Count below the threshold for the labelled pair.
    pub fn below(&self, first: &str, second: &str) -> Option<u64> {
        self.lookup(&self.below, first, second)
    }

    /// Number of distances tabulated in either matrix.
    pub fn total(&self) -> u64 {
        self.above
            .iter()
            .chain(&self.below)
            .flat_map(|row| row.iter())
            .sum()
    }

    fn lookup(&self, matrix: &[Vec<u64>], first: &str, second: &str) -> Option<u64> {
        let row = self.labels.iter().position(|l| l == first)?;
        let col = self.labels.iter().position(|l| l == second)?;
        Some(matrix[row][col])
    }

    pub fn write_above<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        write_matrix(writer, &self.labels, &self.above)
    }

    pub fn write_below<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        write_matrix(writer, &self.labels, &self.below)
    }

    /// Writes `<prefix>_above_thresh.csv` and `<prefix>_below_thresh.csv`.
    ///
    /// # Returns
    ///
    /// The paths of the above and below files, in that order.
    pub fn write_files(&self, prefix: &Path) -> Result<(PathBuf, PathBuf), Error> {
        let above = suffixed(prefix, "_above_thresh.csv");
        let below = suffixed(prefix, "_below_thresh.csv");

        let file = std::fs::File::create(&above).map_err(|e| Error::write(&above, e))?;
        self.write_above(file).map_err(|e| Error::write(&above, e))?;
        let file = std::fs::File::create(&below).map_err(|e| Error::write(&below, e))?;
        self.write_below(file).map_err(|e| Error::write(&below, e))?;

        Ok((above, below))
    }
}

fn write_matrix<W: Write>(writer: W, labels: &[String], matrix: &[Vec<u64>]) -> Result<(), csv::Error> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec![CORNER_LABEL.to_string()];
    header.extend(labels.iter().cloned());
    csv.write_record(&header)?;

    for (label, row) in labels.iter().zip(matrix) {
        let mut fields = vec![label.clone()];
        fields.extend(row.iter().map(|count| count.to_string()));
        csv.write_record(&fields)?;
    }

    csv.flush()?;
    Ok(())
}

pub(super) fn suffixed(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
