use super::{Error, numbered_records};
use crate::model::{record::OutputRecord, types::AminoAcid};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::Path;

/// Buckets per pair when none is configured; the last bucket absorbs everything beyond it.
pub const DEFAULT_BUCKET_COUNT: usize = 35;

/// Residue order whose nested iteration fixes the row order of the histogram.
const PAIR_ORDER: [AminoAcid; 20] = [
    AminoAcid::ALA,
    AminoAcid::GLY,
    AminoAcid::SER,
    AminoAcid::ASN,
    AminoAcid::ASP,
    AminoAcid::CYS,
    AminoAcid::PRO,
    AminoAcid::THR,
    AminoAcid::GLN,
    AminoAcid::GLU,
    AminoAcid::HIS,
    AminoAcid::VAL,
    AminoAcid::ARG,
    AminoAcid::ILE,
    AminoAcid::LEU,
    AminoAcid::LYS,
    AminoAcid::MET,
    AminoAcid::PHE,
    AminoAcid::TRP,
    AminoAcid::TYR,
];

/// Distance histogram per unordered residue-type pair.
///
/// Each distance `d` lands in bucket `min(buckets - 1, trunc(d))`, so buckets are one ångström
/// wide and the last one is open-ended.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    buckets: usize,
    keys: Vec<String>,
    rows: HashMap<String, usize>,
    counts: Vec<Vec<u64>>,
}

impl Histogram {
    /// Creates an empty histogram with one row per residue-type pair (210 rows).
    pub fn new(buckets: usize) -> Result<Self, Error> {
        if buckets == 0 {
            return Err(Error::invalid_settings("bucket count must be at least 1"));
        }

        let mut keys = Vec::new();
        let mut rows = HashMap::new();
        for first in PAIR_ORDER {
            for second in PAIR_ORDER {
                let key = Self::pair_key(first, second);
                if !rows.contains_key(&key) {
                    rows.insert(key.clone(), keys.len());
                    keys.push(key);
                }
            }
        }

        let counts = vec![vec![0; buckets]; keys.len()];
        Ok(Self {
            buckets,
            keys,
            rows,
            counts,
        })
    }

    /// Builds a histogram from an output stream.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed record and reports its line.
    pub fn from_records<R: BufRead>(reader: R, buckets: usize) -> Result<Self, Error> {
        let mut histogram = Self::new(buckets)?;
        for entry in numbered_records(reader) {
            let (_, record) = entry?;
            histogram.add_record(&record);
        }
        Ok(histogram)
    }

    /// Row key of a pair: both one-letter codes in ascending order, so `GA` and `AG` coincide.
    pub fn pair_key(first: AminoAcid, second: AminoAcid) -> String {
        let (a, b) = (first.one_letter(), second.one_letter());
        if a <= b {
            format!("{a}{b}")
        } else {
            format!("{b}{a}")
        }
    }

    /// Bucket index of a non-negative distance.
    pub fn bucket_for(&self, distance: f64) -> usize {
        (distance.trunc() as usize).min(self.buckets - 1)
    }

    pub fn add_record(&mut self, record: &OutputRecord) {
        let key = Self::pair_key(record.descriptor.residue_1, record.descriptor.residue_2);
        if let Some(&row) = self.rows.get(&key) {
            for &distance in &record.distances {
                let bucket = self.bucket_for(distance);
                self.counts[row][bucket] += 1;
            }
        }
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets
    }

    /// Row keys in output order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn count(&self, key: &str, bucket: usize) -> Option<u64> {
        let row = *self.rows.get(key)?;
        self.counts[row].get(bucket).copied()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    /// Writes the `Key,0,...,n-1` header followed by one row per pair.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv = csv::Writer::from_writer(writer);

        let mut header = vec!["Key".to_string()];
        header.extend((0..self.buckets).map(|b| b.to_string()));
        csv.write_record(&header)?;

        for (key, row) in self.keys.iter().zip(&self.counts) {
            let mut fields = vec![key.clone()];
            fields.extend(row.iter().map(|count| count.to_string()));
            csv.write_record(&fields)?;
        }

        csv.flush()?;
        Ok(())
    }

    pub fn write_file(&self, path: &Path) -> Result<(), Error> {
        let file = std::fs::File::create(path).map_err(|e| Error::write(path, e))?;
        self.write_csv(file).map_err(|e| Error::write(path, e))
    }
}
