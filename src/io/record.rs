//! Line codec for the pipeline's output records.
//!
//! Each line holds `location_1 type_1 location_2 type_2` followed by zero or more distances,
//! separated by single spaces.

use crate::io::error::Error;
use crate::model::{descriptor::MutationDescriptor, record::OutputRecord};
use std::io::{BufRead, Write};

const FORMAT: &str = "record";

/// Writes one record followed by a newline.
pub fn write<W: Write>(writer: &mut W, record: &OutputRecord) -> Result<(), Error> {
    writeln!(writer, "{}", record).map_err(|e| Error::from_io(e, None))
}

/// Parses one output line.
///
/// Distances must be finite, non-negative numbers; the error for an offending distance
/// names its 0-based index within the line's distance list.
pub fn parse_line(line: &str, line_num: usize) -> Result<OutputRecord, Error> {
    let mut fields = line.split_whitespace();
    let (Some(loc1), Some(typ1), Some(loc2), Some(typ2)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::malformed(
            FORMAT,
            None,
            line_num,
            "expected 4 mutation descriptor fields",
        ));
    };

    let descriptor = MutationDescriptor::from_fields(line, loc1, typ1, loc2, typ2)
        .map_err(|e| Error::malformed(FORMAT, None, line_num, e.details))?;

    let distances = fields
        .enumerate()
        .map(|(idx, token)| {
            token
                .parse::<f64>()
                .ok()
                .filter(|d| d.is_finite() && *d >= 0.0)
                .ok_or_else(|| {
                    Error::malformed(
                        FORMAT,
                        None,
                        line_num,
                        format!("distance {} ('{}') is not a non-negative number", idx, token),
                    )
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(OutputRecord::new(descriptor, distances))
}

/// Iterates the records of a combined output stream, skipping blank lines.
pub fn read<R: BufRead>(reader: R) -> impl Iterator<Item = Result<OutputRecord, Error>> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(line_idx, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_line(&line, line_idx + 1)),
            Err(e) => Some(Err(Error::from_io(e, None))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn write_then_parse_preserves_fields() {
        let descriptor = MutationDescriptor::from_fields("t", "12", "H", "40", "Y").unwrap();
        let record = OutputRecord::new(descriptor, vec![4.5, 17.0625]);

        let mut buffer = Vec::new();
        write(&mut buffer, &record).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(text, "12 H 40 Y 4.5 17.0625\n");
        assert_eq!(parse_line(text.trim_end(), 1).unwrap(), record);
    }

    #[test]
    fn parse_line_accepts_trailing_space_without_distances() {
        let record = parse_line("25 A 50 G ", 1).unwrap();
        assert!(record.distances.is_empty());
    }

    #[test]
    fn parse_line_reports_offending_distance_index() {
        let err = parse_line("25 A 50 G 1.0 2.0 oops 3.0", 7).unwrap_err();

        match err {
            Error::MalformedRecord {
                line_number,
                details,
                ..
            } => {
                assert_eq!(line_number, 7);
                assert!(details.contains("distance 2"));
                assert!(details.contains("'oops'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parse_line_rejects_nan_and_negative_distances() {
        assert!(parse_line("25 A 50 G NaN", 1).is_err());
        assert!(parse_line("25 A 50 G -1.5", 1).is_err());
        assert!(parse_line("25 A 50 G inf", 1).is_err());
    }

    #[test]
    fn parse_line_rejects_short_or_invalid_descriptor() {
        assert!(parse_line("25 A 50", 1).is_err());
        assert!(parse_line("25 Z 50 G 1.0", 1).is_err());
    }

    #[test]
    fn read_skips_blank_lines_and_numbers_lines_from_one() {
        let text = "1 A 2 G 3.0\n\n3 C 4 D 5.5 6.5\n5 E 6 F bad\n";
        let results: Vec<_> = read(Cursor::new(text)).collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().distances, vec![3.0]);
        assert_eq!(results[1].as_ref().unwrap().distances, vec![5.5, 6.5]);
        assert!(matches!(
            results[2],
            Err(Error::MalformedRecord { line_number: 4, .. })
        ));
    }
}
