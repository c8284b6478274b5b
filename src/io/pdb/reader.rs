use crate::io::error::Error;
use crate::model::{atom::AtomKey, index::StructureIndex, types::Point};
use std::io::BufRead;

const FORMAT: &str = "PDB";

/// Column convention used to extract atom fields from `ATOM`/`HETATM` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AtomLayout {
    /// Whitespace-separated fields as written by HBPLUS into `.h` files: atom name is field 2,
    /// residue type field 3, residue number field 5, and coordinates fields 6 to 8.
    #[default]
    Tokenized,
    /// Fixed character columns of an unannotated PDB file.
    FixedColumns,
}

pub fn read<R: BufRead>(reader: R, layout: AtomLayout) -> Result<StructureIndex, Error> {
    let mut index = StructureIndex::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line_num = line_idx + 1;
        let line = line.map_err(|e| Error::from_io(e, None))?;

        if !(line.starts_with("ATOM") || line.starts_with("HETATM")) {
            continue;
        }

        let (key, pos) = match layout {
            AtomLayout::Tokenized => parse_tokenized(&line, line_num)?,
            AtomLayout::FixedColumns => parse_fixed_columns(&line, line_num)?,
        };
        index.insert(key, pos);
    }

    Ok(index)
}

fn parse_tokenized(line: &str, line_num: usize) -> Result<(AtomKey, Point), Error> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 9 {
        return Err(Error::malformed(
            FORMAT,
            None,
            line_num,
            format!("Atom record has {} fields, expected at least 9", fields.len()),
        ));
    }

    let key = AtomKey::new(fields[5], fields[2], fields[3]);
    let pos = Point::new(
        parse_coordinate(fields[6], 'X', line_num)?,
        parse_coordinate(fields[7], 'Y', line_num)?,
        parse_coordinate(fields[8], 'Z', line_num)?,
    );
    Ok((key, pos))
}

fn parse_fixed_columns(line: &str, line_num: usize) -> Result<(AtomKey, Point), Error> {
    if line.len() < 54 {
        return Err(Error::malformed(
            FORMAT,
            None,
            line_num,
            "Atom record too short",
        ));
    }

    let column = |start: usize, end: usize| {
        line.get(start..end).map(str::trim).ok_or_else(|| {
            Error::malformed(
                FORMAT,
                None,
                line_num,
                format!("Columns {}-{} are not valid text", start + 1, end),
            )
        })
    };

    let atom_name = column(12, 16)?;
    let res_name = column(17, 20)?;
    let res_seq = column(22, 26)?;

    res_seq.parse::<i32>().map_err(|_| {
        Error::malformed(
            FORMAT,
            None,
            line_num,
            "Invalid residue sequence number",
        )
    })?;

    let key = AtomKey::new(res_seq, atom_name, res_name);
    let pos = Point::new(
        parse_coordinate(column(30, 38)?, 'X', line_num)?,
        parse_coordinate(column(38, 46)?, 'Y', line_num)?,
        parse_coordinate(column(46, 54)?, 'Z', line_num)?,
    );
    Ok((key, pos))
}

fn parse_coordinate(text: &str, axis: char, line_num: usize) -> Result<f64, Error> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| {
            Error::malformed(
                FORMAT,
                None,
                line_num,
                format!("Invalid {} coordinate '{}'", axis, text),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const H_FILE: &str = "\
HEADER    HBPLUS HYDROGEN-AUGMENTED STRUCTURE
ATOM      1  N   PRO A   1      -3.071  15.293  26.941  1.00 30.30           N
ATOM      2  CA  PRO A   1      -2.285  14.063  27.115  1.00 29.84           C
ATOM      3  H   GLN A   2       0.521  12.944  27.408  1.00  0.00           H
HETATM    4  O   HOH A 301      10.000  -1.500   2.250  1.00 20.00           O
TER
END
";

    #[test]
    fn tokenized_layout_indexes_every_atom_record() {
        let index = read(Cursor::new(H_FILE), AtomLayout::Tokenized).unwrap();

        assert_eq!(index.len(), 4);
        assert_eq!(
            index.lookup("1", "CA", "PRO").unwrap().pos,
            Point::new(-2.285, 14.063, 27.115)
        );
        assert_eq!(
            index.lookup("2", "H", "GLN").unwrap().pos,
            Point::new(0.521, 12.944, 27.408)
        );
        assert!(index.lookup("301", "O", "HOH").is_ok());
    }

    #[test]
    fn fixed_columns_layout_slices_character_offsets() {
        let line = "ATOM      2  CA  PRO A   1      -2.285  14.063  27.115  1.00 29.84           C";
        let index = read(Cursor::new(line), AtomLayout::FixedColumns).unwrap();

        assert_eq!(
            index.lookup("1", "CA", "PRO").unwrap().pos,
            Point::new(-2.285, 14.063, 27.115)
        );
    }

    #[test]
    fn fixed_columns_layout_handles_fields_without_separating_spaces() {
        let line = "ATOM   1234 HD21 ASN B1024     -12.345-100.250 999.999  1.00  0.00           H";
        let index = read(Cursor::new(line), AtomLayout::FixedColumns).unwrap();

        assert_eq!(
            index.lookup("1024", "HD21", "ASN").unwrap().pos,
            Point::new(-12.345, -100.25, 999.999)
        );
    }

    #[test]
    fn non_atom_records_are_ignored() {
        let text = "REMARK  nothing here\nCONECT    1    2\n";
        let index = read(Cursor::new(text), AtomLayout::Tokenized).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn malformed_coordinate_reports_line_and_axis() {
        let text = "REMARK\nATOM      1  N   PRO A   1      -3.071  abc     26.941  1.00 30.30\n";
        let err = read(Cursor::new(text), AtomLayout::Tokenized).unwrap_err();

        match err {
            Error::MalformedRecord {
                line_number,
                details,
                ..
            } => {
                assert_eq!(line_number, 2);
                assert!(details.contains("Y coordinate"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn short_tokenized_record_is_malformed() {
        let text = "ATOM      1  N   PRO A   1      -3.071\n";
        let err = read(Cursor::new(text), AtomLayout::Tokenized).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line_number: 1, .. }));
    }

    #[test]
    fn short_fixed_record_is_malformed() {
        let text = "ATOM      1  N   PRO A   1      -3.071\n";
        let err = read(Cursor::new(text), AtomLayout::FixedColumns).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { line_number: 1, .. }));
    }

    #[test]
    fn duplicate_atoms_keep_last_coordinates() {
        let text = "\
ATOM      1  CA  ALA A   5       1.000   1.000   1.000  1.00  0.00
ATOM      2  CA  ALA A   5       2.000   2.000   2.000  1.00  0.00
";
        let index = read(Cursor::new(text), AtomLayout::Tokenized).unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.overwritten_count(), 1);
        assert_eq!(
            index.lookup("5", "CA", "ALA").unwrap().pos,
            Point::new(2.0, 2.0, 2.0)
        );
    }
}
