use super::Error;
use crate::io::read_output_records;
use std::io::{BufRead, Write};

const DESCRIPTOR_HEADINGS: [&str; 4] = [
    "Insertion Location 1",
    "Residue 1",
    "Insertion Location 2",
    "Residue 2",
];

/// Rewrites an output stream as a CSV table with one column per bond distance.
///
/// Records have varying bond counts, so the table is as wide as the longest record and shorter
/// rows are padded with empty fields.
///
/// # Returns
///
/// The number of records written.
///
/// # Errors
///
/// Returns [`Error::Record`] for the first malformed record; nothing is written in that case.
pub fn export_table<R: BufRead, W: Write>(reader: R, writer: W) -> Result<usize, Error> {
    let records = read_output_records(reader).collect::<Result<Vec<_>, _>>()?;
    let width = records.iter().map(|r| r.bond_count()).max().unwrap_or(0);

    let mut csv = csv::Writer::from_writer(writer);
    let write_err = |e: csv::Error| Error::write("<table output>", e);

    let mut header: Vec<String> = DESCRIPTOR_HEADINGS.iter().map(|h| h.to_string()).collect();
    header.extend((0..width).map(|i| format!("Hbond distance {i}")));
    csv.write_record(&header).map_err(write_err)?;

    for record in &records {
        let d = &record.descriptor;
        let mut fields = vec![
            d.location_1.to_string(),
            d.residue_1.one_letter().to_string(),
            d.location_2.to_string(),
            d.residue_2.one_letter().to_string(),
        ];
        fields.extend(record.distances.iter().map(|x| x.to_string()));
        fields.resize(DESCRIPTOR_HEADINGS.len() + width, String::new());
        csv.write_record(&fields).map_err(write_err)?;
    }

    csv.flush().map_err(|e| write_err(e.into()))?;
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn rows_are_padded_to_longest_record() {
        let mut buffer = Vec::new();
        let count = export_table(
            Cursor::new("25 A 50 G 3.5 12.25\n\n7 W 9 Y\n1 C 2 D 0.5\n"),
            &mut buffer,
        )
        .unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Insertion Location 1,Residue 1,Insertion Location 2,Residue 2,\
             Hbond distance 0,Hbond distance 1\n\
             25,A,50,G,3.5,12.25\n\
             7,W,9,Y,,\n\
             1,C,2,D,0.5,\n"
        );
    }

    #[test]
    fn records_without_bonds_give_descriptor_only_table() {
        let mut buffer = Vec::new();
        export_table(Cursor::new("7 W 9 Y\n"), &mut buffer).unwrap();

        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "Insertion Location 1,Residue 1,Insertion Location 2,Residue 2\n7,W,9,Y\n"
        );
    }

    #[test]
    fn malformed_record_writes_nothing() {
        let mut buffer = Vec::new();
        let err = export_table(Cursor::new("1 A 2 G 1.0\n1 A 2 G bad\n"), &mut buffer).unwrap_err();

        assert_eq!(err.line_number(), Some(2));
        assert!(buffer.is_empty());
    }
}
