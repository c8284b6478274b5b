use crate::io::error::Error;
use crate::model::{atom::AtomKey, bond::BondRecord};
use std::io::BufRead;

const FORMAT: &str = "HB2";

/// Number of banner and column-legend lines preceding the first bond row.
pub const HEADER_LINES: usize = 8;

/// Reads every donor/acceptor pair from an HBPLUS `.hb2` report, in report order.
///
/// Each data row starts with four whitespace-separated tokens: donor residue token, donor
/// atom name, acceptor residue token, acceptor atom name. A residue token such as
/// `A0025-ASP` carries the chain in column 0, the zero-padded residue number in columns 1-4,
/// the insertion code in column 5, and the residue type from column 6 onwards.
pub fn read<R: BufRead>(reader: R) -> Result<Vec<BondRecord>, Error> {
    let mut bonds = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line_num = line_idx + 1;
        let line = line.map_err(|e| Error::from_io(e, None))?;

        if line_num <= HEADER_LINES || line.trim().is_empty() {
            continue;
        }

        bonds.push(parse_bond_line(&line, line_num)?);
    }

    Ok(bonds)
}

fn parse_bond_line(line: &str, line_num: usize) -> Result<BondRecord, Error> {
    let mut fields = line.split_whitespace();
    let (Some(donor_res), Some(donor_atom), Some(acceptor_res), Some(acceptor_atom)) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(Error::malformed(
            FORMAT,
            None,
            line_num,
            "Bond record needs donor and acceptor residue/atom tokens",
        ));
    };

    let (donor_num, donor_type) = parse_residue_token(donor_res, line_num)?;
    let (acceptor_num, acceptor_type) = parse_residue_token(acceptor_res, line_num)?;

    Ok(BondRecord {
        donor: AtomKey::new(donor_num, donor_atom, donor_type),
        acceptor: AtomKey::new(acceptor_num, acceptor_atom, acceptor_type),
        line_number: line_num,
    })
}

fn parse_residue_token(token: &str, line_num: usize) -> Result<(&str, &str), Error> {
    let malformed = || {
        Error::malformed(
            FORMAT,
            None,
            line_num,
            format!("Invalid residue token '{}'", token),
        )
    };

    let number = token.get(1..5).ok_or_else(malformed)?.trim();
    let res_type = token
        .get(6..token.len().min(10))
        .ok_or_else(malformed)?
        .trim();

    if number.is_empty() || res_type.is_empty() {
        return Err(malformed());
    }

    let stripped = number.trim_start_matches('0');
    let number = if stripped.is_empty() { "0" } else { stripped };

    Ok((number, res_type))
}
