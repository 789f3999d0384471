use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::{Bond, BondOrder};
use nalgebra::Point3;
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Invalid formal charge in columns 79-80 (value: '{value}')")]
    InvalidCharge { value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must reach column 54)")]
    LineTooShort,
}

const MIN_ATOM_LINE_LENGTH: usize = 54;
const CONECT_PARTNER_COLUMNS: [(usize, usize); 4] = [(11, 16), (16, 21), (21, 26), (26, 31)];

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    line_num: usize,
    (start, end): (usize, usize),
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, line_num: usize, (start, end): (usize, usize)) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Parses a PDB formal charge field such as `1-`, `2+`, `+1` or `-1`. Blank means zero.
fn parse_formal_charge(value: &str) -> Option<i32> {
    if value.is_empty() {
        return Some(0);
    }
    let (digits, sign) = if let Some(digits) = value.strip_suffix('+') {
        (digits, 1)
    } else if let Some(digits) = value.strip_suffix('-') {
        (digits, -1)
    } else if let Some(digits) = value.strip_prefix('+') {
        (digits, 1)
    } else if let Some(digits) = value.strip_prefix('-') {
        (digits, -1)
    } else {
        (value, 1)
    };
    if digits.is_empty() {
        return Some(sign);
    }
    digits.parse::<i32>().ok().map(|magnitude| sign * magnitude)
}

fn is_primary_alt_loc(alt_loc: &str) -> bool {
    matches!(alt_loc, "" | "A" | "1")
}

/// Reader for the Protein Data Bank format.
///
/// Reads `ATOM`/`HETATM` records of the first model, keeping the primary alternate location
/// of each atom. Elements come from columns 77-78 when present and are guessed from the atom
/// name otherwise. `CONECT` records become single bonds.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead, name: &str) -> Result<Molecule, Self::Error> {
        let mut atoms: Vec<Atom> = Vec::new();
        let mut serial_to_index: HashMap<usize, usize> = HashMap::new();
        let mut skipped_serials: HashSet<usize> = HashSet::new();
        let mut conect: Vec<(usize, usize)> = Vec::new();
        let mut in_first_model = true;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match slice_and_trim(&line, 0, 6) {
                "ATOM" | "HETATM" if in_first_model => {
                    if line.len() < MIN_ATOM_LINE_LENGTH {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let serial: usize = parse_int(&line, line_num, (6, 11))?;
                    if !is_primary_alt_loc(slice_and_trim(&line, 16, 17)) {
                        skipped_serials.insert(serial);
                        continue;
                    }
                    let atom_name = slice_and_trim(&line, 12, 16);
                    if atom_name.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    let residue_name = slice_and_trim(&line, 17, 20);
                    let residue_id: isize = parse_int(&line, line_num, (22, 26))?;
                    let x = parse_float(&line, line_num, (30, 38))?;
                    let y = parse_float(&line, line_num, (38, 46))?;
                    let z = parse_float(&line, line_num, (46, 54))?;
                    let element = slice_and_trim(&line, 76, 78);
                    let charge_str = slice_and_trim(&line, 78, 80);
                    let formal_charge =
                        parse_formal_charge(charge_str).ok_or_else(|| PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::InvalidCharge {
                                value: charge_str.into(),
                            },
                        })?;

                    let index = atoms.len();
                    if serial_to_index.insert(serial, index).is_some() {
                        return Err(PdbError::Inconsistency(format!(
                            "Duplicate atom serial: {}",
                            serial
                        )));
                    }

                    let mut atom = Atom::new(
                        index,
                        atom_name,
                        residue_name,
                        residue_id,
                        Point3::new(x, y, z),
                    )
                    .with_formal_charge(formal_charge);
                    if !element.is_empty() {
                        atom = atom.with_element(element);
                    }
                    atoms.push(atom);
                }
                "CONECT" => {
                    let origin: usize = parse_int(&line, line_num, (6, 11))?;
                    for columns in CONECT_PARTNER_COLUMNS {
                        if slice_and_trim(&line, columns.0, columns.1).is_empty() {
                            continue;
                        }
                        let partner: usize = parse_int(&line, line_num, columns)?;
                        if partner != origin {
                            conect.push((origin.min(partner), origin.max(partner)));
                        }
                    }
                }
                "ENDMDL" => in_first_model = false,
                "END" => break,
                _ => {}
            }
        }

        if atoms.is_empty() {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }

        conect.sort_unstable();
        conect.dedup();

        let mut bonds = Vec::with_capacity(conect.len());
        for (serial1, serial2) in conect {
            match (serial_to_index.get(&serial1), serial_to_index.get(&serial2)) {
                (Some(&atom1), Some(&atom2)) => {
                    bonds.push(Bond::new(atom1, atom2, BondOrder::Single).canonical());
                }
                _ if skipped_serials.contains(&serial1) || skipped_serials.contains(&serial2) => {
                    debug!(serial1, serial2, "Skipping CONECT to an alternate location.");
                }
                _ => {
                    return Err(PdbError::Inconsistency(format!(
                        "CONECT references unknown atom serial in pair {}-{}",
                        serial1, serial2
                    )));
                }
            }
        }

        Molecule::with_bonds(name, atoms, bonds).map_err(|e| PdbError::Inconsistency(e.to_string()))
    }
}
