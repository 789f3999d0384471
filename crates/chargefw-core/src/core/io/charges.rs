use crate::core::models::molecule::Molecule;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChargeWriteError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Molecule '{molecule}' has {atoms} atoms but {charges} charges")]
    LengthMismatch {
        molecule: String,
        atoms: usize,
        charges: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Txt,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "csv" => Ok(Self::Csv),
            _ => Err(format!("Unknown output format '{}'", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Txt => write!(f, "txt"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChargeRecord<'a> {
    molecule: &'a str,
    index: usize,
    atom: &'a str,
    residue: &'a str,
    residue_id: isize,
    charge: f64,
}

fn check_length(molecule: &Molecule, charges: &[f64]) -> Result<(), ChargeWriteError> {
    if molecule.len() != charges.len() {
        return Err(ChargeWriteError::LengthMismatch {
            molecule: molecule.name().to_string(),
            atoms: molecule.len(),
            charges: charges.len(),
        });
    }
    Ok(())
}

/// Writes charges as plain text: a line with the molecule name followed by a line of
/// space-separated charges, one block per molecule.
pub fn write_txt<'a, W, I>(writer: &mut W, entries: I) -> Result<(), ChargeWriteError>
where
    W: Write,
    I: IntoIterator<Item = (&'a Molecule, &'a [f64])>,
{
    for (molecule, charges) in entries {
        check_length(molecule, charges)?;
        writeln!(writer, "{}", molecule.name())?;
        let line = charges
            .iter()
            .map(|q| format!("{:.6}", q))
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

/// Writes charges as CSV with one row per atom.
pub fn write_csv<'a, W, I>(writer: W, entries: I) -> Result<(), ChargeWriteError>
where
    W: Write,
    I: IntoIterator<Item = (&'a Molecule, &'a [f64])>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (molecule, charges) in entries {
        check_length(molecule, charges)?;
        for (atom, &charge) in molecule.atoms().iter().zip(charges) {
            csv_writer.serialize(ChargeRecord {
                molecule: molecule.name(),
                index: atom.index,
                atom: &atom.name,
                residue: &atom.residue_name,
                residue_id: atom.residue_id,
                charge,
            })?;
        }
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes charges to `path` in the given format, replacing any existing file.
pub fn write_charges_to_path<'a, I>(
    path: &Path,
    format: OutputFormat,
    entries: I,
) -> Result<(), ChargeWriteError>
where
    I: IntoIterator<Item = (&'a Molecule, &'a [f64])>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        OutputFormat::Txt => write_txt(&mut writer, entries)?,
        OutputFormat::Csv => write_csv(&mut writer, entries)?,
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn water() -> Molecule {
        Molecule::new(
            "water",
            vec![
                Atom::new(0, "O", "HOH", 7, Point3::origin()),
                Atom::new(1, "H1", "HOH", 7, Point3::new(0.96, 0.0, 0.0)),
                Atom::new(2, "H2", "HOH", 7, Point3::new(-0.24, 0.93, 0.0)),
            ],
        )
        .unwrap()
    }

    const CHARGES: [f64; 3] = [-0.8, 0.4, 0.4];

    #[test]
    fn txt_output_has_name_and_charge_lines() {
        let molecule = water();
        let mut buffer = Vec::new();
        write_txt(&mut buffer, [(&molecule, &CHARGES[..])]).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "water\n-0.800000 0.400000 0.400000\n");
    }

    #[test]
    fn csv_output_has_header_and_one_row_per_atom() {
        let molecule = water();
        let mut buffer = Vec::new();
        write_csv(&mut buffer, [(&molecule, &CHARGES[..])]).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "molecule,index,atom,residue,residue_id,charge");
        assert_eq!(lines[1], "water,0,O,HOH,7,-0.8");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let molecule = water();
        let mut buffer = Vec::new();
        let result = write_txt(&mut buffer, [(&molecule, &CHARGES[..2])]);
        assert!(matches!(
            result,
            Err(ChargeWriteError::LengthMismatch {
                atoms: 3,
                charges: 2,
                ..
            })
        ));
    }

    #[test]
    fn write_to_path_uses_requested_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charges.csv");
        let molecule = water();

        write_charges_to_path(&path, OutputFormat::Csv, [(&molecule, &CHARGES[..])]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("molecule,index"));
    }

    #[test]
    fn output_format_parses_case_insensitively() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("txt".parse::<OutputFormat>(), Ok(OutputFormat::Txt));
        assert!("mol2".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "txt");
    }
}
