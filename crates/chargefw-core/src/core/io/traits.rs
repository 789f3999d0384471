use crate::core::models::molecule::Molecule;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading molecules from structure file formats.
///
/// Implementors handle format-specific parsing; opening files and naming the resulting
/// molecule after the file are shared here.
pub trait MolecularFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads one molecule from a buffered reader.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    /// * `name` - The name given to the molecule, used in diagnostics and output.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead, name: &str) -> Result<Molecule, Self::Error>;

    /// Reads one molecule from a file, naming it after the file stem.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Molecule, Self::Error> {
        let path = path.as_ref();
        let name = molecule_name_from_path(path);
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, &name)
    }
}

/// Derives a molecule name from a file path: the file stem, or the whole path if it has none.
pub fn molecule_name_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn molecule_name_uses_file_stem() {
        assert_eq!(molecule_name_from_path(Path::new("/data/1abc.pdb")), "1abc");
        assert_eq!(molecule_name_from_path(Path::new("ligand")), "ligand");
    }
}
