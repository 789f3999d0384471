use super::atom::Atom;
use super::topology::Bond;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    #[error("Atom at position {position} of molecule '{molecule}' has index {index}")]
    NonContiguousIndex {
        molecule: String,
        position: usize,
        index: usize,
    },
    #[error(
        "Bond {atom1}-{atom2} in molecule '{molecule}' references an atom outside [0, {atom_count})"
    )]
    BondOutOfRange {
        molecule: String,
        atom1: usize,
        atom2: usize,
        atom_count: usize,
    },
    #[error("Bond in molecule '{molecule}' connects atom {atom} to itself")]
    SelfBond { molecule: String, atom: usize },
}

/// A molecule: an index-stable sequence of atoms plus the bonds between them.
///
/// Construction validates that atom indices are exactly `0..n` in order and that every bond
/// refers to two distinct atoms of this molecule, so downstream code can index freely.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    name: String,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl Molecule {
    /// Creates a molecule without bonds.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::NonContiguousIndex`] if an atom's index differs from its position.
    pub fn new(name: &str, atoms: Vec<Atom>) -> Result<Self, MoleculeError> {
        Self::with_bonds(name, atoms, Vec::new())
    }

    /// Creates a molecule with an explicit bond list.
    ///
    /// # Errors
    ///
    /// Returns an error if atom indices are not contiguous or a bond is out of range or
    /// connects an atom to itself.
    pub fn with_bonds(
        name: &str,
        atoms: Vec<Atom>,
        bonds: Vec<Bond>,
    ) -> Result<Self, MoleculeError> {
        for (position, atom) in atoms.iter().enumerate() {
            if atom.index != position {
                return Err(MoleculeError::NonContiguousIndex {
                    molecule: name.to_string(),
                    position,
                    index: atom.index,
                });
            }
        }

        let mut molecule = Self {
            name: name.to_string(),
            atoms,
            bonds: Vec::with_capacity(bonds.len()),
        };
        molecule.set_bonds(bonds)?;
        Ok(molecule)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn has_bonds(&self) -> bool {
        !self.bonds.is_empty()
    }

    /// The target total charge: the sum of the atoms' formal charges.
    pub fn total_charge(&self) -> f64 {
        self.atoms.iter().map(|a| a.formal_charge as f64).sum()
    }

    /// Replaces the bond list after validating every bond against this molecule's atoms.
    pub fn set_bonds(&mut self, bonds: Vec<Bond>) -> Result<(), MoleculeError> {
        for bond in &bonds {
            self.check_bond(bond)?;
        }
        self.bonds = bonds;
        Ok(())
    }

    fn check_bond(&self, bond: &Bond) -> Result<(), MoleculeError> {
        let atom_count = self.atoms.len();
        if bond.atom1 >= atom_count || bond.atom2 >= atom_count {
            return Err(MoleculeError::BondOutOfRange {
                molecule: self.name.clone(),
                atom1: bond.atom1,
                atom2: bond.atom2,
                atom_count,
            });
        }
        if bond.atom1 == bond.atom2 {
            return Err(MoleculeError::SelfBond {
                molecule: self.name.clone(),
                atom: bond.atom1,
            });
        }
        Ok(())
    }

    /// Returns the number of distinct residue ids present in the molecule.
    pub fn residue_count(&self) -> usize {
        self.atoms
            .iter()
            .map(|a| a.residue_id)
            .collect::<HashSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::topology::BondOrder;
    use nalgebra::Point3;

    fn water_atoms() -> Vec<Atom> {
        vec![
            Atom::new(0, "O", "HOH", 1, Point3::new(0.0, 0.0, 0.0)),
            Atom::new(1, "H1", "HOH", 1, Point3::new(0.96, 0.0, 0.0)),
            Atom::new(2, "H2", "HOH", 1, Point3::new(-0.24, 0.93, 0.0)),
        ]
    }

    #[test]
    fn new_molecule_has_atoms_and_no_bonds() {
        let molecule = Molecule::new("water", water_atoms()).unwrap();
        assert_eq!(molecule.name(), "water");
        assert_eq!(molecule.len(), 3);
        assert!(!molecule.is_empty());
        assert!(!molecule.has_bonds());
        assert_eq!(molecule.residue_count(), 1);
    }

    #[test]
    fn new_molecule_rejects_non_contiguous_indices() {
        let mut atoms = water_atoms();
        atoms[2].index = 5;
        let result = Molecule::new("broken", atoms);
        assert_eq!(
            result,
            Err(MoleculeError::NonContiguousIndex {
                molecule: "broken".to_string(),
                position: 2,
                index: 5,
            })
        );
    }

    #[test]
    fn with_bonds_rejects_out_of_range_and_self_bonds() {
        let out_of_range = Molecule::with_bonds(
            "water",
            water_atoms(),
            vec![Bond::new(0, 3, BondOrder::Single)],
        );
        assert!(matches!(
            out_of_range,
            Err(MoleculeError::BondOutOfRange { atom_count: 3, .. })
        ));

        let self_bond = Molecule::with_bonds(
            "water",
            water_atoms(),
            vec![Bond::new(1, 1, BondOrder::Single)],
        );
        assert!(matches!(self_bond, Err(MoleculeError::SelfBond { atom: 1, .. })));
    }

    #[test]
    fn set_bonds_failure_keeps_existing_bonds() {
        let bond = Bond::new(0, 1, BondOrder::Single);
        let mut molecule = Molecule::with_bonds("water", water_atoms(), vec![bond]).unwrap();
        assert!(molecule.set_bonds(vec![Bond::new(0, 9, BondOrder::Single)]).is_err());
        assert_eq!(molecule.bonds(), &[bond]);
    }

    #[test]
    fn total_charge_sums_formal_charges() {
        let mut atoms = water_atoms();
        atoms[0] = atoms[0].clone().with_formal_charge(-1);
        let molecule = Molecule::new("hydroxide-ish", atoms).unwrap();
        assert_eq!(molecule.total_charge(), -1.0);
    }

    #[test]
    fn empty_molecule_is_valid() {
        let molecule = Molecule::new("empty", Vec::new()).unwrap();
        assert!(molecule.is_empty());
        assert_eq!(molecule.total_charge(), 0.0);
        assert_eq!(molecule.residue_count(), 0);
    }
}
