use crate::core::utils::identifiers::{guess_element, normalize_element};
use nalgebra::Point3;

/// Represents an atom of a molecule together with the data charge methods need.
///
/// Atoms are owned by a [`Molecule`](super::molecule::Molecule) and addressed by their
/// `index`, which equals their position in the molecule's atom sequence. The element symbol
/// is the key used to look up atom-level parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The 0-based position of the atom within its molecule.
    pub index: usize,
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// The upper-case element symbol (e.g., "C", "N", "CL").
    pub element: String,
    /// The name of the residue this atom belongs to (e.g., "ALA", "HOH").
    pub residue_name: String,
    /// The residue sequence number used to group atoms and detect backbone adjacency.
    pub residue_id: isize,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The integral formal charge in elementary charge units.
    pub formal_charge: i32,
}

impl Atom {
    /// Creates a new `Atom`, guessing the element from the atom name.
    ///
    /// The element can be overridden with [`Atom::with_element`] when the source provides it.
    /// The formal charge defaults to zero.
    ///
    /// # Arguments
    ///
    /// * `index` - The position of the atom in its molecule.
    /// * `name` - The name of the atom.
    /// * `residue_name` - The name of the parent residue.
    /// * `residue_id` - The sequence number of the parent residue.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(
        index: usize,
        name: &str,
        residue_name: &str,
        residue_id: isize,
        position: Point3<f64>,
    ) -> Self {
        Self {
            index,
            name: name.to_string(),
            element: guess_element(name).unwrap_or_default(),
            residue_name: residue_name.to_string(),
            residue_id,
            position,
            formal_charge: 0,
        }
    }

    pub fn with_element(mut self, element: &str) -> Self {
        self.element = normalize_element(element);
        self
    }

    pub fn with_formal_charge(mut self, formal_charge: i32) -> Self {
        self.formal_charge = formal_charge;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new(3, "CA", "ALA", 7, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.index, 3);
        assert_eq!(atom.name, "CA");
        assert_eq!(atom.residue_name, "ALA");
        assert_eq!(atom.residue_id, 7);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.formal_charge, 0);
    }

    #[test]
    fn new_atom_guesses_element_from_name() {
        assert_eq!(Atom::new(0, "CA", "ALA", 1, Point3::origin()).element, "C");
        assert_eq!(Atom::new(0, "1HB", "ALA", 1, Point3::origin()).element, "H");
        assert_eq!(Atom::new(0, "", "UNK", 1, Point3::origin()).element, "");
    }

    #[test]
    fn with_element_overrides_and_normalizes() {
        let atom = Atom::new(0, "CL1", "LIG", 1, Point3::origin()).with_element(" Cl ");
        assert_eq!(atom.element, "CL");
    }

    #[test]
    fn with_formal_charge_sets_charge() {
        let atom = Atom::new(0, "NZ", "LYS", 1, Point3::origin()).with_formal_charge(1);
        assert_eq!(atom.formal_charge, 1);
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let atom1 = Atom::new(1, "N", "GLY", 2, Point3::new(0.0, 0.0, 0.0)).with_formal_charge(-1);
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
    }
}
