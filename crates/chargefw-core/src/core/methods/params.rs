use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::{Bond, BondOrder};
use crate::core::utils::identifiers::normalize_element;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParameterLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterCategory {
    Common,
    Atom,
    Bond,
}

impl fmt::Display for ParameterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Common => write!(f, "common"),
            Self::Atom => write!(f, "atom"),
            Self::Bond => write!(f, "bond"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("Parameter set is for method '{found}', but '{expected}' was requested")]
    MethodMismatch { expected: String, found: String },
    #[error("Missing common parameter '{name}'")]
    MissingCommon { name: String },
    #[error("Atom type '{atom_type}' lacks required parameter '{name}'")]
    IncompleteAtomType { atom_type: String, name: String },
    #[error("Bond type '{bond_type}' lacks required parameter '{name}'")]
    IncompleteBondType { bond_type: String, name: String },
    #[error("Atom {index} of molecule '{molecule}' has type '{atom_type}' with no parameters")]
    UncoveredAtom {
        molecule: String,
        index: usize,
        atom_type: String,
    },
    #[error(
        "Bond {atom1}-{atom2} of molecule '{molecule}' has type '{bond_type}' with no parameters"
    )]
    UncoveredBond {
        molecule: String,
        atom1: usize,
        atom2: usize,
        bond_type: String,
    },
}

/// The parameter names a method reads, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterRequirements {
    pub common: Vec<&'static str>,
    pub atom: Vec<&'static str>,
    pub bond: Vec<&'static str>,
}

impl ParameterRequirements {
    pub fn new(
        common: &[&'static str],
        atom: &[&'static str],
        bond: &[&'static str],
    ) -> Self {
        Self {
            common: common.to_vec(),
            atom: atom.to_vec(),
            bond: bond.to_vec(),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.common.is_empty() && self.atom.is_empty() && self.bond.is_empty()
    }

    pub fn names(&self, category: ParameterCategory) -> &[&'static str] {
        match category {
            ParameterCategory::Common => &self.common,
            ParameterCategory::Atom => &self.atom,
            ParameterCategory::Bond => &self.bond,
        }
    }
}

/// Builds the key used for bond-level parameters: the two element symbols sorted, then the
/// numeric bond order, joined by `-` (e.g. `C-O-2`).
pub fn bond_type_key(element1: &str, element2: &str, order: BondOrder) -> String {
    let mut elements = [normalize_element(element1), normalize_element(element2)];
    elements.sort();
    format!("{}-{}-{}", elements[0], elements[1], order)
}

fn normalize_bond_key(key: &str) -> String {
    let parts: Vec<&str> = key.split('-').map(str::trim).collect();
    if let [first, second, order] = parts.as_slice() {
        if let Ok(order) = order.parse::<BondOrder>() {
            return bond_type_key(first, second, order);
        }
    }
    key.trim().to_uppercase()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawParameterSet {
    method: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    common: HashMap<String, f64>,
    #[serde(default)]
    atom: HashMap<String, HashMap<String, f64>>,
    #[serde(default)]
    bond: HashMap<String, HashMap<String, f64>>,
}

/// The named scalars one method needs, in three categories.
///
/// Atom-level entries are keyed by upper-case element symbol, bond-level entries by
/// [`bond_type_key`]. Keys are normalized on construction, so lookups are insensitive to the
/// case and element ordering used in the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    method: String,
    name: Option<String>,
    common: HashMap<String, f64>,
    atom: HashMap<String, HashMap<String, f64>>,
    bond: HashMap<String, HashMap<String, f64>>,
}

impl ParameterSet {
    pub fn new(method: &str) -> Self {
        Self {
            method: method.to_string(),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, ParameterLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParameterLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content).map_err(|e| ParameterLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let raw: RawParameterSet = toml::from_str(content)?;
        let mut set = Self::new(&raw.method);
        set.name = raw.name;
        set.common = raw.common;
        for (atom_type, values) in raw.atom {
            set.atom
                .entry(normalize_element(&atom_type))
                .or_default()
                .extend(values);
        }
        for (bond_type, values) in raw.bond {
            set.bond
                .entry(normalize_bond_key(&bond_type))
                .or_default()
                .extend(values);
        }
        Ok(set)
    }

    pub fn with_common(mut self, name: &str, value: f64) -> Self {
        self.common.insert(name.to_string(), value);
        self
    }

    pub fn with_atom(mut self, element: &str, name: &str, value: f64) -> Self {
        self.atom
            .entry(normalize_element(element))
            .or_default()
            .insert(name.to_string(), value);
        self
    }

    pub fn with_bond(mut self, bond_type: &str, name: &str, value: f64) -> Self {
        self.bond
            .entry(normalize_bond_key(bond_type))
            .or_default()
            .insert(name.to_string(), value);
        self
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn atom_types(&self) -> impl Iterator<Item = &str> {
        self.atom.keys().map(String::as_str)
    }

    pub fn bond_types(&self) -> impl Iterator<Item = &str> {
        self.bond.keys().map(String::as_str)
    }

    /// Checks the set against a method's requirements, independent of any molecule.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError`] if the set names another method, a common parameter is
    /// missing, or an atom or bond type lacks one of the required names.
    pub fn validate(
        &self,
        method: &str,
        requirements: &ParameterRequirements,
    ) -> Result<(), ParameterError> {
        if !self.method.eq_ignore_ascii_case(method) {
            return Err(ParameterError::MethodMismatch {
                expected: method.to_string(),
                found: self.method.clone(),
            });
        }

        for &name in &requirements.common {
            if !self.common.contains_key(name) {
                return Err(ParameterError::MissingCommon {
                    name: name.to_string(),
                });
            }
        }

        for (atom_type, values) in sorted(&self.atom) {
            if let Some(&name) = requirements.atom.iter().find(|n| !values.contains_key(**n)) {
                return Err(ParameterError::IncompleteAtomType {
                    atom_type: atom_type.clone(),
                    name: name.to_string(),
                });
            }
        }

        for (bond_type, values) in sorted(&self.bond) {
            if let Some(&name) = requirements.bond.iter().find(|n| !values.contains_key(**n)) {
                return Err(ParameterError::IncompleteBondType {
                    bond_type: bond_type.clone(),
                    name: name.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Checks that every atom (and every bond, if the method reads bond parameters) of the
    /// molecule has an entry in this set.
    pub fn check_coverage(
        &self,
        molecule: &Molecule,
        requirements: &ParameterRequirements,
    ) -> Result<(), ParameterError> {
        if !requirements.atom.is_empty() {
            for atom in molecule.atoms() {
                self.atom_entry(molecule, atom)?;
            }
        }
        if !requirements.bond.is_empty() {
            for bond in molecule.bonds() {
                self.bond_entry(molecule, bond)?;
            }
        }
        Ok(())
    }

    pub fn common(&self, name: &str) -> Result<f64, ParameterError> {
        self.common
            .get(name)
            .copied()
            .ok_or_else(|| ParameterError::MissingCommon {
                name: name.to_string(),
            })
    }

    pub fn atom(&self, molecule: &Molecule, atom: &Atom, name: &str) -> Result<f64, ParameterError> {
        self.atom_entry(molecule, atom)?
            .get(name)
            .copied()
            .ok_or_else(|| ParameterError::IncompleteAtomType {
                atom_type: atom.element.clone(),
                name: name.to_string(),
            })
    }

    pub fn bond(&self, molecule: &Molecule, bond: &Bond, name: &str) -> Result<f64, ParameterError> {
        let entry = self.bond_entry(molecule, bond)?;
        entry.get(name).copied().ok_or_else(|| {
            let atoms = molecule.atoms();
            ParameterError::IncompleteBondType {
                bond_type: bond_type_key(
                    &atoms[bond.atom1].element,
                    &atoms[bond.atom2].element,
                    bond.order,
                ),
                name: name.to_string(),
            }
        })
    }

    fn atom_entry(
        &self,
        molecule: &Molecule,
        atom: &Atom,
    ) -> Result<&HashMap<String, f64>, ParameterError> {
        self.atom
            .get(&atom.element)
            .ok_or_else(|| ParameterError::UncoveredAtom {
                molecule: molecule.name().to_string(),
                index: atom.index,
                atom_type: atom.element.clone(),
            })
    }

    fn bond_entry(
        &self,
        molecule: &Molecule,
        bond: &Bond,
    ) -> Result<&HashMap<String, f64>, ParameterError> {
        let atoms = molecule.atoms();
        let key = bond_type_key(
            &atoms[bond.atom1].element,
            &atoms[bond.atom2].element,
            bond.order,
        );
        self.bond
            .get(&key)
            .ok_or_else(|| ParameterError::UncoveredBond {
                molecule: molecule.name().to_string(),
                atom1: bond.atom1,
                atom2: bond.atom2,
                bond_type: key,
            })
    }
}

fn sorted<V>(map: &HashMap<String, V>) -> Vec<(&String, &V)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}
