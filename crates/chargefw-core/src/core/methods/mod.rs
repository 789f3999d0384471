//! Charge calculation methods and the parameter sets that drive them.
//!
//! # Overview
//!
//! A [`Method`] turns a [`Molecule`] and a [`ParameterSet`] into one partial charge per atom.
//! Methods are looked up by name in a [`MethodRegistry`], which comes with the built-in
//! methods pre-registered and accepts external implementations.
//!
//! # Key Components
//!
//! - [`Method`] - The trait every charge method implements.
//! - [`MethodRegistry`] - Case-insensitive name to method mapping.
//! - [`params::ParameterSet`] - Common, atom-level and bond-level scalars loaded from TOML.
//! - [`ChargeError`] - Failures raised while computing charges.
//!
//! # Usage
//!
//! ```ignore
//! let registry = MethodRegistry::default();
//! let method = registry.get("eem").unwrap();
//! let parameters = ParameterSet::load(Path::new("eem.toml"))?;
//! parameters.validate(method.name(), method.required_parameters())?;
//! let charges = method.calculate_charges(&molecule, &parameters)?;
//! ```

pub mod eem;
pub mod formal;
pub mod mpeoe;
pub mod params;

use crate::core::models::molecule::Molecule;
use params::{ParameterError, ParameterRequirements, ParameterSet};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NumericErrorKind {
    #[error("atoms {atom1} and {atom2} occupy the same position")]
    CoincidentAtoms { atom1: usize, atom2: usize },
    #[error("the linear system is singular")]
    SingularSystem,
    #[error("the solution contains non-finite values")]
    NonFiniteCharges,
    #[error("cation electronegativity of atom {atom} is zero")]
    ZeroCationElectronegativity { atom: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChargeError {
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    #[error("Numeric failure for molecule '{molecule}': {kind}")]
    Numeric {
        molecule: String,
        kind: NumericErrorKind,
    },
}

impl ChargeError {
    pub(crate) fn numeric(molecule: &Molecule, kind: NumericErrorKind) -> Self {
        Self::Numeric {
            molecule: molecule.name().to_string(),
            kind,
        }
    }
}

/// A partial-charge method.
///
/// Implementations are stateless with respect to a calculation: everything a call needs comes
/// from its arguments, so one instance can serve many molecules across threads.
pub trait Method: Send + Sync {
    fn name(&self) -> &'static str;

    fn required_parameters(&self) -> &ParameterRequirements;

    /// Whether the method reads the molecule's bonds.
    fn uses_bonds(&self) -> bool {
        !self.required_parameters().bond.is_empty()
    }

    /// Computes one charge per atom, index-aligned with `molecule.atoms()`.
    ///
    /// # Errors
    ///
    /// Returns [`ChargeError::Parameters`] if the set does not cover the molecule and
    /// [`ChargeError::Numeric`] if the computation breaks down.
    fn calculate_charges(
        &self,
        molecule: &Molecule,
        parameters: &ParameterSet,
    ) -> Result<Vec<f64>, ChargeError>;
}

#[derive(Clone)]
pub struct MethodRegistry {
    methods: BTreeMap<String, Arc<dyn Method>>,
}

impl MethodRegistry {
    /// Creates a registry with no methods.
    pub fn empty() -> Self {
        Self {
            methods: BTreeMap::new(),
        }
    }

    /// Creates a registry holding the built-in methods.
    pub fn with_builtin_methods() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(eem::Eem::new()));
        registry.register(Arc::new(mpeoe::Mpeoe::new()));
        registry.register(Arc::new(formal::Formal::new()));
        registry
    }

    /// Registers a method under its name, returning any method it replaces.
    pub fn register(&mut self, method: Arc<dyn Method>) -> Option<Arc<dyn Method>> {
        self.methods.insert(method.name().to_lowercase(), method)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Method>> {
        self.methods.get(&name.trim().to_lowercase()).cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Method>> {
        self.methods.values()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.methods.values().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::with_builtin_methods()
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.names())
            .finish()
    }
}
