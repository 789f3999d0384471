use crate::core::methods::Method;
use crate::core::models::molecule::Molecule;
use crate::core::topology::inference::infer_bonds;
use crate::core::topology::registry::ResidueTemplateStore;
use crate::engine::config::{BondInference, CalculationConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The charges computed for one molecule.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeCharges {
    /// The molecule as used for the calculation, including any inferred bonds.
    pub molecule: Molecule,
    /// One charge per atom, index-aligned with `molecule.atoms()`.
    pub charges: Vec<f64>,
    pub bonds_inferred: bool,
}

pub type MoleculeResult = Result<MoleculeCharges, EngineError>;

/// Computes partial charges for a batch of molecules.
///
/// The method is resolved and the parameter set validated before any molecule is processed;
/// failures at that stage are returned as `Err`. Afterwards each molecule is handled
/// independently and its outcome reported in the returned vector, in input order.
///
/// # Errors
///
/// Returns [`EngineError`] if the method is unknown, the parameter set does not fit the
/// method, or the residue templates needed for bond inference cannot be loaded.
#[instrument(skip_all, name = "charges_workflow", fields(method = %config.method, molecules = molecules.len()))]
pub fn run(
    molecules: Vec<Molecule>,
    config: &CalculationConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<MoleculeResult>, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });

    let method = config
        .registry
        .get(&config.method)
        .ok_or_else(|| EngineError::UnknownMethod(config.method.clone()))?;
    config
        .parameters
        .validate(method.name(), method.required_parameters())?;

    let custom_store;
    let store = match &config.templates_dir {
        Some(dir) => {
            custom_store = ResidueTemplateStore::from_dir(dir);
            &custom_store
        }
        None => ResidueTemplateStore::bundled(),
    };

    if molecules
        .iter()
        .any(|m| needs_inference(m, method.as_ref(), config.bond_inference))
    {
        store.preload_base()?;
    }

    info!(
        method = method.name(),
        parameters = config.parameters.name().unwrap_or("unnamed"),
        "Resolved charge method."
    );
    reporter.report(Progress::PhaseFinish);

    reporter.report(Progress::PhaseStart {
        name: "Charge Calculation",
    });
    reporter.report(Progress::TaskStart {
        total: molecules.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = molecules.into_iter();

    #[cfg(feature = "parallel")]
    let iterator = molecules.into_par_iter();

    let results: Vec<MoleculeResult> = iterator
        .map(|molecule| {
            let name = molecule.name().to_string();
            let result = process_molecule(molecule, method.as_ref(), config, store);
            if let Err(e) = &result {
                warn!(molecule = %name, error = %e, "Charge calculation failed.");
                reporter.report(Progress::MoleculeFailed {
                    molecule: name,
                    reason: e.to_string(),
                });
            }
            reporter.report(Progress::TaskIncrement);
            result
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        succeeded = results.len() - failed,
        failed, "Charge calculation finished."
    );
    Ok(results)
}

fn needs_inference(molecule: &Molecule, method: &dyn Method, policy: BondInference) -> bool {
    match policy {
        BondInference::Never => false,
        BondInference::Always => true,
        BondInference::Auto => method.uses_bonds() && !molecule.has_bonds(),
    }
}

fn process_molecule(
    mut molecule: Molecule,
    method: &dyn Method,
    config: &CalculationConfig,
    store: &ResidueTemplateStore,
) -> MoleculeResult {
    let bonds_inferred = needs_inference(&molecule, method, config.bond_inference);
    if bonds_inferred {
        let bonds = infer_bonds(molecule.atoms(), store)?;
        debug!(
            molecule = molecule.name(),
            bonds = bonds.len(),
            "Inferred bonds from residue templates."
        );
        molecule.set_bonds(bonds)?;
    }

    config
        .parameters
        .check_coverage(&molecule, method.required_parameters())?;
    let charges = method.calculate_charges(&molecule, &config.parameters)?;

    Ok(MoleculeCharges {
        molecule,
        charges,
        bonds_inferred,
    })
}
