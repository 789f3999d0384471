use super::params::{ParameterRequirements, ParameterSet};
use super::{ChargeError, Method, NumericErrorKind};
use crate::core::models::molecule::Molecule;
use crate::core::utils::geometry::{COINCIDENCE_TOLERANCE, distance};
use nalgebra::{DMatrix, DVector};
use tracing::trace;

const KAPPA: &str = "kappa";
const ELECTRONEGATIVITY: &str = "A";
const HARDNESS: &str = "B";

/// Electronegativity Equalization Method.
///
/// Solves the `(n + 1) x (n + 1)` system
///
/// ```text
/// B_i q_i + sum_{j != i} kappa / R_ij q_j - chi = -A_i     for each atom i
/// sum_i q_i                                     = Q
/// ```
///
/// where `Q` is the molecule's total formal charge and `chi` the equalized electronegativity.
#[derive(Debug, Clone)]
pub struct Eem {
    requirements: ParameterRequirements,
}

impl Eem {
    pub fn new() -> Self {
        Self {
            requirements: ParameterRequirements::new(
                &[KAPPA],
                &[ELECTRONEGATIVITY, HARDNESS],
                &[],
            ),
        }
    }
}

impl Default for Eem {
    fn default() -> Self {
        Self::new()
    }
}

impl Method for Eem {
    fn name(&self) -> &'static str {
        "EEM"
    }

    fn required_parameters(&self) -> &ParameterRequirements {
        &self.requirements
    }

    fn calculate_charges(
        &self,
        molecule: &Molecule,
        parameters: &ParameterSet,
    ) -> Result<Vec<f64>, ChargeError> {
        let n = molecule.len();
        if n == 0 {
            return Ok(Vec::new());
        }

        let kappa = parameters.common(KAPPA)?;
        let atoms = molecule.atoms();

        let m = n + 1;
        let mut matrix = DMatrix::<f64>::zeros(m, m);
        let mut rhs = DVector::<f64>::zeros(m);

        for (i, atom) in atoms.iter().enumerate() {
            matrix[(i, i)] = parameters.atom(molecule, atom, HARDNESS)?;
            rhs[i] = -parameters.atom(molecule, atom, ELECTRONEGATIVITY)?;

            for (j, other) in atoms.iter().enumerate().skip(i + 1) {
                let d = distance(&atom.position, &other.position);
                if d < COINCIDENCE_TOLERANCE {
                    return Err(ChargeError::numeric(
                        molecule,
                        NumericErrorKind::CoincidentAtoms { atom1: i, atom2: j },
                    ));
                }
                let coupling = kappa / d;
                matrix[(i, j)] = coupling;
                matrix[(j, i)] = coupling;
            }

            matrix[(i, n)] = 1.0;
            matrix[(n, i)] = 1.0;
        }
        rhs[n] = molecule.total_charge();

        trace!(molecule = molecule.name(), size = m, "Solving EEM system.");

        let singular = || ChargeError::numeric(molecule, NumericErrorKind::SingularSystem);

        // Pivots at rounding-noise level mean the system is singular in exact arithmetic.
        let pivot_floor = f64::EPSILON * m as f64 * matrix.amax();
        let lu = matrix.lu();
        let smallest_pivot = lu
            .u()
            .diagonal()
            .iter()
            .fold(f64::INFINITY, |acc, pivot| acc.min(pivot.abs()));
        if smallest_pivot <= pivot_floor {
            trace!(
                molecule = molecule.name(),
                smallest_pivot, pivot_floor, "Rejecting near-singular EEM system."
            );
            return Err(singular());
        }

        let solution = lu.solve(&rhs).ok_or_else(singular)?;

        if solution.iter().any(|q| !q.is_finite()) {
            return Err(ChargeError::numeric(
                molecule,
                NumericErrorKind::NonFiniteCharges,
            ));
        }

        Ok(solution.iter().take(n).copied().collect())
    }
}
