use super::params::{ParameterRequirements, ParameterSet};
use super::{ChargeError, Method, NumericErrorKind};
use crate::core::models::molecule::Molecule;
use crate::core::utils::identifiers::is_hydrogen;
use tracing::{trace, warn};

const HYDROGEN_CATION: &str = "Hplus";
const ELECTRONEGATIVITY: &str = "A";
const HARDNESS: &str = "B";
const DAMPING: &str = "f";

const ITERATIONS: usize = 7;

/// Modified Partial Equalization of Orbital Electronegativity.
///
/// Starting from the formal charges, every iteration moves charge along each bond from the
/// less electronegative atom to the more electronegative one. The amount is scaled by the
/// bond's damping factor `f` and divided by the donor's cation electronegativity (`Hplus` for
/// hydrogen, `A + B` otherwise). All transfers of one iteration use the same electronegativity
/// snapshot, so the result does not depend on bond order within the molecule.
#[derive(Debug, Clone)]
pub struct Mpeoe {
    requirements: ParameterRequirements,
}

impl Mpeoe {
    pub fn new() -> Self {
        Self {
            requirements: ParameterRequirements::new(
                &[HYDROGEN_CATION],
                &[ELECTRONEGATIVITY, HARDNESS],
                &[DAMPING],
            ),
        }
    }
}

impl Default for Mpeoe {
    fn default() -> Self {
        Self::new()
    }
}

impl Method for Mpeoe {
    fn name(&self) -> &'static str {
        "MPEOE"
    }

    fn required_parameters(&self) -> &ParameterRequirements {
        &self.requirements
    }

    fn calculate_charges(
        &self,
        molecule: &Molecule,
        parameters: &ParameterSet,
    ) -> Result<Vec<f64>, ChargeError> {
        let atoms = molecule.atoms();
        let hplus = parameters.common(HYDROGEN_CATION)?;

        let mut a = Vec::with_capacity(atoms.len());
        let mut b = Vec::with_capacity(atoms.len());
        let mut cation = Vec::with_capacity(atoms.len());
        for atom in atoms {
            let a_i = parameters.atom(molecule, atom, ELECTRONEGATIVITY)?;
            let b_i = parameters.atom(molecule, atom, HARDNESS)?;
            a.push(a_i);
            b.push(b_i);
            cation.push(if is_hydrogen(&atom.element) {
                hplus
            } else {
                a_i + b_i
            });
        }

        let damping = molecule
            .bonds()
            .iter()
            .map(|bond| parameters.bond(molecule, bond, DAMPING))
            .collect::<Result<Vec<_>, _>>()?;

        if !molecule.has_bonds() && molecule.len() > 1 {
            warn!(
                molecule = molecule.name(),
                "Molecule has no bonds; MPEOE charges equal the formal charges."
            );
        }

        let mut charges: Vec<f64> = atoms.iter().map(|a| a.formal_charge as f64).collect();
        let mut delta = vec![0.0; charges.len()];

        for iteration in 0..ITERATIONS {
            let chi: Vec<f64> = charges
                .iter()
                .enumerate()
                .map(|(i, q)| a[i] + b[i] * q)
                .collect();
            delta.iter_mut().for_each(|d| *d = 0.0);

            for (bond, &f) in molecule.bonds().iter().zip(&damping) {
                let (donor, acceptor) = if chi[bond.atom1] <= chi[bond.atom2] {
                    (bond.atom1, bond.atom2)
                } else {
                    (bond.atom2, bond.atom1)
                };
                let gap = chi[acceptor] - chi[donor];
                if gap == 0.0 {
                    continue;
                }
                if cation[donor] == 0.0 {
                    return Err(ChargeError::numeric(
                        molecule,
                        NumericErrorKind::ZeroCationElectronegativity { atom: donor },
                    ));
                }
                let transfer = f * gap / cation[donor];
                delta[donor] += transfer;
                delta[acceptor] -= transfer;
            }

            for (q, d) in charges.iter_mut().zip(&delta) {
                *q += d;
            }
            trace!(molecule = molecule.name(), iteration, "MPEOE iteration done.");
        }

        if charges.iter().any(|q| !q.is_finite()) {
            return Err(ChargeError::numeric(
                molecule,
                NumericErrorKind::NonFiniteCharges,
            ));
        }

        Ok(charges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::topology::{Bond, BondOrder};
    use nalgebra::Point3;

    const TOLERANCE: f64 = 1e-9;

    fn atom(index: usize, element: &str, x: f64) -> Atom {
        Atom::new(index, element, "MOL", 1, Point3::new(x, 0.0, 0.0)).with_element(element)
    }

    fn water() -> Molecule {
        Molecule::with_bonds(
            "water",
            vec![atom(0, "O", 0.0), atom(1, "H", 0.96), atom(2, "H", -0.96)],
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(0, 2, BondOrder::Single),
            ],
        )
        .unwrap()
    }

    fn water_parameters(hplus: f64) -> ParameterSet {
        ParameterSet::new("MPEOE")
            .with_common(HYDROGEN_CATION, hplus)
            .with_atom("O", ELECTRONEGATIVITY, 3.0)
            .with_atom("O", HARDNESS, 1.5)
            .with_atom("H", ELECTRONEGATIVITY, 2.0)
            .with_atom("H", HARDNESS, 1.0)
            .with_bond("H-O-1", DAMPING, 0.3)
    }

    #[test]
    fn charge_flows_towards_the_more_electronegative_atom() {
        let molecule = Molecule::with_bonds(
            "co",
            vec![atom(0, "C", 0.0), atom(1, "O", 1.4)],
            vec![Bond::new(0, 1, BondOrder::Single)],
        )
        .unwrap();
        let set = ParameterSet::new("MPEOE")
            .with_common(HYDROGEN_CATION, 20.0)
            .with_atom("C", ELECTRONEGATIVITY, 2.0)
            .with_atom("C", HARDNESS, 1.0)
            .with_atom("O", ELECTRONEGATIVITY, 3.0)
            .with_atom("O", HARDNESS, 1.5)
            .with_bond("C-O-1", DAMPING, 0.2);

        let charges = Mpeoe::new().calculate_charges(&molecule, &set).unwrap();

        assert!((charges[0] - 0.288_367_341_1).abs() < 1e-8);
        assert!((charges[0] + charges[1]).abs() < TOLERANCE);
    }

    #[test]
    fn water_charges_are_neutral_and_symmetric() {
        let charges = Mpeoe::new()
            .calculate_charges(&water(), &water_parameters(10.0))
            .unwrap();

        assert!(charges.iter().sum::<f64>().abs() < TOLERANCE);
        assert!((charges[0] + 0.295_662_201_8).abs() < 1e-8);
        assert!((charges[1] - charges[2]).abs() < TOLERANCE);
    }

    #[test]
    fn hydrogen_donors_use_the_common_cation_parameter() {
        let soft = Mpeoe::new()
            .calculate_charges(&water(), &water_parameters(5.0))
            .unwrap();
        let hard = Mpeoe::new()
            .calculate_charges(&water(), &water_parameters(10.0))
            .unwrap();
        assert!(soft[1] > hard[1]);
    }

    #[test]
    fn molecule_without_bonds_keeps_formal_charges() {
        let molecule = Molecule::new(
            "ions",
            vec![
                atom(0, "O", 0.0).with_formal_charge(-1),
                atom(1, "H", 3.0).with_formal_charge(1),
            ],
        )
        .unwrap();
        let charges = Mpeoe::new()
            .calculate_charges(&molecule, &water_parameters(10.0))
            .unwrap();
        assert_eq!(charges, vec![-1.0, 1.0]);
    }

    #[test]
    fn zero_cation_electronegativity_is_a_numeric_failure() {
        let result = Mpeoe::new().calculate_charges(&water(), &water_parameters(0.0));
        assert_eq!(
            result,
            Err(ChargeError::Numeric {
                molecule: "water".to_string(),
                kind: NumericErrorKind::ZeroCationElectronegativity { atom: 1 },
            })
        );
    }

    #[test]
    fn equalized_bond_needs_no_cation_electronegativity() {
        let molecule = Molecule::with_bonds(
            "dihydrogen",
            vec![atom(0, "H", 0.0), atom(1, "H", 0.74)],
            vec![Bond::new(0, 1, BondOrder::Single)],
        )
        .unwrap();
        let set = water_parameters(0.0).with_bond("H-H-1", DAMPING, 0.3);

        let charges = Mpeoe::new().calculate_charges(&molecule, &set).unwrap();

        assert_eq!(charges, vec![0.0, 0.0]);
    }

    #[test]
    fn uncovered_bond_type_is_a_parameter_error() {
        let set = water_parameters(10.0).with_bond("H-O-1", "g", 1.0);
        let molecule = Molecule::with_bonds(
            "peroxide-ish",
            vec![atom(0, "O", 0.0), atom(1, "O", 1.4)],
            vec![Bond::new(0, 1, BondOrder::Single)],
        )
        .unwrap();
        let result = Mpeoe::new().calculate_charges(&molecule, &set);
        assert!(matches!(result, Err(ChargeError::Parameters(_))));
    }
}
