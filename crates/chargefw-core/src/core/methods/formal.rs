use super::params::{ParameterRequirements, ParameterSet};
use super::{ChargeError, Method};
use crate::core::models::molecule::Molecule;

/// Assigns every atom its formal charge. Reads no parameters.
#[derive(Debug, Clone, Default)]
pub struct Formal {
    requirements: ParameterRequirements,
}

impl Formal {
    pub fn new() -> Self {
        Self {
            requirements: ParameterRequirements::none(),
        }
    }
}

impl Method for Formal {
    fn name(&self) -> &'static str {
        "Formal"
    }

    fn required_parameters(&self) -> &ParameterRequirements {
        &self.requirements
    }

    fn calculate_charges(
        &self,
        molecule: &Molecule,
        _parameters: &ParameterSet,
    ) -> Result<Vec<f64>, ChargeError> {
        Ok(molecule
            .atoms()
            .iter()
            .map(|atom| atom.formal_charge as f64)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    #[test]
    fn charges_equal_formal_charges() {
        let molecule = Molecule::new(
            "salt",
            vec![
                Atom::new(0, "NA", "NA", 1, Point3::origin())
                    .with_element("NA")
                    .with_formal_charge(1),
                Atom::new(1, "CL", "CL", 2, Point3::new(2.8, 0.0, 0.0))
                    .with_element("CL")
                    .with_formal_charge(-1),
            ],
        )
        .unwrap();

        let charges = Formal::new()
            .calculate_charges(&molecule, &ParameterSet::new("Formal"))
            .unwrap();

        assert_eq!(charges, vec![1.0, -1.0]);
        assert!(Formal::new().required_parameters().is_empty());
    }
}
