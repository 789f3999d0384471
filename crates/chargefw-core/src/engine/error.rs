use thiserror::Error;

use crate::core::methods::ChargeError;
use crate::core::methods::params::ParameterError;
use crate::core::models::molecule::MoleculeError;
use crate::core::topology::registry::TemplateLoadError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown charge method '{0}'")]
    UnknownMethod(String),

    #[error("Residue template data unavailable: {source}")]
    Templates {
        #[from]
        source: TemplateLoadError,
    },

    #[error("Invalid parameter set: {source}")]
    Parameters {
        #[from]
        source: ParameterError,
    },

    #[error("Charge calculation failed: {source}")]
    Charges {
        #[from]
        source: ChargeError,
    },

    #[error("Invalid molecule: {source}")]
    Molecule {
        #[from]
        source: MoleculeError,
    },
}

impl EngineError {
    /// Whether the error stems from setup rather than from the molecule being processed.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownMethod(_)
                | Self::Parameters { .. }
                | Self::Charges {
                    source: ChargeError::Parameters(_)
                }
        )
    }
}
