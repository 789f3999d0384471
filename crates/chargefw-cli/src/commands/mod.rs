pub mod charges;
pub mod info;
pub mod methods;

use crate::error::{EXIT_PARTIAL_FAILURE, EXIT_SUCCESS};

/// How a command that completed without a fatal error went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    PartialFailure { failed: usize, total: usize },
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Success => EXIT_SUCCESS,
            Self::PartialFailure { .. } => EXIT_PARTIAL_FAILURE,
        }
    }
}
