use chargefw::core::io::charges::ChargeWriteError;
use chargefw::core::methods::params::ParameterLoadError;
use chargefw::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_PARTIAL_FAILURE: u8 = 1;
pub const EXIT_CONFIG: u8 = 3;
pub const EXIT_FILE: u8 = 4;
pub const EXIT_INTERNAL: u8 = 5;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Parameters(#[from] ParameterLoadError),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to write charges to '{path}': {source}", path = path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: ChargeWriteError,
    },

    #[error("Failed to open log file '{path}': {source}", path = path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// The process exit status this error maps to.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Engine(EngineError::Templates { .. }) => EXIT_INTERNAL,
            Self::Engine(e) if e.is_configuration_error() => EXIT_CONFIG,
            Self::Engine(_) => EXIT_INTERNAL,
            Self::Config(_) | Self::Parameters(ParameterLoadError::Toml { .. }) => EXIT_CONFIG,
            Self::Parameters(ParameterLoadError::Io { .. }) => EXIT_FILE,
            Self::FileParsing { .. } | Self::Output { .. } | Self::LogFile { .. } | Self::Io(_) => {
                EXIT_FILE
            }
            Self::Other(_) => EXIT_INTERNAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chargefw::core::methods::params::ParameterError;
    use chargefw::core::topology::registry::TemplateLoadError;

    #[test]
    fn engine_errors_map_to_config_or_internal() {
        let unknown = CliError::from(EngineError::UnknownMethod("qeq".into()));
        assert_eq!(unknown.exit_code(), EXIT_CONFIG);

        let parameters = CliError::from(EngineError::from(ParameterError::MissingCommon {
            name: "kappa".into(),
        }));
        assert_eq!(parameters.exit_code(), EXIT_CONFIG);

        let templates = CliError::from(EngineError::from(TemplateLoadError::Parse {
            origin: "amino_acids.txt".into(),
            line: 3,
            reason: "bad order".into(),
        }));
        assert_eq!(templates.exit_code(), EXIT_INTERNAL);
    }

    #[test]
    fn file_errors_map_to_file_status() {
        let io = CliError::from(std::io::Error::other("disk full"));
        assert_eq!(io.exit_code(), EXIT_FILE);

        let parameters = CliError::from(ParameterLoadError::Io {
            path: "eem.toml".into(),
            source: std::io::Error::other("missing"),
        });
        assert_eq!(parameters.exit_code(), EXIT_FILE);
        assert_eq!(CliError::Config("no method".into()).exit_code(), EXIT_CONFIG);
    }
}
