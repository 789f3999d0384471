use crate::cli::ChargesArgs;
use crate::error::{CliError, Result};
use chargefw::core::io::charges::OutputFormat;
use chargefw::core::methods::MethodRegistry;
use chargefw::core::methods::params::ParameterSet;
use chargefw::engine::config::{BondInference, CalculationConfig, CalculationConfigBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Defaults for the `charges` command read from a TOML file.
///
/// Relative paths are resolved against the directory containing the file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub method: Option<String>,
    pub parameters: Option<PathBuf>,
    pub templates_dir: Option<PathBuf>,
    pub format: Option<String>,
    pub bonds: Option<String>,
}

/// The fully resolved setup of one `charges` invocation.
#[derive(Debug)]
pub struct AppConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub core_config: CalculationConfig,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.parameters = config.parameters.map(|p| base.join(p));
        config.templates_dir = config.templates_dir.map(|p| base.join(p));
        Ok(config)
    }

    /// Combines the file values with command-line arguments, which take precedence.
    pub fn merge_with_cli(self, args: &ChargesArgs) -> Result<AppConfig> {
        let registry = MethodRegistry::default();

        let method = args
            .method
            .clone()
            .or(self.method)
            .ok_or_else(|| CliError::Config("no charge method given (use --method)".into()))?;
        let resolved = registry.get(&method).ok_or_else(|| {
            CliError::Config(format!(
                "unknown charge method '{}' (available: {})",
                method,
                registry.names().join(", ")
            ))
        })?;

        let parameters = match args.parameters.clone().or(self.parameters) {
            Some(path) => ParameterSet::load(&path)?,
            None if resolved.required_parameters().is_empty() => {
                ParameterSet::new(resolved.name())
            }
            None => {
                return Err(CliError::Config(format!(
                    "method '{}' requires a parameter set (use --parameters)",
                    resolved.name()
                )));
            }
        };

        let format = match (args.format, self.format) {
            (Some(arg), _) => arg.into(),
            (None, Some(value)) => value.parse().map_err(CliError::Config)?,
            (None, None) => OutputFormat::default(),
        };

        let bond_inference = match (args.bonds, self.bonds) {
            (Some(arg), _) => arg.into(),
            (None, Some(value)) => value.parse().map_err(CliError::Config)?,
            (None, None) => BondInference::default(),
        };

        let mut builder = CalculationConfigBuilder::new()
            .method(&method)
            .parameters(parameters)
            .bond_inference(bond_inference)
            .registry(registry);
        if let Some(dir) = args.templates_dir.clone().or(self.templates_dir) {
            builder = builder.templates_dir(dir);
        }
        let core_config = builder
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(AppConfig {
            inputs: args.input.clone(),
            output: args.output.clone(),
            format,
            core_config,
        })
    }
}

/// Builds the configuration for a `charges` invocation from its arguments and optional file.
pub fn build_config(args: &ChargesArgs) -> Result<AppConfig> {
    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    file_config.merge_with_cli(args)
}
