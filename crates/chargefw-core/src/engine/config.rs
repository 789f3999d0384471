use crate::core::methods::MethodRegistry;
use crate::core::methods::params::ParameterSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// When bonds are inferred from residue templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BondInference {
    /// Infer bonds for molecules without any, if the method reads bonds.
    #[default]
    Auto,
    /// Always replace the bonds with inferred ones.
    Always,
    /// Use the bonds as given.
    Never,
}

impl FromStr for BondInference {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err(format!("Unknown bond inference policy '{}'", s)),
        }
    }
}

impl fmt::Display for BondInference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CalculationConfig {
    pub method: String,
    pub parameters: ParameterSet,
    pub bond_inference: BondInference,
    /// Directory holding `amino_acids.txt` and `other_residues.txt`; the bundled data otherwise.
    pub templates_dir: Option<PathBuf>,
    pub registry: MethodRegistry,
}

#[derive(Default)]
pub struct CalculationConfigBuilder {
    method: Option<String>,
    parameters: Option<ParameterSet>,
    bond_inference: Option<BondInference>,
    templates_dir: Option<PathBuf>,
    registry: Option<MethodRegistry>,
}

impl CalculationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, name: &str) -> Self {
        self.method = Some(name.to_string());
        self
    }
    pub fn parameters(mut self, parameters: ParameterSet) -> Self {
        self.parameters = Some(parameters);
        self
    }
    pub fn bond_inference(mut self, policy: BondInference) -> Self {
        self.bond_inference = Some(policy);
        self
    }
    pub fn templates_dir(mut self, dir: PathBuf) -> Self {
        self.templates_dir = Some(dir);
        self
    }
    pub fn registry(mut self, registry: MethodRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> Result<CalculationConfig, ConfigError> {
        Ok(CalculationConfig {
            method: self.method.ok_or(ConfigError::MissingParameter("method"))?,
            parameters: self
                .parameters
                .ok_or(ConfigError::MissingParameter("parameters"))?,
            bond_inference: self.bond_inference.unwrap_or_default(),
            templates_dir: self.templates_dir,
            registry: self.registry.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_fails_if_method_is_missing() {
        let result = CalculationConfigBuilder::new()
            .parameters(ParameterSet::new("EEM"))
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::MissingParameter("method"));
    }

    #[test]
    fn builder_fails_if_parameters_are_missing() {
        let result = CalculationConfigBuilder::new().method("EEM").build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingParameter("parameters")
        );
    }

    #[test]
    fn builder_applies_defaults() {
        let config = CalculationConfigBuilder::new()
            .method("EEM")
            .parameters(ParameterSet::new("EEM"))
            .build()
            .unwrap();
        assert_eq!(config.bond_inference, BondInference::Auto);
        assert!(config.templates_dir.is_none());
        assert_eq!(config.registry.len(), 3);
    }

    #[test]
    fn builder_keeps_explicit_values() {
        let config = CalculationConfigBuilder::new()
            .method("MPEOE")
            .parameters(ParameterSet::new("MPEOE"))
            .bond_inference(BondInference::Never)
            .templates_dir(PathBuf::from("/data/templates"))
            .registry(MethodRegistry::empty())
            .build()
            .unwrap();
        assert_eq!(config.method, "MPEOE");
        assert_eq!(config.bond_inference, BondInference::Never);
        assert_eq!(config.templates_dir, Some(PathBuf::from("/data/templates")));
        assert!(config.registry.is_empty());
    }

    #[test]
    fn bond_inference_parses_and_displays() {
        assert_eq!("ALWAYS".parse::<BondInference>(), Ok(BondInference::Always));
        assert_eq!("never".parse::<BondInference>(), Ok(BondInference::Never));
        assert!("sometimes".parse::<BondInference>().is_err());
        assert_eq!(BondInference::Auto.to_string(), "auto");
    }
}
