//! Configuration for the qlab CLI.
//!
//! Values are resolved in this order (highest first):
//! 1. Command-line flags
//! 2. Environment variables (`QLAB_SHOTS`, `QLAB_SEED`, `QLAB_MAX_QUBITS`,
//!    `QLAB_DIGITS`)
//! 3. The YAML configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use qlab_sim::SimulatorConfig;

/// Largest qubit ceiling accepted from configuration.
pub const MAX_QUBIT_CEILING: u32 = qlab_sim::MAX_QUBITS;

/// Complete CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QlabConfig {
    /// Shot and simulator settings
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// Adder sizing
    #[serde(default)]
    pub adder: AdderConfig,

    /// Where exported programs are written
    #[serde(default)]
    pub export: ExportConfig,
}

/// Shot and simulator settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Shots per sampled run
    #[serde(default = "default_shots")]
    pub shots: u32,

    /// Seed for reproducible sampling; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Qubit ceiling for statevector allocation
    #[serde(default = "default_max_qubits")]
    pub max_qubits: u32,

    /// Re-check normalization after every instruction
    #[serde(default)]
    pub check_each_step: bool,
}

/// Adder sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdderConfig {
    /// Operand width in digits
    #[serde(default = "default_digits")]
    pub digits: u32,
}

/// Export settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory for exported program JSON; stdout when absent
    #[serde(default)]
    pub destination: Option<PathBuf>,
}

fn default_shots() -> u32 {
    1024
}

fn default_max_qubits() -> u32 {
    24
}

fn default_digits() -> u32 {
    2
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            shots: default_shots(),
            seed: None,
            max_qubits: default_max_qubits(),
            check_each_step: false,
        }
    }
}

impl Default for AdderConfig {
    fn default() -> Self {
        Self {
            digits: default_digits(),
        }
    }
}

impl QlabConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate configuration from YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: QlabConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file, then apply environment overrides.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from variables that `lookup` finds.
    pub fn merge_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("QLAB_SHOTS") {
            self.simulation.shots = parse_env("QLAB_SHOTS", &v)?;
        }
        if let Some(v) = lookup("QLAB_SEED") {
            self.simulation.seed = Some(parse_env("QLAB_SEED", &v)?);
        }
        if let Some(v) = lookup("QLAB_MAX_QUBITS") {
            self.simulation.max_qubits = parse_env("QLAB_MAX_QUBITS", &v)?;
        }
        if let Some(v) = lookup("QLAB_DIGITS") {
            self.adder.digits = parse_env("QLAB_DIGITS", &v)?;
        }
        Ok(self)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.shots == 0 {
            return Err(ConfigError::ValidationError(
                "shots must be greater than 0".to_string(),
            ));
        }
        if self.adder.digits == 0 {
            return Err(ConfigError::ValidationError(
                "adder digits must be at least 1".to_string(),
            ));
        }
        if self.simulation.max_qubits == 0 || self.simulation.max_qubits > MAX_QUBIT_CEILING {
            return Err(ConfigError::ValidationError(format!(
                "max_qubits must be between 1 and {MAX_QUBIT_CEILING}, got {}",
                self.simulation.max_qubits
            )));
        }
        Ok(())
    }

    /// Simulator settings derived from this configuration.
    pub fn simulator_config(&self) -> SimulatorConfig {
        SimulatorConfig {
            max_qubits: self.simulation.max_qubits,
            check_each_step: self.simulation.check_each_step,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::ParseError(format!("{key}={value} is not a valid number")))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}
