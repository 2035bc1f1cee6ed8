use crate::core::assembly::mask::WeightingMode;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Which model instances take part in a prediction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum NetworkSelection {
    /// Ensemble every available instance.
    #[default]
    All,
    /// Run the single instance with this name.
    Named(String),
}

/// Per-window rescaling applied before a window is weighted and accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowNormalization {
    /// Zero mean and unit variance over the trimmed window region.
    #[default]
    Standardize,
    /// Accumulate raw model outputs.
    Disabled,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssemblyConfig {
    pub window_size: usize,
    pub num_offsets: usize, // Distinct (start_i, start_j) offset pairs per pass
    pub batch_size: usize,  // Maximum windows per model call
    pub weighting: WeightingMode,
    pub normalization: WindowNormalization,
    pub networks: NetworkSelection,
    pub seed: Option<u64>,
}

impl AssemblyConfig {
    /// Random source for offset sampling: seeded when a seed is configured, otherwise
    /// drawn from system entropy.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[derive(Default)]
pub struct AssemblyConfigBuilder {
    window_size: Option<usize>,
    num_offsets: Option<usize>,
    batch_size: Option<usize>,
    weighting: Option<WeightingMode>,
    normalization: Option<WindowNormalization>,
    networks: Option<NetworkSelection>,
    seed: Option<u64>,
}

impl AssemblyConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window_size(mut self, size: usize) -> Self {
        self.window_size = Some(size);
        self
    }
    pub fn num_offsets(mut self, n: usize) -> Self {
        self.num_offsets = Some(n);
        self
    }
    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = Some(n);
        self
    }
    pub fn weighting(mut self, mode: WeightingMode) -> Self {
        self.weighting = Some(mode);
        self
    }
    pub fn normalization(mut self, normalization: WindowNormalization) -> Self {
        self.normalization = Some(normalization);
        self
    }
    pub fn networks(mut self, selection: NetworkSelection) -> Self {
        self.networks = Some(selection);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<AssemblyConfig, ConfigError> {
        let config = AssemblyConfig {
            window_size: self
                .window_size
                .ok_or(ConfigError::MissingParameter("window_size"))?,
            num_offsets: self
                .num_offsets
                .ok_or(ConfigError::MissingParameter("num_offsets"))?,
            batch_size: self
                .batch_size
                .ok_or(ConfigError::MissingParameter("batch_size"))?,
            weighting: self
                .weighting
                .ok_or(ConfigError::MissingParameter("weighting"))?,
            normalization: self.normalization.unwrap_or_default(),
            networks: self.networks.unwrap_or_default(),
            seed: self.seed,
        };
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &AssemblyConfig) -> Result<(), ConfigError> {
    if config.window_size < 2 || config.window_size % 2 != 0 {
        return Err(ConfigError::InvalidParameter {
            name: "window_size",
            reason: format!("must be a positive even number, got {}", config.window_size),
        });
    }
    if config.num_offsets == 0 {
        return Err(ConfigError::InvalidParameter {
            name: "num_offsets",
            reason: "at least one offset pair is required".to_string(),
        });
    }
    if config.batch_size == 0 {
        return Err(ConfigError::InvalidParameter {
            name: "batch_size",
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

impl fmt::Display for NetworkSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkSelection::All => f.write_str("all"),
            NetworkSelection::Named(name) => f.write_str(name),
        }
    }
}

impl FromStr for NetworkSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "networks",
                reason: "network name cannot be empty".to_string(),
            });
        }
        if name.eq_ignore_ascii_case("all") {
            Ok(NetworkSelection::All)
        } else {
            Ok(NetworkSelection::Named(name.to_string()))
        }
    }
}

impl TryFrom<String> for NetworkSelection {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for WindowNormalization {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standardize" => Ok(WindowNormalization::Standardize),
            "disabled" | "none" => Ok(WindowNormalization::Disabled),
            other => Err(ConfigError::InvalidParameter {
                name: "normalization",
                reason: format!("expected 'standardize' or 'disabled', got '{other}'"),
            }),
        }
    }
}
