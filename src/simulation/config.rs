/*!
 * Simulation Configuration
 *
 * Defaults come from `core::limits`, can be loaded from a JSON file and are
 * finally overridden by `PARTITION_SIM_*` environment variables.
 */

use crate::core::limits::{
    DEFAULT_CONDENSE_FREE_PARTITIONS, DEFAULT_MAX_ITERATIONS, DEFAULT_MEMORY_SIZE,
    ENV_MEMORY_SIZE, ENV_PLACEMENT, ENV_SCHEDULING,
};
use crate::core::types::{Iteration, Size};
use crate::memory::PlacementPolicy;
use crate::process::{ProcessSpec, SchedulingPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimulationConfig {
    pub memory_size: Size,
    pub placement: PlacementPolicy,
    pub scheduling: SchedulingPolicy,
    pub condense_free_partitions: bool,
    pub max_iterations: Iteration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            placement: PlacementPolicy::default(),
            scheduling: SchedulingPolicy::default(),
            condense_free_partitions: DEFAULT_CONDENSE_FREE_PARTITIONS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SimulationConfig {
    pub fn new(memory_size: Size) -> Self {
        Self {
            memory_size,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_placement(mut self, placement: PlacementPolicy) -> Self {
        self.placement = placement;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_scheduling(mut self, scheduling: SchedulingPolicy) -> Self {
        self.scheduling = scheduling;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_condensation(mut self, enabled: bool) -> Self {
        self.condense_free_partitions = enabled;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: Iteration) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!(path = %path.display(), "Loaded simulation configuration");
        Ok(config)
    }

    /// Apply `PARTITION_SIM_*` variables from the process environment
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    pub fn apply_overrides<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_MEMORY_SIZE) {
            self.memory_size = raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_MEMORY_SIZE, raw
                ))
            })?;
        }
        if let Some(raw) = lookup(ENV_PLACEMENT) {
            self.placement = raw.trim().parse().map_err(ConfigError::Invalid)?;
        }
        if let Some(raw) = lookup(ENV_SCHEDULING) {
            self.scheduling = raw.trim().parse().map_err(ConfigError::Invalid)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.memory_size == 0 {
            return Err(ConfigError::Invalid("memory_size must be greater than zero".into()));
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::Invalid("max_iterations must be greater than zero".into()));
        }
        Ok(())
    }
}

/// Read a batch of admission requests: a JSON array of `{name, time, size}`
pub fn load_processes(path: impl AsRef<Path>) -> ConfigResult<Vec<ProcessSpec>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let specs: Vec<ProcessSpec> = serde_json::from_str(&json)?;
    info!(path = %path.display(), count = specs.len(), "Loaded process batch");
    Ok(specs)
}
