//! Pool layout configuration

use super::{Config, ConfigError};
use serde::{Deserialize, Serialize};

/// Warm-up count used when a pool entry does not specify one
pub const DEFAULT_INITIAL_POOL_SIZE: usize = 10;

fn default_initial_size() -> usize {
    DEFAULT_INITIAL_POOL_SIZE
}

/// One pool: which template it serves and how many instances to pre-create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Template name, resolved through the template library
    pub template: String,
    /// Instances created eagerly when the pool is built
    #[serde(default = "default_initial_size")]
    pub initial_size: usize,
}

impl PoolConfig {
    /// Create a pool entry
    pub fn new(template: impl Into<String>, initial_size: usize) -> Self {
        Self {
            template: template.into(),
            initial_size,
        }
    }

    /// Create a pool entry with the default warm-up count
    pub fn with_default_size(template: impl Into<String>) -> Self {
        Self::new(template, DEFAULT_INITIAL_POOL_SIZE)
    }
}

/// The fixed set of pools a registry is built from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRegistryConfig {
    /// Pool entries, registered in order
    #[serde(default)]
    pub pools: Vec<PoolConfig>,
}

impl PoolRegistryConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: append a pool entry
    pub fn with_pool(mut self, pool: PoolConfig) -> Self {
        self.pools.push(pool);
        self
    }
}

impl Config for PoolRegistryConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for (index, pool) in self.pools.iter().enumerate() {
            if pool.template.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("pool #{} has an empty template name", index)));
            }
            if pool.initial_size == 0 {
                return Err(ConfigError::Invalid(format!(
                    "pool for '{}' must pre-create at least one instance",
                    pool.template
                )));
            }
        }
        Ok(())
    }
}
