//! Generation options shared by every request of a session
//!
//! Options are plain data. They deserialize from any serde format and can be overlaid from the
//! environment when reproducing a failure.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_CONTAINER_SIZE, DEFAULT_MAX_FILTER_ATTEMPTS,
    DEFAULT_MAX_UNIQUE_ATTEMPTS, DEFAULT_MIN_CONTAINER_SIZE, DEFAULT_NULL_INJECT,
    MAX_DEPTH_ENV_VAR, MAX_TYPE_RECURSION_DEPTH, SEED_ENV_VAR,
};
use crate::error::{Error, Result};

/// Tunables for tree building and value generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Lower bound for container sizes without an explicit directive
    pub default_min_size:    usize,
    /// Upper bound for container sizes without an explicit directive
    pub default_max_size:    usize,
    /// Object/container nesting allowed before subtrees are truncated
    pub max_recursion_depth: usize,
    /// Probability that a nullable member or optional materializes as null
    pub null_inject:         f64,
    /// Candidates generated for a filtered node before failing
    pub max_filter_attempts: usize,
    /// Retries spent avoiding duplicate set elements and map keys
    pub max_unique_attempts: usize,
    /// Capacity of each metadata cache
    pub cache_capacity:      usize,
    /// Fixed seed; a fresh random seed is drawn per request when absent
    pub seed:                Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            default_min_size:    DEFAULT_MIN_CONTAINER_SIZE,
            default_max_size:    DEFAULT_MAX_CONTAINER_SIZE,
            max_recursion_depth: MAX_TYPE_RECURSION_DEPTH,
            null_inject:         DEFAULT_NULL_INJECT,
            max_filter_attempts: DEFAULT_MAX_FILTER_ATTEMPTS,
            max_unique_attempts: DEFAULT_MAX_UNIQUE_ATTEMPTS,
            cache_capacity:      DEFAULT_CACHE_CAPACITY,
            seed:                None,
        }
    }
}

impl GenerateOptions {
    /// Defaults overlaid with `FIXTURE_FORGE_SEED` and `FIXTURE_FORGE_MAX_DEPTH`
    pub fn from_env() -> Result<Self> {
        let mut options = Self::default();

        if let Ok(seed) = std::env::var(SEED_ENV_VAR) {
            let seed = seed
                .trim()
                .parse::<u64>()
                .map_err(|e| Error::invalid(SEED_ENV_VAR, e))?;
            options.seed = Some(seed);
        }

        if let Ok(depth) = std::env::var(MAX_DEPTH_ENV_VAR) {
            let depth = depth
                .trim()
                .parse::<usize>()
                .map_err(|e| Error::invalid(MAX_DEPTH_ENV_VAR, e))?;
            options.max_recursion_depth = depth;
        }

        options.validate()?;
        Ok(options)
    }

    /// Builder-style seed override
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder-style null injection override
    #[must_use]
    pub const fn with_null_inject(mut self, null_inject: f64) -> Self {
        self.null_inject = null_inject;
        self
    }

    /// Builder-style default container size override
    #[must_use]
    pub const fn with_default_size(mut self, min: usize, max: usize) -> Self {
        self.default_min_size = min;
        self.default_max_size = max;
        self
    }

    /// Reject option combinations the engine cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.default_min_size > self.default_max_size {
            return Err(Error::size_bounds(self.default_min_size, self.default_max_size).into());
        }
        if !(0.0..=1.0).contains(&self.null_inject) {
            return Err(Error::invalid(
                "null_inject",
                format!("{} is not a probability", self.null_inject),
            )
            .into());
        }
        if self.max_filter_attempts == 0 {
            return Err(Error::invalid("max_filter_attempts", "must be at least 1").into());
        }
        if self.cache_capacity == 0 {
            return Err(Error::invalid("cache_capacity", "must be at least 1").into());
        }
        Ok(())
    }
}
