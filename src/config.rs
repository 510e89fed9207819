//! Configuration for a sampling session.

use crate::constants::{DEFAULT_PARAM, EPSILON, K_BEST, MAX_ITERS, WARMUP_ITERATIONS};

/// Configuration options for a [`Session`](crate::Session).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Parameter passed to every workload call (default: 1000).
    pub param: i32,

    /// Hard cap on timed iterations (default: 5,000).
    pub max_iters: usize,

    /// Number of smallest samples retained and averaged (default: 200).
    pub k_best: usize,

    /// Convergence tolerance on the retained spread (default: 0.005).
    pub epsilon: f64,

    /// Untimed iterations before sampling (default: 1).
    pub warmup: usize,
}

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `max_iters` was zero, so no sample could be taken.
    #[error("max_iters must be at least 1")]
    ZeroIterations,
    /// `k_best` was zero.
    #[error("k_best must be at least 1")]
    ZeroKBest,
    /// `epsilon` was negative, NaN or infinite.
    #[error("epsilon must be finite and non-negative, got {0}")]
    InvalidEpsilon(f64),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            param: DEFAULT_PARAM,
            max_iters: MAX_ITERS,
            k_best: K_BEST,
            epsilon: EPSILON,
            warmup: WARMUP_ITERATIONS,
        }
    }
}

impl Config {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reduced limits for tests and smoke runs.
    ///
    /// Settings:
    /// - 500 max iterations (vs 5,000 default)
    /// - 20 retained samples (vs 200 default)
    /// - 5% tolerance (vs 0.5% default)
    pub fn quick() -> Self {
        Self {
            max_iters: 500,
            k_best: 20,
            epsilon: 0.05,
            ..Self::default()
        }
    }

    /// Set the workload parameter.
    pub fn param(mut self, param: i32) -> Self {
        self.param = param;
        self
    }

    /// Set the iteration cap.
    pub fn max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the number of retained samples.
    pub fn k_best(mut self, k: usize) -> Self {
        self.k_best = k;
        self
    }

    /// Set the convergence tolerance.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the number of untimed warm-up iterations.
    pub fn warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    /// Check every limit is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_iters == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.k_best == 0 {
            return Err(ConfigError::ZeroKBest);
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConfigError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}
