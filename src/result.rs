//! Measurement result types.

use serde::{Deserialize, Serialize};

/// How the sampling loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The retained window fell within tolerance.
    Converged,
    /// The iteration cap was reached first.
    Exhausted,
}

impl Outcome {
    /// True for [`Outcome::Converged`].
    pub fn is_converged(self) -> bool {
        matches!(self, Outcome::Converged)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Converged => write!(f, "converged"),
            Outcome::Exhausted => write!(f, "exhausted"),
        }
    }
}

/// The reduced result of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Integer mean of the retained samples. This is the reported value.
    pub cycles: u64,

    /// Smallest sample seen (absolute best case).
    pub best_cycles: u64,

    /// Largest retained sample.
    pub worst_retained_cycles: u64,

    /// Timed iterations performed, including the one that converged.
    pub iterations: usize,

    /// Samples retained in the best-k window.
    pub retained: usize,

    /// Configured window size.
    pub k_best: usize,

    /// Configured convergence tolerance.
    pub epsilon: f64,

    /// Whether the window converged or the cap was hit.
    pub outcome: Outcome,

    /// Workload parameter.
    pub param: i32,

    /// Cycle source that produced the samples.
    pub counter: String,
}

impl Measurement {
    /// Relative spread `worst / best - 1` of the retained window.
    pub fn spread(&self) -> f64 {
        if self.best_cycles == 0 {
            return 0.0;
        }
        self.worst_retained_cycles as f64 / self.best_cycles as f64 - 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_is_converged() {
        assert!(Outcome::Converged.is_converged());
        assert!(!Outcome::Exhausted.is_converged());
        assert_eq!(Outcome::Exhausted.to_string(), "exhausted");
    }
}
