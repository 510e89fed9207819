//! Demonstration workloads for the `kbest-bench` binary.
//!
//! Real workloads are supplied by the caller through the
//! [`Workload`](crate::Workload) trait. These exist so the driver can be
//! exercised out of the box and so tests have realistic bodies to time.
//!
//! All inputs are generated up front in `initialize` or reset in `prepare`;
//! `run` touches nothing but the handle.

mod fib;
mod sort;
mod sum;

pub use fib::Fib;
pub use sort::Sort;
pub use sum::Sum;

/// Built-in workload selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum WorkloadKind {
    /// Sum a vector of `param` integers.
    #[default]
    Sum,
    /// Sort `param` seeded pseudo-random integers.
    Sort,
    /// Compute the `param`-th Fibonacci number modulo a prime.
    Fib,
}

impl std::fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkloadKind::Sum => write!(f, "sum"),
            WorkloadKind::Sort => write!(f, "sort"),
            WorkloadKind::Fib => write!(f, "fib"),
        }
    }
}

/// Clamp a workload parameter to a usable length.
fn param_len(param: i32) -> usize {
    usize::try_from(param).unwrap_or(0)
}
