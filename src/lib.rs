//! # kbest-bench
//!
//! Cycle-accurate micro-benchmark driver.
//!
//! A workload is timed with a serialized hardware cycle counter over many
//! iterations. Only the `k` smallest samples are kept, and sampling stops as
//! soon as the smallest and largest of them agree within a relative
//! tolerance `ε`. The reported value is the integer mean of that window:
//! - Robust to one-off interrupts and preemptions (never admitted once the
//!   window is full)
//! - Less sensitive than a single minimum to one lucky sample
//! - Stops early on quiet machines, bounded by an iteration cap on noisy ones
//!
//! ## Quick Start
//!
//! ```
//! use kbest_bench::workloads::Fib;
//!
//! let measurement = kbest_bench::measure(Fib, 1000).unwrap();
//! println!("{} cycles", measurement.cycles);
//! ```
//!
//! Implement [`Workload`] to time your own code, and use [`Session`] with a
//! [`Config`] for control over the iteration cap, window size and tolerance.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod error;
mod result;
mod session;
mod workload;

// Functional modules
pub mod measurement;
pub mod output;
pub mod preflight;
pub mod workloads;

// Re-exports for public API
pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_PARAM, EPSILON, K_BEST, MAX_ITERS, WARMUP_ITERATIONS};
pub use error::{BenchError, Result};
pub use measurement::{CounterSpec, CycleMark, CycleSource, SampleSet};
pub use result::{Measurement, Outcome};
pub use session::{Phase, Session};
pub use workload::Workload;

/// Measure `workload` with the default configuration and hardware counter.
///
/// Runs initialize, one warm-up iteration, up to [`MAX_ITERS`] timed
/// iterations until the [`K_BEST`] window converges within [`EPSILON`], and
/// the reduction.
pub fn measure<W: Workload>(workload: W, param: i32) -> Result<Measurement> {
    Session::new(workload, Config::default().param(param))?.measure()
}
