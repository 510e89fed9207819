//! Measurement infrastructure for cycle counting.
//!
//! This module provides:
//! - Serialized cycle counter reads with platform-specific implementations
//! - The [`CycleSource`] interface the sampling engine times through
//! - The bounded best-k [`SampleSet`]
//!
//! # Counter Selection
//!
//! By default, timing uses platform registers:
//! - **x86_64**: `cpuid; rdtsc` (invariant TSC ticks)
//! - **aarch64**: `isb; mrs cntvct_el0` (resolution varies by SoC)
//! - **other**: `std::time::Instant` nanoseconds
//!
//! On Linux, core cycles from the PMU are available with the `perf` feature:
//!
//! ```toml
//! [dependencies]
//! kbest-bench = { version = "0.1", features = ["perf"] }
//! ```

mod counter;
mod sample_set;
mod timer;

#[cfg(all(target_os = "linux", feature = "perf"))]
pub mod perf;

pub use counter::{BoxedCounter, CounterError, CounterSpec, CycleSource, HardwareCounter};
pub use sample_set::SampleSet;
pub use timer::{black_box, counter_name, elapsed, mark, read_counter, CycleMark};
