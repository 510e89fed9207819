//! Cycle source abstraction.
//!
//! This module provides:
//! - [`CycleSource`] - The interface the sampling engine times through
//! - [`HardwareCounter`] - The register-based counter (rdtsc/cntvct_el0)
//! - [`BoxedCounter`] - An enum wrapping every available source
//! - [`CounterSpec`] - Specification for which source to use

use super::timer::{self, CycleMark};

#[cfg(all(target_os = "linux", feature = "perf"))]
use super::perf::PerfCounter;

/// Error returned when a cycle source cannot be created.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CounterError {
    /// The requested source is not compiled in or not supported here.
    #[error("cycle source '{0}' is not available on this platform")]
    Unavailable(String),
    /// Permission denied (need sudo or capabilities).
    #[error("permission denied opening '{0}': run with sudo, set CAP_PERFMON, or lower perf_event_paranoid")]
    PermissionDenied(String),
    /// The source exists but could not be configured.
    #[error("cycle source configuration failed: {0}")]
    ConfigurationFailed(String),
}

/// A monotonic counter the sampling engine reads around each timed run.
pub trait CycleSource {
    /// Current counter value.
    fn now(&mut self) -> CycleMark;

    /// Source name for diagnostics and reports.
    fn name(&self) -> &'static str;

    /// Capture the counter immediately before a timed region.
    #[inline]
    fn mark(&mut self) -> CycleMark {
        self.now()
    }

    /// Cycles elapsed since `start`, never negative.
    #[inline]
    fn elapsed(&mut self, start: CycleMark) -> u64 {
        start.elapsed_until(self.now())
    }
}

impl<C: CycleSource + ?Sized> CycleSource for &mut C {
    #[inline]
    fn now(&mut self) -> CycleMark {
        (**self).now()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// The architecture's serialized cycle register.
#[derive(Debug, Clone, Copy, Default)]
pub struct HardwareCounter;

impl HardwareCounter {
    /// Create a hardware counter handle.
    pub fn new() -> Self {
        Self
    }
}

impl CycleSource for HardwareCounter {
    #[inline]
    fn now(&mut self) -> CycleMark {
        timer::read_counter()
    }

    fn name(&self) -> &'static str {
        timer::counter_name()
    }
}

/// A cycle source chosen at runtime.
///
/// This enum-based approach keeps the sampling loop monomorphic while
/// still letting the CLI pick a source.
pub enum BoxedCounter {
    /// Register-based counter (rdtsc/cntvct_el0/Instant).
    Hardware(HardwareCounter),

    /// Linux perf_event PMU counter.
    #[cfg(all(target_os = "linux", feature = "perf"))]
    Perf(PerfCounter),
}

impl CycleSource for BoxedCounter {
    #[inline]
    fn now(&mut self) -> CycleMark {
        match self {
            BoxedCounter::Hardware(c) => c.now(),
            #[cfg(all(target_os = "linux", feature = "perf"))]
            BoxedCounter::Perf(c) => c.now(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            BoxedCounter::Hardware(c) => c.name(),
            #[cfg(all(target_os = "linux", feature = "perf"))]
            BoxedCounter::Perf(c) => c.name(),
        }
    }
}

impl std::fmt::Debug for BoxedCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedCounter")
            .field("name", &self.name())
            .finish()
    }
}

/// Specification for which cycle source to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CounterSpec {
    /// The hardware register; never needs privileges.
    #[default]
    Auto,

    /// Always the hardware register.
    Hardware,

    /// Linux perf_event CPU_CYCLES counter. Fails when unavailable.
    Perf,
}

impl CounterSpec {
    /// Create the cycle source named by this specification.
    ///
    /// # Errors
    ///
    /// `Perf` fails when the crate was built without the `perf` feature,
    /// when not on Linux, or when perf_event access is denied.
    pub fn create(&self) -> Result<BoxedCounter, CounterError> {
        match self {
            CounterSpec::Auto | CounterSpec::Hardware => {
                Ok(BoxedCounter::Hardware(HardwareCounter::new()))
            }

            #[cfg(all(target_os = "linux", feature = "perf"))]
            CounterSpec::Perf => PerfCounter::new().map(BoxedCounter::Perf),

            #[cfg(not(all(target_os = "linux", feature = "perf")))]
            CounterSpec::Perf => Err(CounterError::Unavailable("perf_event".to_string())),
        }
    }
}

impl std::fmt::Display for CounterSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterSpec::Auto => write!(f, "auto"),
            CounterSpec::Hardware => write!(f, "hardware"),
            CounterSpec::Perf => write!(f, "perf"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_is_hardware() {
        let counter = CounterSpec::Auto.create().unwrap();
        assert_eq!(counter.name(), timer::counter_name());
    }

    #[test]
    fn test_provided_elapsed_uses_now() {
        struct Steps(u64);
        impl CycleSource for Steps {
            fn now(&mut self) -> CycleMark {
                self.0 += 10;
                CycleMark::from_raw(self.0)
            }
            fn name(&self) -> &'static str {
                "steps"
            }
        }

        let mut source = Steps(0);
        let start = source.mark();
        assert_eq!(source.elapsed(start), 10);
        assert_eq!(source.elapsed(start), 20);
    }

    #[test]
    #[cfg(not(all(target_os = "linux", feature = "perf")))]
    fn test_perf_unavailable_without_feature() {
        assert!(matches!(
            CounterSpec::Perf.create(),
            Err(CounterError::Unavailable(_))
        ));
    }
}
