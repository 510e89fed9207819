//! Core-cycle counting through the Linux perf_event PMU interface.
//!
//! Unlike the TSC, the PMU `CPU_CYCLES` event follows the actual core clock,
//! so turbo and frequency scaling show up in the counts.
//!
//! Opening the counter needs root, `CAP_PERFMON` (Linux 5.8+), or
//! `/proc/sys/kernel/perf_event_paranoid` at 2 or lower.

use std::sync::atomic::{compiler_fence, Ordering};

use super::counter::{CounterError, CycleSource};
use super::timer::CycleMark;

/// Cycle source backed by a perf_event CPU_CYCLES counter.
///
/// The counter is enabled once at creation and read without reset, so
/// successive reads are monotonic like a hardware register.
pub struct PerfCounter {
    counter: ::perf_event2::Counter,
    last: u64,
}

impl PerfCounter {
    /// Open and enable a CPU_CYCLES counter for the calling thread.
    ///
    /// # Errors
    ///
    /// Returns [`CounterError::PermissionDenied`] without sufficient
    /// privileges and [`CounterError::ConfigurationFailed`] otherwise.
    pub fn new() -> Result<Self, CounterError> {
        use ::perf_event2::events::Hardware;
        use ::perf_event2::Builder;

        let mut counter = Builder::new(Hardware::CPU_CYCLES).build().map_err(|e| {
            if e.kind() == std::io::ErrorKind::PermissionDenied {
                CounterError::PermissionDenied("perf_event".to_string())
            } else {
                CounterError::ConfigurationFailed(format!("{:?}", e))
            }
        })?;

        counter
            .enable()
            .map_err(|e| CounterError::ConfigurationFailed(format!("failed to enable: {:?}", e)))?;

        tracing::debug!("perf_event CPU_CYCLES counter enabled");
        Ok(Self { counter, last: 0 })
    }
}

impl CycleSource for PerfCounter {
    /// A failed read repeats the previous value and logs a warning.
    #[inline]
    fn now(&mut self) -> CycleMark {
        compiler_fence(Ordering::SeqCst);
        let read = self.counter.read();
        compiler_fence(Ordering::SeqCst);
        self.last = settle_read(read, self.last);
        CycleMark::from_raw(self.last)
    }

    fn name(&self) -> &'static str {
        "perf_event"
    }
}

/// The counter value to use for `read`, falling back to `last` on error.
///
/// A repeated value makes the enclosing sample 0 cycles, which the best-k
/// window would admit as its minimum, so the failure is never silent.
fn settle_read(read: std::io::Result<u64>, last: u64) -> u64 {
    match read {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("perf_event read failed: {} (sample is unreliable)", e);
            last
        }
    }
}

impl std::fmt::Debug for PerfCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfCounter").finish_non_exhaustive()
    }
}
