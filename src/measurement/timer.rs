//! Platform-specific cycle counter reads.
//!
//! Provides serialized counter reads using:
//! - x86_64: `cpuid; rdtsc` with compiler fences
//! - aarch64: `isb; mrs cntvct_el0`
//! - Fallback: nanoseconds since a process-wide `std::time::Instant` origin
//!
//! The fallback trades cycle precision for portability: it counts
//! nanoseconds, not cycles, and its resolution is whatever the OS clock gives.

use std::hint::black_box as std_black_box;
use std::sync::atomic::{compiler_fence, Ordering};

/// Wrapper around `std::hint::black_box` for preventing compiler optimizations.
#[inline]
pub fn black_box<T>(x: T) -> T {
    std_black_box(x)
}

/// A snapshot of the cycle counter at one instant.
///
/// Taken immediately before a timed region and consumed by
/// [`CycleMark::elapsed_until`] (or a [`CycleSource`](super::CycleSource))
/// right after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct CycleMark(u64);

impl CycleMark {
    /// Build a mark from the high and low 32-bit halves of the counter.
    #[inline]
    pub const fn from_halves(hi: u32, lo: u32) -> Self {
        Self(((hi as u64) << 32) | lo as u64)
    }

    /// Build a mark from a raw 64-bit counter value.
    #[inline]
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// The raw 64-bit counter value.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Cycles from `self` to `later`.
    ///
    /// Saturates at zero: a later mark that reads lower (cross-core skew on
    /// an unpinned thread) yields 0 rather than wrapping.
    #[inline]
    pub const fn elapsed_until(self, later: CycleMark) -> u64 {
        later.0.saturating_sub(self.0)
    }
}

/// Read the cycle counter with appropriate serialization.
///
/// On x86_64, this issues `cpuid` so every earlier instruction retires
/// before `rdtsc` samples the timestamp counter.
///
/// On aarch64, this uses `isb; mrs cntvct_el0` for the virtual timer count.
///
/// On other platforms, falls back to `Instant`-based nanoseconds.
#[inline]
pub fn read_counter() -> CycleMark {
    compiler_fence(Ordering::SeqCst);

    #[cfg(target_arch = "x86_64")]
    let mark = read_x86_64();

    #[cfg(target_arch = "aarch64")]
    let mark = read_aarch64();

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    let mark = read_fallback();

    compiler_fence(Ordering::SeqCst);
    mark
}

/// Capture the counter at the start of a timed region.
#[inline]
pub fn mark() -> CycleMark {
    read_counter()
}

/// Cycles elapsed since `start`.
#[inline]
pub fn elapsed(start: CycleMark) -> u64 {
    start.elapsed_until(read_counter())
}

/// x86_64 implementation using cpuid + rdtsc.
#[cfg(target_arch = "x86_64")]
#[inline]
fn read_x86_64() -> CycleMark {
    let hi: u32;
    let lo: u32;
    // SAFETY: cpuid and rdtsc are available on every x86_64 CPU and only
    // write the registers named below.
    unsafe {
        // cpuid clobbers rbx, which asm! cannot name on x86_64; the intrinsic
        // saves and restores it for us.
        black_box(core::arch::x86_64::__cpuid(0));
        std::arch::asm!(
            "rdtsc",
            out("eax") lo,
            out("edx") hi,
            options(nostack, preserves_flags),
        );
    }
    CycleMark::from_halves(hi, lo)
}

/// aarch64 implementation using isb + mrs cntvct_el0.
#[cfg(target_arch = "aarch64")]
#[inline]
fn read_aarch64() -> CycleMark {
    let cycles: u64;
    // SAFETY: cntvct_el0 is readable from EL0 on every supported OS.
    unsafe {
        std::arch::asm!(
            "isb",
            "mrs {}, cntvct_el0",
            out(reg) cycles,
            options(nostack),
        );
    }
    CycleMark::from_raw(cycles)
}

/// Fallback implementation using std::time::Instant.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline]
fn read_fallback() -> CycleMark {
    use std::sync::OnceLock;
    use std::time::Instant;
    static START: OnceLock<Instant> = OnceLock::new();

    let start = START.get_or_init(Instant::now);
    CycleMark::from_raw(start.elapsed().as_nanos() as u64)
}

/// Name of the register read by [`read_counter`] on this target.
pub const fn counter_name() -> &'static str {
    #[cfg(target_arch = "x86_64")]
    {
        "rdtsc"
    }
    #[cfg(target_arch = "aarch64")]
    {
        "cntvct_el0"
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        "Instant"
    }
}
