//! Default sampling parameters.

/// Hard cap on timed iterations per session.
pub const MAX_ITERS: usize = 5000;

/// Number of smallest samples retained and averaged.
pub const K_BEST: usize = 200;

/// Relative spread allowed between the smallest and largest retained sample.
pub const EPSILON: f64 = 0.005;

/// Workload parameter used when none is given.
pub const DEFAULT_PARAM: i32 = 1000;

/// Untimed iterations run before sampling.
pub const WARMUP_ITERATIONS: usize = 1;
