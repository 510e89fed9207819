//! Setup performed once before sampling.
//!
//! - **Affinity**: best-effort pinning to one logical CPU
//! - **System**: platform checks (CPU governor, turbo, SMT, VM, load)
//!
//! Nothing here can fail a run; problems are logged and sampling proceeds.

mod affinity;
mod system;

pub use affinity::{pin_best_effort, pin_to_cpu};
pub use system::{log_system_warnings, system_check, SystemWarning};
