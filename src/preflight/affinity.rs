//! CPU pinning.
//!
//! Pinning the process to one logical CPU before sampling avoids migrations
//! between cores whose counters may not be perfectly synchronized.

use std::io;

/// Pin the calling process to logical CPU `cpu`.
///
/// # Errors
///
/// Returns the OS error if `sched_setaffinity` fails, and
/// `ErrorKind::Unsupported` on platforms without it.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> io::Result<()> {
    if cpu >= libc::CPU_SETSIZE as usize {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("cpu {} exceeds CPU_SETSIZE", cpu),
        ));
    }

    // SAFETY: cpu_set_t is plain data; an all-zero value is the empty set,
    // and the index was bounds-checked above.
    let result = unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(cpu, &mut set);
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set)
    };

    if result == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// CPU pinning is only implemented on Linux.
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "CPU affinity is not supported on this platform",
    ))
}

/// Pin to `cpu`, logging a warning and continuing unpinned on failure.
///
/// Returns whether the pin took effect.
pub fn pin_best_effort(cpu: usize) -> bool {
    match pin_to_cpu(cpu) {
        Ok(()) => {
            tracing::debug!("pinned to cpu {}", cpu);
            true
        }
        Err(e) => {
            tracing::warn!("sched_setaffinity: {} (continuing unpinned)", e);
            false
        }
    }
}
