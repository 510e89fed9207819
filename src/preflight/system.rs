//! Host settings that make cycle counts drift between runs.
//!
//! Each check reads one kernel file and hands its text to a parser, so the
//! parsers can be tested on fixed input. Findings are advisory: sampling
//! always proceeds.

/// A host setting likely to widen the retained window.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemWarning {
    /// The cpufreq governor lets the clock move during sampling.
    CpuGovernorNotPerformance {
        /// Governor reported by cpufreq.
        current: String,
    },

    /// Turbo can raise the core clock above the TSC rate.
    TurboBoostEnabled,

    /// An SMT sibling may share the pinned core.
    HyperthreadingEnabled,

    /// The cycle register may be virtualized.
    VirtualMachineDetected,

    /// Other work is competing for the CPUs.
    HighSystemLoad {
        /// One-minute load average.
        load_average: f64,
        /// Load above which this fires.
        threshold: f64,
    },
}

impl SystemWarning {
    /// One-line explanation with a remedy where there is one.
    pub fn description(&self) -> String {
        match self {
            SystemWarning::CpuGovernorNotPerformance { current } => format!(
                "cpufreq governor is '{}', cycle counts follow the clock; \
                 try `cpupower frequency-set -g performance`",
                current
            ),
            SystemWarning::TurboBoostEnabled => {
                "turbo is on, so core cycles and TSC ticks diverge under load".to_string()
            }
            SystemWarning::HyperthreadingEnabled => {
                "SMT is active, a sibling thread can steal the pinned core".to_string()
            }
            SystemWarning::VirtualMachineDetected => {
                "hypervisor detected, the cycle register may trap or be scaled".to_string()
            }
            SystemWarning::HighSystemLoad {
                load_average,
                threshold,
            } => format!(
                "load average {:.2} exceeds {:.2}, convergence will be slow",
                load_average, threshold
            ),
        }
    }
}

impl std::fmt::Display for SystemWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description())
    }
}

/// Inspect the host and return every finding.
///
/// Empty on platforms other than Linux.
pub fn system_check() -> Vec<SystemWarning> {
    #[cfg(target_os = "linux")]
    {
        let read = |path: &str| std::fs::read_to_string(path).ok();
        let cpus = std::thread::available_parallelism().map_or(1, |n| n.get());

        // intel_pstate reports the inverse of the generic boost flag.
        let turbo = match read("/sys/devices/system/cpu/intel_pstate/no_turbo") {
            Some(no_turbo) => flag(&no_turbo) == Some(false),
            None => read("/sys/devices/system/cpu/cpufreq/boost")
                .and_then(|boost| flag(&boost))
                .unwrap_or(false),
        };

        [
            read("/sys/devices/system/cpu/cpu0/cpufreq/scaling_governor")
                .and_then(|text| parse_governor(&text)),
            turbo.then_some(SystemWarning::TurboBoostEnabled),
            read("/sys/devices/system/cpu/smt/active")
                .and_then(|text| flag(&text))
                .and_then(|on| on.then_some(SystemWarning::HyperthreadingEnabled)),
            read("/proc/cpuinfo").and_then(|text| parse_cpuinfo(&text)),
            read("/proc/loadavg").and_then(|text| parse_load(&text, load_threshold(cpus))),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    #[cfg(not(target_os = "linux"))]
    {
        Vec::new()
    }
}

/// Run [`system_check`] and log each finding at warn level.
///
/// Returns the number of findings.
pub fn log_system_warnings() -> usize {
    let warnings = system_check();
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    tracing::debug!("{} system warnings", warnings.len());
    warnings.len()
}

/// A sysfs boolean: `"1"` or `"0"`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn flag(text: &str) -> Option<bool> {
    match text.trim() {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_governor(text: &str) -> Option<SystemWarning> {
    let current = text.trim().to_lowercase();
    (!current.is_empty() && current != "performance")
        .then_some(SystemWarning::CpuGovernorNotPerformance { current })
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_cpuinfo(text: &str) -> Option<SystemWarning> {
    text.lines()
        .filter(|line| line.starts_with("flags"))
        .any(|line| line.split_whitespace().any(|f| f == "hypervisor"))
        .then_some(SystemWarning::VirtualMachineDetected)
}

/// Half the machine busy means the pinned CPU is likely shared.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn load_threshold(cpus: usize) -> f64 {
    (cpus as f64 / 2.0).max(1.0)
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_load(text: &str, threshold: f64) -> Option<SystemWarning> {
    let load_average: f64 = text.split_whitespace().next()?.parse().ok()?;
    (load_average > threshold).then_some(SystemWarning::HighSystemLoad {
        load_average,
        threshold,
    })
}
