//! The sampling engine.
//!
//! A [`Session`] owns one workload handle, one cycle source and one
//! [`SampleSet`], and walks them through:
//!
//! ```text
//! Uninitialized -> Initialized -> WarmedUp -> Sampling -> Converged | Exhausted -> Reduced -> Done
//! ```
//!
//! Each step is a method so callers can interpose (the CLI reads the
//! checksum between warm-up and sampling); [`Session::measure`] runs every
//! remaining step.

use crate::config::Config;
use crate::error::{BenchError, Result};
use crate::measurement::{black_box, CycleSource, HardwareCounter, SampleSet};
use crate::result::{Measurement, Outcome};
use crate::workload::Workload;

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Created; the workload has not been initialized.
    Uninitialized,
    /// The workload handle exists.
    Initialized,
    /// Warm-up iterations ran; no samples yet.
    WarmedUp,
    /// The timed loop is running.
    Sampling,
    /// The retained window fell within tolerance.
    Converged,
    /// The iteration cap was reached without converging.
    Exhausted,
    /// Samples were reduced to a [`Measurement`].
    Reduced,
    /// [`Session::measure`] completed.
    Done,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Initialized => "initialized",
            Phase::WarmedUp => "warmed up",
            Phase::Sampling => "sampling",
            Phase::Converged => "converged",
            Phase::Exhausted => "exhausted",
            Phase::Reduced => "reduced",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// One measurement session over one workload.
///
/// # Example
///
/// ```
/// use kbest_bench::workloads::Sum;
/// use kbest_bench::{Config, Phase, Session};
///
/// let mut session = Session::new(Sum, Config::quick().param(256)).unwrap();
/// session.initialize().unwrap();
/// session.warm_up().unwrap();
/// assert_eq!(session.checksum().unwrap(), (0..256).sum::<i32>());
///
/// let measurement = session.measure().unwrap();
/// assert_eq!(session.phase(), Phase::Done);
/// assert!(measurement.best_cycles <= measurement.cycles);
/// ```
pub struct Session<W: Workload, C: CycleSource = HardwareCounter> {
    workload: W,
    counter: C,
    config: Config,
    handle: Option<W::Handle>,
    samples: SampleSet,
    iterations: usize,
    phase: Phase,
}

impl<W: Workload> Session<W, HardwareCounter> {
    /// Create a session timed by the hardware cycle counter.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] if `config` fails validation.
    pub fn new(workload: W, config: Config) -> Result<Self> {
        Self::with_counter(workload, config, HardwareCounter::new())
    }
}

impl<W: Workload, C: CycleSource> Session<W, C> {
    /// Create a session timed by `counter`.
    ///
    /// # Errors
    ///
    /// Returns [`BenchError::Config`] if `config` fails validation.
    pub fn with_counter(workload: W, config: Config, counter: C) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            samples: SampleSet::new(config.k_best, config.epsilon),
            workload,
            counter,
            config,
            handle: None,
            iterations: 0,
            phase: Phase::Uninitialized,
        })
    }

    /// Current lifecycle state.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Samples retained so far.
    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    /// Timed iterations performed so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Name of the cycle source.
    pub fn counter_name(&self) -> &'static str {
        self.counter.name()
    }

    fn require(&self, expected: &[Phase], operation: &'static str) -> Result<()> {
        if expected.contains(&self.phase) {
            Ok(())
        } else {
            Err(BenchError::InvalidPhase {
                operation,
                actual: self.phase,
            })
        }
    }

    /// Initialize the workload with the configured parameter.
    pub fn initialize(&mut self) -> Result<()> {
        self.require(&[Phase::Uninitialized], "initialize")?;
        self.handle = Some(self.workload.initialize(self.config.param));
        self.phase = Phase::Initialized;
        Ok(())
    }

    /// Run the untimed warm-up iterations.
    pub fn warm_up(&mut self) -> Result<()> {
        self.require(&[Phase::Initialized], "warm up")?;
        let Self {
            workload,
            handle,
            config,
            phase,
            ..
        } = self;
        let handle = handle.as_mut().ok_or(BenchError::InvalidPhase {
            operation: "warm up",
            actual: *phase,
        })?;

        for _ in 0..config.warmup {
            workload.prepare(handle, config.param);
            workload.run(black_box(&mut *handle), config.param);
        }
        *phase = Phase::WarmedUp;
        Ok(())
    }

    /// Ask the workload for its checksum.
    ///
    /// Valid in any phase after initialization. The value reflects whatever
    /// iterations have run so far.
    pub fn checksum(&mut self) -> Result<i32> {
        match self.handle.as_ref() {
            Some(handle) => Ok(self.workload.checksum(handle, self.config.param)),
            None => Err(BenchError::InvalidPhase {
                operation: "checksum",
                actual: self.phase,
            }),
        }
    }

    /// Fail with [`BenchError::ChecksumMismatch`] unless the checksum equals
    /// `expected`.
    pub fn verify_checksum(&mut self, expected: i32) -> Result<()> {
        let actual = self.checksum()?;
        if actual != expected {
            return Err(BenchError::ChecksumMismatch { actual, expected });
        }
        Ok(())
    }

    /// Run the timed loop until convergence or the iteration cap.
    ///
    /// Each iteration is an untimed `prepare` followed by a `run` bracketed
    /// by the cycle source. The iteration that converges ends the loop and
    /// is counted.
    pub fn sample(&mut self) -> Result<Outcome> {
        self.require(&[Phase::WarmedUp], "sample")?;
        self.phase = Phase::Sampling;

        let Self {
            workload,
            counter,
            config,
            handle,
            samples,
            iterations,
            phase,
        } = self;
        let handle = handle.as_mut().ok_or(BenchError::InvalidPhase {
            operation: "sample",
            actual: *phase,
        })?;
        let param = config.param;

        let mut outcome = Outcome::Exhausted;
        while *iterations < config.max_iters {
            workload.prepare(handle, param);

            let start = counter.mark();
            workload.run(black_box(&mut *handle), param);
            let cycles = counter.elapsed(start);

            *iterations += 1;
            tracing::debug!("{} cycles", cycles);

            if samples.insert(cycles) {
                outcome = Outcome::Converged;
                break;
            }
        }

        *phase = match outcome {
            Outcome::Converged => Phase::Converged,
            Outcome::Exhausted => Phase::Exhausted,
        };
        Ok(outcome)
    }

    /// Reduce the retained samples to a [`Measurement`].
    ///
    /// The reported value is the integer mean of the retained window, which
    /// holds fewer than `k_best` samples when the cap was below `k_best`.
    pub fn reduce(&mut self) -> Result<Measurement> {
        self.require(&[Phase::Converged, Phase::Exhausted], "reduce")?;
        let outcome = if self.phase == Phase::Converged {
            Outcome::Converged
        } else {
            Outcome::Exhausted
        };

        // max_iters >= 1 is validated, so the window is never empty here.
        let measurement = Measurement {
            cycles: self.samples.mean().unwrap_or_default(),
            best_cycles: self.samples.min().unwrap_or_default(),
            worst_retained_cycles: self.samples.max().unwrap_or_default(),
            iterations: self.iterations,
            retained: self.samples.len(),
            k_best: self.config.k_best,
            epsilon: self.config.epsilon,
            outcome,
            param: self.config.param,
            counter: self.counter.name().to_string(),
        };

        tracing::info!("Iterations: {}", measurement.iterations);
        tracing::info!("Best cycles: {}", measurement.best_cycles);
        tracing::info!("{}-Best cycles: {}", measurement.k_best, measurement.cycles);

        self.phase = Phase::Reduced;
        Ok(measurement)
    }

    /// Drive the session from its current phase to [`Phase::Done`].
    pub fn measure(&mut self) -> Result<Measurement> {
        if self.phase == Phase::Uninitialized {
            self.initialize()?;
        }
        if self.phase == Phase::Initialized {
            self.warm_up()?;
        }
        if self.phase == Phase::WarmedUp {
            self.sample()?;
        }
        let measurement = self.reduce()?;
        self.phase = Phase::Done;
        Ok(measurement)
    }

    /// Consume the session, returning the workload and its handle.
    pub fn into_parts(self) -> (W, Option<W::Handle>) {
        (self.workload, self.handle)
    }
}

impl<W: Workload, C: CycleSource> std::fmt::Debug for Session<W, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("counter", &self.counter.name())
            .field("config", &self.config)
            .field("iterations", &self.iterations)
            .field("retained", &self.samples.len())
            .finish_non_exhaustive()
    }
}
