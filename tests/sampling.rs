//! End-to-end sampling behaviour with scripted and real cycle sources.

use std::collections::VecDeque;

use kbest_bench::workloads::{Fib, Sort, Sum};
use kbest_bench::{
    BenchError, Config, CycleMark, CycleSource, Measurement, Outcome, Phase, Session, Workload,
};

/// Hands out a fixed elapsed value per timed region, in order.
struct Scripted {
    now: u64,
    elapsed: VecDeque<u64>,
    closing: bool,
}

impl Scripted {
    fn new(elapsed: impl IntoIterator<Item = u64>) -> Self {
        Self {
            now: 0,
            elapsed: elapsed.into_iter().collect(),
            closing: false,
        }
    }
}

impl CycleSource for Scripted {
    fn now(&mut self) -> CycleMark {
        if self.closing {
            self.now += self.elapsed.pop_front().expect("script exhausted");
        }
        self.closing = !self.closing;
        CycleMark::from_raw(self.now)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Counts calls; the handle is the number of runs.
#[derive(Default)]
struct Counting {
    prepares: usize,
}

impl Workload for Counting {
    type Handle = usize;

    fn initialize(&mut self, _param: i32) -> usize {
        0
    }

    fn prepare(&mut self, _handle: &mut usize, _param: i32) {
        self.prepares += 1;
    }

    fn run(&mut self, handle: &mut usize, _param: i32) {
        *handle += 1;
    }

    fn checksum(&mut self, handle: &usize, _param: i32) -> i32 {
        *handle as i32
    }
}

fn scripted_measure(
    elapsed: Vec<u64>,
    config: Config,
) -> (Measurement, Session<Counting, Scripted>) {
    let mut session =
        Session::with_counter(Counting::default(), config, Scripted::new(elapsed)).unwrap();
    let measurement = session.measure().unwrap();
    (measurement, session)
}

#[test]
fn test_converges_at_k_with_flat_samples() {
    let (m, session) = scripted_measure(vec![500; 200], Config::default());
    assert_eq!(m.outcome, Outcome::Converged);
    assert_eq!(m.iterations, 200);
    assert_eq!(m.retained, 200);
    assert_eq!(m.cycles, 500);
    assert_eq!(m.best_cycles, 500);
    assert_eq!(m.counter, "scripted");
    assert_eq!(session.phase(), Phase::Done);
}

#[test]
fn test_noise_floor_found_after_outliers() {
    // 200 noisy samples, then 200 at the floor: the floor replaces the noise.
    let mut script: Vec<u64> = (0..200).map(|i| 1000 + 10 * i).collect();
    script.extend(std::iter::repeat(900).take(200));
    let (m, session) = scripted_measure(script, Config::default());

    assert_eq!(m.outcome, Outcome::Converged);
    assert_eq!(m.iterations, 400);
    assert_eq!(session.samples().attempts(), 400);
    assert_eq!(m.cycles, 900);
}

#[test]
fn test_interrupt_spikes_never_admitted() {
    let script: Vec<u64> = (0..300u64)
        .map(|i| if i % 7 == 0 { 1_000_000 } else { 2000 + i % 3 })
        .collect();
    let config = Config::default().k_best(50).max_iters(300);
    let (m, session) = scripted_measure(script, config);

    assert_eq!(m.outcome, Outcome::Converged);
    assert!(session.samples().as_slice().iter().all(|&v| v < 1_000_000));
    assert!(m.spread() <= 0.005);
}

#[test]
fn test_exhausted_reports_window_mean() {
    let script: Vec<u64> = (1..=10).map(|i| i * 100).collect();
    let config = Config::default().k_best(4).max_iters(10);
    let (m, _) = scripted_measure(script, config);

    assert_eq!(m.outcome, Outcome::Exhausted);
    assert_eq!(m.iterations, 10);
    // window is [100, 200, 300, 400]
    assert_eq!(m.cycles, 250);
    assert_eq!(m.best_cycles, 100);
    assert_eq!(m.worst_retained_cycles, 400);
}

#[test]
fn test_max_iters_below_k_averages_collected() {
    let (m, _) = scripted_measure(vec![10, 31], Config::default().max_iters(2));
    assert_eq!(m.retained, 2);
    assert_eq!(m.cycles, 20);
    assert_eq!(m.outcome, Outcome::Exhausted);
}

#[test]
fn test_one_prepare_per_run() {
    let (m, session) = scripted_measure(vec![100; 5], Config::default().k_best(5).max_iters(5));
    let (workload, handle) = session.into_parts();
    // warm-up + timed iterations
    assert_eq!(workload.prepares, 1 + m.iterations);
    assert_eq!(handle, Some(1 + m.iterations));
}

#[test]
fn test_checksum_mismatch_is_fatal() {
    let mut session = Session::new(Sum, Config::quick().param(10)).unwrap();
    session.initialize().unwrap();
    session.warm_up().unwrap();
    let err = session.verify_checksum(44).unwrap_err();
    assert!(matches!(
        err,
        BenchError::ChecksumMismatch {
            actual: 45,
            expected: 44
        }
    ));
    assert_eq!(err.to_string(), "Checksum 45 != 44");
    assert_eq!(session.phase(), Phase::WarmedUp);
}

#[test]
fn test_sessions_are_independent() {
    let mut a = Session::new(Fib, Config::quick().param(30)).unwrap();
    let mut b = Session::new(Sort::default(), Config::quick().param(64)).unwrap();

    let ma = a.measure().unwrap();
    assert_eq!(b.phase(), Phase::Uninitialized);
    let mb = b.measure().unwrap();

    assert_eq!(ma.param, 30);
    assert_eq!(mb.param, 64);
    assert_eq!(a.checksum().unwrap(), 832_040);
}

#[test]
fn test_hardware_counter_end_to_end() {
    let m = kbest_bench::measure(Sum, 2000).unwrap();
    assert!(m.iterations >= 1 && m.iterations <= kbest_bench::MAX_ITERS);
    assert!(m.retained <= kbest_bench::K_BEST);
    assert!(m.best_cycles <= m.cycles);
    assert!(m.cycles <= m.worst_retained_cycles);
    if m.outcome == Outcome::Converged {
        assert_eq!(m.retained, kbest_bench::K_BEST);
    }
}
