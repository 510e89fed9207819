//! Property tests for the best-k sample store.

use kbest_bench::SampleSet;
use proptest::prelude::*;

proptest! {
    #[test]
    fn stays_sorted_and_bounded(k in 1usize..64, samples in prop::collection::vec(0u64..10_000, 0..500)) {
        let mut set = SampleSet::new(k, 0.005);
        for &s in &samples {
            set.insert(s);
            prop_assert!(set.len() <= k);
            prop_assert!(set.as_slice().windows(2).all(|w| w[0] <= w[1]));
        }
        prop_assert_eq!(set.attempts(), samples.len());
    }

    #[test]
    fn retains_the_k_smallest(k in 1usize..64, samples in prop::collection::vec(0u64..10_000, 0..500)) {
        let mut set = SampleSet::new(k, 0.005);
        for &s in &samples {
            set.insert(s);
        }
        let mut expected = samples.clone();
        expected.sort_unstable();
        expected.truncate(k);
        prop_assert_eq!(set.as_slice(), expected.as_slice());
    }

    #[test]
    fn full_set_admits_only_smaller(
        k in 1usize..32,
        seed in prop::collection::vec(1u64..10_000, 32..64),
        next in 0u64..10_000,
    ) {
        let mut set = SampleSet::new(k, 0.005);
        for &s in &seed {
            set.insert(s);
        }
        prop_assume!(set.is_full());
        let before = set.clone();
        let max = before.max().unwrap();

        set.insert(next);

        if next < max {
            prop_assert_eq!(set.len(), k);
            prop_assert!(set.as_slice().contains(&next));
            prop_assert!(set.max().unwrap() <= max);
        } else {
            prop_assert_eq!(set.as_slice(), before.as_slice());
        }
        prop_assert_eq!(set.attempts(), before.attempts() + 1);
    }

    #[test]
    fn converged_iff_full_and_within_tolerance(
        k in 1usize..16,
        samples in prop::collection::vec(1u64..2_000, 1..40),
        eps in 0.0f64..0.5,
    ) {
        let mut set = SampleSet::new(k, eps);
        let mut last = false;
        for &s in &samples {
            last = set.insert(s);
        }
        let expected = set.is_full()
            && (1.0 + eps) * set.min().unwrap() as f64 >= set.max().unwrap() as f64;
        prop_assert_eq!(last, expected);
        prop_assert_eq!(set.is_converged(), expected);
    }

    #[test]
    fn mean_is_truncated_window_average(k in 1usize..64, samples in prop::collection::vec(0u64..1_000_000, 1..200)) {
        let mut set = SampleSet::new(k, 0.005);
        for &s in &samples {
            set.insert(s);
        }
        let sum: u64 = set.as_slice().iter().sum();
        prop_assert_eq!(set.mean(), Some(sum / set.len() as u64));
    }
}

#[test]
fn constructed_convergence_cases() {
    let mut flat = SampleSet::new(3, 0.005);
    for v in [100, 100, 100] {
        flat.insert(v);
    }
    assert!(flat.is_converged());

    let mut wide = SampleSet::new(3, 0.005);
    for v in [100, 100, 150] {
        wide.insert(v);
    }
    assert!(!wide.is_converged());

    let mut mean = SampleSet::new(3, 0.005);
    for v in [10, 20, 30] {
        mean.insert(v);
    }
    assert_eq!(mean.mean(), Some(20));
}
