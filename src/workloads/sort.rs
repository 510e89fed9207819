use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::measurement::black_box;
use crate::Workload;

/// Sorts a fresh copy of seeded pseudo-random data on every iteration.
#[derive(Debug, Clone, Copy)]
pub struct Sort {
    seed: u64,
}

impl Sort {
    /// Create with an explicit RNG seed.
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::with_seed(0x5eed)
    }
}

/// State for [`Sort`].
#[derive(Debug, Clone)]
pub struct SortState {
    input: Vec<u32>,
    work: Vec<u32>,
}

impl Workload for Sort {
    type Handle = SortState;

    fn initialize(&mut self, param: i32) -> SortState {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let input: Vec<u32> = (0..super::param_len(param))
            .map(|_| rng.random())
            .collect();
        SortState {
            work: input.clone(),
            input,
        }
    }

    fn prepare(&mut self, handle: &mut SortState, _param: i32) {
        handle.work.copy_from_slice(&handle.input);
    }

    fn run(&mut self, handle: &mut SortState, _param: i32) {
        black_box(&mut handle.work).sort_unstable();
    }

    fn checksum(&mut self, handle: &SortState, _param: i32) -> i32 {
        // Position-weighted so an unsorted permutation checks differently.
        handle
            .work
            .iter()
            .enumerate()
            .fold(0u32, |acc, (i, &v)| {
                acc.wrapping_mul(31).wrapping_add(v ^ i as u32)
            }) as i32
    }
}
