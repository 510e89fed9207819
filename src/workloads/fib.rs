use crate::measurement::black_box;
use crate::Workload;

const MODULUS: u64 = 1_000_000_007;

/// Iterative Fibonacci modulo 1e9+7; the handle holds the last result.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fib;

impl Workload for Fib {
    type Handle = u64;

    fn initialize(&mut self, _param: i32) -> u64 {
        0
    }

    fn prepare(&mut self, handle: &mut u64, _param: i32) {
        *handle = 0;
    }

    fn run(&mut self, handle: &mut u64, param: i32) {
        let (mut a, mut b) = (0u64, 1u64);
        for _ in 0..black_box(super::param_len(param)) {
            let next = (a + b) % MODULUS;
            a = b;
            b = next;
        }
        *handle = a;
    }

    fn checksum(&mut self, handle: &u64, _param: i32) -> i32 {
        *handle as i32
    }
}
