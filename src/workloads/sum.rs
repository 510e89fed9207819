use crate::measurement::black_box;
use crate::Workload;

/// Sums `0..param` stored in a vector.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

/// State for [`Sum`].
#[derive(Debug, Clone)]
pub struct SumState {
    data: Vec<u64>,
    total: u64,
}

impl Workload for Sum {
    type Handle = SumState;

    fn initialize(&mut self, param: i32) -> SumState {
        SumState {
            data: (0..super::param_len(param) as u64).collect(),
            total: 0,
        }
    }

    fn prepare(&mut self, handle: &mut SumState, _param: i32) {
        handle.total = 0;
    }

    fn run(&mut self, handle: &mut SumState, _param: i32) {
        let mut total = 0u64;
        for &v in black_box(&handle.data) {
            total = total.wrapping_add(v);
        }
        handle.total = black_box(total);
    }

    fn checksum(&mut self, handle: &SumState, _param: i32) -> i32 {
        handle.total as i32
    }
}
