//! The workload contract consumed by the sampling engine.

/// Code under measurement.
///
/// The engine calls [`initialize`](Self::initialize) once per session,
/// then pairs an untimed [`prepare`](Self::prepare) with a timed
/// [`run`](Self::run) for every iteration. The handle is opaque to the
/// engine: it is stored and passed back, never inspected.
///
/// # Example
///
/// ```
/// use kbest_bench::{Config, Session, Workload};
///
/// struct Count;
///
/// impl Workload for Count {
///     type Handle = u64;
///
///     fn initialize(&mut self, _param: i32) -> u64 {
///         0
///     }
///
///     fn prepare(&mut self, handle: &mut u64, _param: i32) {
///         *handle = 0;
///     }
///
///     fn run(&mut self, handle: &mut u64, param: i32) {
///         for i in 0..param as u64 {
///             *handle = std::hint::black_box(*handle + i);
///         }
///     }
///
///     fn checksum(&mut self, handle: &u64, _param: i32) -> i32 {
///         *handle as i32
///     }
/// }
///
/// let config = Config::quick().param(100);
/// let measurement = Session::new(Count, config).unwrap().measure().unwrap();
/// assert!(measurement.retained > 0);
/// ```
pub trait Workload {
    /// Per-session state produced by `initialize`.
    type Handle;

    /// Allocate and set up workload state. May be expensive.
    fn initialize(&mut self, param: i32) -> Self::Handle;

    /// Reset per-iteration mutable state. Excluded from the timed window.
    fn prepare(&mut self, handle: &mut Self::Handle, param: i32);

    /// The timed body.
    fn run(&mut self, handle: &mut Self::Handle, param: i32);

    /// Deterministic summary of the current workload state.
    fn checksum(&mut self, handle: &Self::Handle, param: i32) -> i32;
}

impl<W: Workload + ?Sized> Workload for Box<W> {
    type Handle = W::Handle;

    fn initialize(&mut self, param: i32) -> Self::Handle {
        (**self).initialize(param)
    }

    fn prepare(&mut self, handle: &mut Self::Handle, param: i32) {
        (**self).prepare(handle, param)
    }

    #[inline]
    fn run(&mut self, handle: &mut Self::Handle, param: i32) {
        (**self).run(handle, param)
    }

    fn checksum(&mut self, handle: &Self::Handle, param: i32) -> i32 {
        (**self).checksum(handle, param)
    }
}
