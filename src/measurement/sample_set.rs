//! Bounded best-k sample store.
//!
//! Keeps the `k` smallest cycle counts seen so far in ascending order.
//! High-latency outliers (interrupts, preemption) never displace a smaller
//! sample once the set is full, so the retained window converges on the
//! noise floor of the measured code.

/// Fixed-capacity ascending store of the smallest samples seen.
///
/// Invariants, held after every [`insert`](Self::insert):
/// - `len() <= capacity()`
/// - samples are sorted ascending
/// - once full, only values strictly below the current maximum are admitted
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    values: Vec<u64>,
    capacity: usize,
    epsilon: f64,
    attempts: usize,
}

impl SampleSet {
    /// Create an empty set retaining `capacity` samples, converging when the
    /// retained spread is within `epsilon`.
    ///
    /// A zero capacity is bumped to 1.
    pub fn new(capacity: usize, epsilon: f64) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: Vec::with_capacity(capacity),
            capacity,
            epsilon,
            attempts: 0,
        }
    }

    /// Offer a sample and report whether the set has converged.
    ///
    /// The attempt counter increments whether or not the sample is admitted.
    pub fn insert(&mut self, cycles: u64) -> bool {
        self.attempts += 1;

        let mut pos = if self.values.len() < self.capacity {
            self.values.push(cycles);
            self.values.len() - 1
        } else {
            let last = self.capacity - 1;
            if cycles >= self.values[last] {
                return self.is_converged();
            }
            self.values[last] = cycles;
            last
        };

        // Insertion sort: the prefix is already ascending.
        while pos > 0 && self.values[pos - 1] > self.values[pos] {
            self.values.swap(pos - 1, pos);
            pos -= 1;
        }

        self.is_converged()
    }

    /// Full and `(1 + epsilon) * min >= max`.
    pub fn is_converged(&self) -> bool {
        match (self.min(), self.max()) {
            (Some(min), Some(max)) if self.is_full() => {
                (1.0 + self.epsilon) * min as f64 >= max as f64
            }
            _ => false,
        }
    }

    /// Integer mean of the retained samples, `None` when empty.
    ///
    /// Divides by the number of samples actually held, which is less than
    /// the capacity when fewer samples were offered.
    pub fn mean(&self) -> Option<u64> {
        if self.values.is_empty() {
            return None;
        }
        let sum: u128 = self.values.iter().map(|&v| v as u128).sum();
        Some((sum / self.values.len() as u128) as u64)
    }

    /// Smallest retained sample.
    pub fn min(&self) -> Option<u64> {
        self.values.first().copied()
    }

    /// Largest retained sample.
    pub fn max(&self) -> Option<u64> {
        self.values.last().copied()
    }

    /// Retained samples in ascending order.
    pub fn as_slice(&self) -> &[u64] {
        &self.values
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been admitted.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// True when `len() == capacity()`.
    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Maximum number of retained samples.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Convergence tolerance.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Every sample ever offered, admitted or not.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(k: usize, values: &[u64]) -> SampleSet {
        let mut set = SampleSet::new(k, 0.005);
        for &v in values {
            set.insert(v);
        }
        set
    }

    #[test]
    fn test_insert_keeps_ascending() {
        let set = filled(5, &[50, 10, 40, 20, 30]);
        assert_eq!(set.as_slice(), &[10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_full_set_replaces_maximum() {
        let mut set = filled(3, &[30, 10, 20]);
        set.insert(15);
        assert_eq!(set.as_slice(), &[10, 15, 20]);
        assert_eq!(set.attempts(), 4);
    }

    #[test]
    fn test_full_set_rejects_not_smaller() {
        let mut set = filled(3, &[30, 10, 20]);
        set.insert(30);
        set.insert(1000);
        assert_eq!(set.as_slice(), &[10, 20, 30]);
        assert_eq!(set.attempts(), 5);
    }

    #[test]
    fn test_converged_within_tolerance() {
        assert!(filled(3, &[100, 100, 100]).is_converged());
        assert!(!filled(3, &[100, 100, 150]).is_converged());
    }

    #[test]
    fn test_converged_at_exact_bound() {
        let mut set = SampleSet::new(3, 0.25);
        for v in [200, 200, 250] {
            set.insert(v);
        }
        assert!(set.is_converged());

        let mut set = SampleSet::new(3, 0.25);
        for v in [200, 200, 251] {
            set.insert(v);
        }
        assert!(!set.is_converged());
    }

    #[test]
    fn test_not_converged_until_full() {
        let mut set = SampleSet::new(3, 0.005);
        assert!(!set.insert(100));
        assert!(!set.insert(100));
        assert!(set.insert(100));
    }

    #[test]
    fn test_mean_truncates() {
        assert_eq!(filled(3, &[10, 20, 30]).mean(), Some(20));
        assert_eq!(filled(3, &[10, 10, 11]).mean(), Some(10));
    }

    #[test]
    fn test_mean_of_partial_set() {
        let set = filled(200, &[10, 30]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.mean(), Some(20));
        assert_eq!(SampleSet::new(200, 0.005).mean(), None);
    }

    #[test]
    fn test_mean_does_not_overflow() {
        let set = filled(3, &[u64::MAX, u64::MAX, u64::MAX]);
        assert_eq!(set.mean(), Some(u64::MAX));
    }

    #[test]
    fn test_zero_capacity_holds_one() {
        let mut set = SampleSet::new(0, 0.005);
        assert_eq!(set.capacity(), 1);
        assert!(set.insert(300));
        assert!(set.insert(200));
        // a single sample is always within tolerance of itself
        assert!(set.insert(500));
        assert_eq!(set.as_slice(), &[200]);
        assert_eq!(set.attempts(), 3);
    }
}
