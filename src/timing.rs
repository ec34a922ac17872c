//! Clocks and timing samples
//!
//! Timings are taken through the [`Clock`] trait so tests can swap the
//! monotonic clock for a [`FakeClock`] and assert on where the measurement
//! starts and stops.

use std::cell::Cell;
use std::fmt;
use std::time::{Duration, Instant};

use crate::flat::Strategy;
use crate::matrix::{Fill, StorageKind};
use crate::scalar::Precision;

/// Source of monotonic timestamps
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall-clock [`Clock`] backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic [`Clock`] that advances by a fixed step on every reading
#[derive(Debug, Default)]
pub struct FakeClock {
    step: Duration,
    readings: Cell<u32>,
}

impl FakeClock {
    /// Creates a clock whose `n`-th reading is `n * step`
    pub fn new(step: Duration) -> Self {
        Self {
            step,
            readings: Cell::new(0),
        }
    }

    /// How many times the clock has been read
    pub fn readings(&self) -> u32 {
        self.readings.get()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Duration {
        let n = self.readings.get();
        self.readings.set(n + 1);
        self.step * n
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Runs `f`, returning its result and the time between the two clock readings
/// that bracket it
pub fn timed<C, R, F>(clock: &C, f: F) -> (R, Duration)
where
    C: Clock + ?Sized,
    F: FnOnce() -> R,
{
    let start = clock.now();
    let result = f();
    let end = clock.now();
    (result, end.saturating_sub(start))
}

/// The multiplication that produced a timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Generic product on a growable backend
    Product(StorageKind),
    /// Flat-buffer strategy
    Flat(Strategy),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Product(kind) => write!(f, "{}", kind),
            Operation::Flat(strategy) => write!(f, "Flat/{}", strategy),
        }
    }
}

/// One measured multiplication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingSample {
    pub order: usize,
    pub fill: Fill,
    pub operation: Operation,
    pub precision: Precision,
    pub elapsed: Duration,
}

impl TimingSample {
    /// Elapsed time in whole milliseconds
    pub fn millis(&self) -> u128 {
        self.elapsed.as_millis()
    }

    /// The report line for this sample
    pub fn report_line(&self) -> String {
        format!(
            "time to run a {m} x {m} matrix({} {}) multiplication of {}: {} ms",
            self.fill,
            self.operation,
            self.precision,
            self.millis(),
            m = self.order,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_clock_steps() {
        let clock = FakeClock::new(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_millis(5));
        assert_eq!(clock.readings(), 2);
    }

    #[test]
    fn test_timed_reads_clock_twice() {
        let clock = FakeClock::new(Duration::from_millis(3));
        let (value, elapsed) = timed(&clock, || 40 + 2);

        assert_eq!(value, 42);
        assert_eq!(elapsed, Duration::from_millis(3));
        assert_eq!(clock.readings(), 2);
    }

    #[test]
    fn test_monotonic_clock_does_not_go_back() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_report_line() {
        let sample = TimingSample {
            order: 10,
            fill: Fill::Random,
            operation: Operation::Product(StorageKind::SparseMap),
            precision: Precision::Double,
            elapsed: Duration::from_micros(12_900),
        };

        assert_eq!(
            sample.report_line(),
            "time to run a 10 x 10 matrix(random Vector/Map) multiplication of double: 12 ms"
        );

        let flat = TimingSample {
            operation: Operation::Flat(Strategy::Accumulator),
            precision: Precision::Single,
            ..sample
        };
        assert_eq!(
            flat.report_line(),
            "time to run a 10 x 10 matrix(random Flat/accumulator) multiplication of float: 12 ms"
        );
    }
}
