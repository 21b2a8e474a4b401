use std::time::Duration;

use crate::error::{Error, Result};

// Timer abstraction layer. Backend precedence: quanta > minstant > std,
// so enabling several features at once still yields exactly one backend.
#[cfg(not(any(feature = "quanta", feature = "minstant")))]
mod backend {
    use std::time::{Duration, Instant};

    pub const BACKEND: &str = "std::time::Instant";

    #[derive(Debug, Clone, Copy)]
    pub struct Timer {
        instant: Instant,
    }

    impl Timer {
        pub fn now() -> Self {
            Self {
                instant: Instant::now(),
            }
        }

        /// Saturates to zero if `earlier` is actually later, so a
        /// non-monotonic anomaly reads as no elapsed time.
        pub fn duration_since(&self, earlier: &Self) -> Duration {
            self.instant.saturating_duration_since(earlier.instant)
        }
    }
}

#[cfg(feature = "quanta")]
mod backend {
    use std::sync::OnceLock;
    use std::time::Duration;

    pub const BACKEND: &str = "quanta (TSC)";

    // quanta::Clock uses TSC (Time Stamp Counter) on x86/x86_64
    // which provides nanosecond-level precision
    fn clock() -> &'static quanta::Clock {
        static CLOCK: OnceLock<quanta::Clock> = OnceLock::new();
        CLOCK.get_or_init(quanta::Clock::new)
    }

    #[derive(Debug, Clone, Copy)]
    pub struct Timer {
        ticks: u64,
    }

    impl Timer {
        pub fn now() -> Self {
            Self {
                ticks: clock().raw(),
            }
        }

        pub fn duration_since(&self, earlier: &Self) -> Duration {
            // delta() saturates when the counters are out of order
            clock().delta(earlier.ticks, self.ticks)
        }
    }
}

#[cfg(all(feature = "minstant", not(feature = "quanta")))]
mod backend {
    use std::time::Duration;

    pub const BACKEND: &str = "minstant (TSC with fallback)";

    // minstant uses TSC on x86/x86_64 with automatic calibration
    // Falls back to std::time on other platforms
    #[derive(Debug, Clone, Copy)]
    pub struct Timer {
        instant: minstant::Instant,
    }

    impl Timer {
        pub fn now() -> Self {
            Self {
                instant: minstant::Instant::now(),
            }
        }

        pub fn duration_since(&self, earlier: &Self) -> Duration {
            self.instant.duration_since(earlier.instant)
        }
    }
}

pub use backend::Timer;

pub(crate) use backend::BACKEND;

impl Timer {
    /// Elapsed time since `earlier` in fractional milliseconds, never negative.
    pub fn millis_since(&self, earlier: &Self) -> f64 {
        self.duration_since(earlier).as_secs_f64() * 1000.0
    }
}

/// Checks that the time source actually advances. A source that is stuck
/// (or reads zero forever on an unsupported platform) makes every pacing
/// decision wrong, so construction refuses it up front.
pub(crate) fn probe() -> Result<()> {
    let start = Timer::now();
    for _ in 0..1_000_000 {
        if Timer::now().duration_since(&start) > Duration::ZERO {
            return Ok(());
        }
        std::hint::spin_loop();
    }
    Err(Error::ClockUnavailable)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_never_run_backwards() {
        let a = Timer::now();
        let b = Timer::now();
        assert!(b.millis_since(&a) >= 0.0);
        // reversed order saturates instead of going negative
        assert_eq!(a.duration_since(&b), Duration::ZERO);
    }

    #[test]
    fn millis_track_real_sleeps() {
        let start = Timer::now();
        std::thread::sleep(Duration::from_millis(20));
        let elapsed = Timer::now().millis_since(&start);
        assert!(elapsed >= 20.0, "slept 20ms but measured {elapsed}ms");
        assert!(elapsed < 200.0, "measured wildly long sleep: {elapsed}ms");
    }

    #[test]
    fn probe_accepts_a_live_source() {
        assert!(probe().is_ok());
    }
}
