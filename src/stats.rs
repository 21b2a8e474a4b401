use crate::timer::Timer;

/// Number of ticks covered by the rolling average.
///
/// Small enough to converge within a handful of cycles after a rate change,
/// large enough to flatten per-frame scheduler jitter.
pub(crate) const AVG_WINDOW: usize = 10;

/// Per-cycle elapsed-time measurement with a fixed-window rolling average.
///
/// The first `tick` stores a baseline and reports zero elapsed time; every
/// later `tick` reports the delta since the previous one (clamped to `>= 0`)
/// and folds it into a circular buffer of the last [`AVG_WINDOW`] frame
/// times. `frametime()` is the mean of the recorded portion of that buffer,
/// seeded from an initial framerate guess so it is well-defined before any
/// frames have been measured.
pub struct FrameTimer {
    last_tick: Option<Timer>,
    samples: [f64; AVG_WINDOW],
    cursor: usize,
    filled: usize,
    avg_frametime: f64,
    frame_count: u64,
}

impl FrameTimer {
    /// Creates a new FrameTimer seeded with the given framerate guess.
    ///
    /// # Arguments
    /// * `frame_rate` - initial frame rate guess, reported until real
    ///   samples replace it. Must be positive.
    pub fn new(frame_rate: f64) -> Self {
        Self {
            last_tick: None,
            samples: [0.0; AVG_WINDOW],
            cursor: 0,
            filled: 0,
            avg_frametime: 1000.0 / frame_rate,
            frame_count: 0,
        }
    }

    /// Elapsed milliseconds between the last committed tick and `now`,
    /// without advancing the baseline. `None` before the first tick.
    pub fn elapsed_since_last(&self, now: &Timer) -> Option<f64> {
        self.last_tick.map(|last| now.millis_since(&last))
    }

    /// Commits one cycle ending at `now` and returns its elapsed
    /// milliseconds. The first call establishes the baseline and returns
    /// `0.0` without touching the average.
    pub fn tick(&mut self, now: Timer) -> f64 {
        let elapsed_ms = match self.last_tick {
            Some(last) => now.millis_since(&last),
            None => {
                self.last_tick = Some(now);
                return 0.0;
            }
        };
        self.last_tick = Some(now);
        self.record(elapsed_ms);
        elapsed_ms
    }

    /// Folds one measured frame time into the rolling average.
    pub(crate) fn record(&mut self, elapsed_ms: f64) {
        let elapsed_ms = elapsed_ms.max(0.0);
        self.samples[self.cursor] = elapsed_ms;
        self.cursor = (self.cursor + 1) % AVG_WINDOW;
        self.filled = (self.filled + 1).min(AVG_WINDOW);
        self.frame_count += 1;

        let sum: f64 = self.samples[..self.filled].iter().sum();
        self.avg_frametime = sum / self.filled as f64;
    }

    /// Average milliseconds per frame over the rolling window.
    pub fn frametime(&self) -> f64 {
        self.avg_frametime
    }

    /// Average frames per second over the rolling window, always the
    /// reciprocal of [`frametime`](Self::frametime).
    pub fn framerate(&self) -> f64 {
        if self.avg_frametime > 0.0 {
            1000.0 / self.avg_frametime
        } else {
            f64::INFINITY
        }
    }

    /// Total number of measured frames (the baseline tick is not counted).
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn first_tick_is_zero_and_keeps_the_seed() {
        let mut ft = FrameTimer::new(100.0);
        assert_relative_eq!(ft.frametime(), 10.0);
        assert_eq!(ft.tick(Timer::now()), 0.0);
        // baseline only: the seeded average must be untouched
        assert_relative_eq!(ft.frametime(), 10.0);
        assert_eq!(ft.frame_count(), 0);
    }

    #[test]
    fn average_converges_within_one_window() {
        let mut ft = FrameTimer::new(100.0);
        for _ in 0..AVG_WINDOW {
            ft.record(25.0);
        }
        assert_relative_eq!(ft.frametime(), 25.0);
        assert_relative_eq!(ft.framerate(), 40.0);
    }

    #[test]
    fn window_forgets_old_samples() {
        let mut ft = FrameTimer::new(60.0);
        for _ in 0..AVG_WINDOW {
            ft.record(100.0);
        }
        for _ in 0..AVG_WINDOW {
            ft.record(20.0);
        }
        assert_relative_eq!(ft.frametime(), 20.0);
    }

    #[test]
    fn negative_measurements_clamp_to_zero() {
        let mut ft = FrameTimer::new(60.0);
        ft.record(-5.0);
        assert_relative_eq!(ft.frametime(), 0.0);
        assert!(ft.framerate().is_infinite());
    }

    #[test]
    fn framerate_is_reciprocal_of_frametime() {
        let mut ft = FrameTimer::new(100.0);
        assert_relative_eq!(ft.framerate(), 1000.0 / ft.frametime());
        for elapsed in [16.6, 33.3, 7.0, 41.2, 5.5] {
            ft.record(elapsed);
            assert_relative_eq!(ft.framerate(), 1000.0 / ft.frametime());
        }
    }

    #[test]
    fn partial_window_averages_recorded_portion() {
        let mut ft = FrameTimer::new(100.0);
        ft.record(10.0);
        ft.record(30.0);
        assert_relative_eq!(ft.frametime(), 20.0);
        assert_eq!(ft.frame_count(), 2);
    }

    #[test]
    fn real_ticks_track_wall_time() {
        let mut ft = FrameTimer::new(100.0);
        ft.tick(Timer::now());
        for _ in 0..AVG_WINDOW {
            std::thread::sleep(std::time::Duration::from_millis(5));
            let elapsed = ft.tick(Timer::now());
            assert!(elapsed >= 5.0);
        }
        // sleeps overshoot, never undershoot
        assert!(ft.frametime() >= 5.0);
        assert!(ft.frametime() < 50.0, "frametime {}ms", ft.frametime());
    }
}
