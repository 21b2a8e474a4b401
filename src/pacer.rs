use std::fmt;

use crate::calibrate;
use crate::error::{Error, Result};
use crate::limit;
use crate::stats::FrameTimer;
use crate::timer::{self, Timer};
use crate::INITIAL_FRAMERATE;

/// Timing of one completed cycle, returned by [`FramePacer::tick`].
///
/// When a target is configured the fields include the inserted delay, so
/// they reflect the time that actually passed rather than just the work
/// portion of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickResult {
    /// Milliseconds elapsed since the previous tick, never negative.
    pub elapsed_ms: f64,
    /// The same span in seconds.
    pub elapsed_s: f64,
}

impl TickResult {
    fn from_millis(elapsed_ms: f64) -> Self {
        Self {
            elapsed_ms,
            elapsed_s: elapsed_ms / 1000.0,
        }
    }
}

/// Frame pacing façade: measures the caller's loop rate and optionally caps
/// it by delaying inside [`tick`](Self::tick).
///
/// One instance per loop, owned and threaded through by the caller. All
/// operations run synchronously on the calling thread; `tick` may block for
/// up to the target frametime minus the work time already spent, and
/// `calibrate` for up to its budget. Concurrent use from several threads
/// needs external synchronization, which `&mut self` already enforces in
/// safe code.
pub struct FramePacer {
    frame_timer: FrameTimer,
    target_frametime: Option<f64>,
    granularity: f64,
    cooperative: bool,
}

impl FramePacer {
    /// Creates a pacer with no target framerate, the default 1ms sleep
    /// granularity and cooperative yielding off.
    ///
    /// Fails with [`Error::ClockUnavailable`] if the monotonic time source
    /// does not advance on this system.
    pub fn new() -> Result<Self> {
        timer::probe()?;
        Ok(Self {
            frame_timer: FrameTimer::new(INITIAL_FRAMERATE),
            target_frametime: None,
            granularity: limit::DEFAULT_GRANULARITY_MS,
            cooperative: false,
        })
    }

    /// Caps the loop at `fps` frames per second.
    ///
    /// # Arguments
    /// * `fps` - target framerate, must be positive and finite.
    pub fn set_target_framerate(&mut self, fps: f64) -> Result<()> {
        if fps <= 0.0 || !fps.is_finite() {
            return Err(Error::InvalidArgument(
                "target framerate must be positive",
            ));
        }
        self.target_frametime = Some(1000.0 / fps);
        Ok(())
    }

    /// Target framerate in frames per second, if limiting is enabled.
    pub fn target_framerate(&self) -> Option<f64> {
        self.target_frametime.map(|ms| 1000.0 / ms)
    }

    /// Caps the loop at one frame per `ms` milliseconds.
    ///
    /// # Arguments
    /// * `ms` - target frametime, must be positive and finite.
    pub fn set_target_frametime(&mut self, ms: f64) -> Result<()> {
        if ms <= 0.0 || !ms.is_finite() {
            return Err(Error::InvalidArgument(
                "target frametime must be positive",
            ));
        }
        self.target_frametime = Some(ms);
        Ok(())
    }

    /// Target frametime in milliseconds, if limiting is enabled.
    pub fn target_frametime(&self) -> Option<f64> {
        self.target_frametime
    }

    /// Disables rate limiting; `tick` reverts to pure measurement and
    /// never blocks. Accumulated statistics are kept.
    pub fn clear_target(&mut self) {
        self.target_frametime = None;
    }

    /// Marks the end of one loop iteration.
    ///
    /// Measures the time spent since the previous tick, inserts whatever
    /// delay the configured target still allows, then re-reads the time
    /// source so the returned [`TickResult`] and the rolling average cover
    /// the full cycle including the delay. The first call only establishes
    /// the measurement baseline and reports zero elapsed time.
    pub fn tick(&mut self) -> TickResult {
        let now = Timer::now();
        let work_ms = match self.frame_timer.elapsed_since_last(&now) {
            Some(ms) => ms,
            None => {
                self.frame_timer.tick(now);
                return TickResult::from_millis(0.0);
            }
        };

        let elapsed_ms = match self.target_frametime {
            Some(target_ms) => {
                let delay_ms = limit::compute_delay(work_ms, target_ms);
                if delay_ms > 0.0 {
                    limit::execute_delay(delay_ms, self.granularity, self.cooperative);
                }
                self.frame_timer.tick(Timer::now())
            }
            None => self.frame_timer.tick(now),
        };
        TickResult::from_millis(elapsed_ms)
    }

    /// Average framerate over the rolling window.
    pub fn framerate(&self) -> f64 {
        self.frame_timer.framerate()
    }

    /// Average frametime in milliseconds over the rolling window.
    pub fn frametime(&self) -> f64 {
        self.frame_timer.frametime()
    }

    /// Measures the host's sleep granularity and adopts it for future
    /// delays. The measured value is also returned.
    ///
    /// # Arguments
    /// * `max_duration_ms` - wall-time budget for the measurement, must be
    ///   positive. [`calibrate_default`](Self::calibrate_default) applies
    ///   the usual 500ms.
    pub fn calibrate(&mut self, max_duration_ms: f64) -> Result<f64> {
        let granularity = calibrate::calibrate(max_duration_ms)?;
        self.granularity = granularity;
        Ok(granularity)
    }

    /// [`calibrate`](Self::calibrate) with the default 500ms budget.
    pub fn calibrate_default(&mut self) -> Result<f64> {
        self.calibrate(calibrate::DEFAULT_BUDGET_MS)
    }

    /// Sets the sleep chunk size in milliseconds. Values below zero clamp
    /// to zero, which makes delays spin instead of sleep.
    pub fn set_granularity(&mut self, ms: f64) {
        self.granularity = ms.max(0.0);
    }

    /// Current sleep granularity in milliseconds.
    pub fn granularity(&self) -> f64 {
        self.granularity
    }

    /// Requests that delays yield the processor at chunk boundaries so
    /// other runnable work may proceed. Best effort only.
    pub fn set_cooperative(&mut self, cooperative: bool) {
        self.cooperative = cooperative;
    }

    /// Whether delays yield cooperatively.
    pub fn cooperative(&self) -> bool {
        self.cooperative
    }

    /// Total number of measured frames since creation.
    pub fn total_frames(&self) -> u64 {
        self.frame_timer.frame_count()
    }

    /// Returns the timer backend being used.
    pub fn timer_backend(&self) -> &'static str {
        timer::BACKEND
    }
}

impl fmt::Display for FramePacer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "avg: {:.2} fps ({:.3}ms); frames: {} [{}]",
            self.framerate(),
            self.frametime(),
            self.total_frames(),
            self.timer_backend()
        )
    }
}
