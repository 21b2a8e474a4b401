use std::time::Duration;

use crate::timer::Timer;

/// Sleep chunk size assumed before any calibration has run.
///
/// Thread sleeps are typically accurate to about a millisecond on desktop
/// OSes; calibration replaces this guess with a measured value.
pub(crate) const DEFAULT_GRANULARITY_MS: f64 = 1.0;

/// Milliseconds of delay needed to stretch a frame that already took
/// `elapsed_ms` out to `target_frametime_ms`.
///
/// Never negative: a frame that ran over budget gets no delay, since
/// limiting only caps the maximum rate and cannot speed a slow loop up.
pub fn compute_delay(elapsed_ms: f64, target_frametime_ms: f64) -> f64 {
    (target_frametime_ms - elapsed_ms).max(0.0)
}

/// Blocks the calling thread for `delay_ms`.
///
/// The wait is deadline-driven: remaining time is re-measured after every
/// chunk so a coarse OS sleep quantum cannot accumulate into overshoot.
/// While more than one `granularity_ms` remains the thread sleeps one
/// granularity at a time; the sub-granularity tail is finished with a spin
/// loop, or with `yield_now` when `cooperative` is set. A zero granularity
/// never sleeps at all and spins the whole delay, trading CPU for precision.
///
/// `cooperative` is a best-effort hint that other runnable work may proceed
/// during the pause; no ordering or fairness guarantee is made.
pub(crate) fn execute_delay(delay_ms: f64, granularity_ms: f64, cooperative: bool) {
    if delay_ms <= 0.0 {
        return;
    }
    let start = Timer::now();
    loop {
        let remaining = delay_ms - Timer::now().millis_since(&start);
        if remaining <= 0.0 {
            break;
        }
        if granularity_ms > 0.0 && remaining > granularity_ms {
            std::thread::sleep(Duration::from_secs_f64(granularity_ms / 1000.0));
            if cooperative {
                std::thread::yield_now();
            }
        } else if cooperative {
            std::thread::yield_now();
        } else {
            std::hint::spin_loop();
        }
    }
}
