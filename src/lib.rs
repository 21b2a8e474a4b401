/*!
The frame_pacer library measures how fast a real-time loop runs and can
cap that rate by inserting a calculated delay each cycle, adapting to the
host system's sleep granularity.

# Features

- default - Uses std::time::Instant
- `quanta` - Uses quanta crate for TSC-based timing
- `minstant` - Uses minstant crate for TSC-based timing with fallback

Add to Cargo.toml:
```toml
[dependencies]
frame_pacer = { version = "*", features = ["quanta"] }
# or
frame_pacer = { version = "*", features = ["minstant"] }
```

# Examples:

Measuring the framerate:
```no_run
use frame_pacer::FramePacer;

pub fn dummy_workload() {
    std::thread::sleep(std::time::Duration::from_millis(10));
}

pub fn main() -> Result<(), frame_pacer::Error> {
    let mut pacer = FramePacer::new()?;

    loop {
        let tick = pacer.tick();

        dummy_workload();

        println!("dt {:.3}ms - {}", tick.elapsed_ms, pacer);
    }
}
```

Capping a loop at 60 fps:
```no_run
use frame_pacer::FramePacer;

pub fn main() -> Result<(), frame_pacer::Error> {
    let mut pacer = FramePacer::new()?;
    pacer.calibrate_default()?;
    pacer.set_target_framerate(60.0)?;

    loop {
        let tick = pacer.tick();

        // per-frame work, paced to 60 fps by tick()
        let _dt = tick.elapsed_s;
    }
}
```
*/

mod calibrate;
mod error;
mod limit;
mod pacer;
mod stats;
mod timer;

pub use error::{Error, Result};
pub use limit::compute_delay;
pub use pacer::{FramePacer, TickResult};
pub use stats::FrameTimer;
pub use timer::Timer;

/// Framerate reported before any frames have been measured.
pub const INITIAL_FRAMERATE: f64 = 100f64;

/// Blocks the calling thread for `ms` milliseconds, independent of any
/// [`FramePacer`] instance.
///
/// Uses the same chunked wait as the pacer with the default 1ms
/// granularity. `cooperative` carries the usual best-effort meaning: the
/// pause may yield the processor to other runnable work, with no ordering
/// or fairness guarantee.
pub fn delay(ms: f64, cooperative: bool) {
    limit::execute_delay(ms, limit::DEFAULT_GRANULARITY_MS, cooperative);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_blocks_for_roughly_the_requested_time() {
        let start = Timer::now();
        delay(15.0, false);
        let elapsed = Timer::now().millis_since(&start);
        assert!(elapsed >= 15.0, "delay(15) returned after {elapsed}ms");
        assert!(elapsed < 100.0, "delay(15) took {elapsed}ms");
    }

    #[test]
    fn cooperative_delay_blocks_too() {
        let start = Timer::now();
        delay(10.0, true);
        assert!(Timer::now().millis_since(&start) >= 10.0);
    }
}
