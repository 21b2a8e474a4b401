use std::time::Duration;

use crate::error::{Error, Result};
use crate::limit::DEFAULT_GRANULARITY_MS;
use crate::timer::Timer;

/// Budget applied when the caller does not supply one.
pub(crate) const DEFAULT_BUDGET_MS: f64 = 500.0;

/// First trial duration. Doubled until the OS honors a trial.
const INITIAL_TRIAL_MS: f64 = 0.125;

/// Longest trial worth probing; sleeps this coarse are beyond any
/// mainstream scheduler quantum.
const MAX_TRIAL_MS: f64 = 16.0;

/// A trial counts as honored only if this many consecutive sleeps of that
/// duration come back on time.
const SAMPLES_PER_TRIAL: u32 = 3;

/// A sleep that comes back within this factor of the request was honored;
/// beyond it the OS rounded up to a larger quantum.
const OVERSHOOT_FACTOR: f64 = 2.0;

/// Measures the smallest sleep duration the host reliably honors.
///
/// Requests sleeps of doubling length starting at [`INITIAL_TRIAL_MS`] and
/// compares each actual elapsed time against the request. The first trial
/// whose samples all return within [`OVERSHOOT_FACTOR`] of the request is
/// the granularity. The whole procedure stays inside `max_duration_ms` of
/// wall time: when the budget cannot cover another sample, the smallest
/// sleep actually observed so far is returned instead of an error.
pub(crate) fn calibrate(max_duration_ms: f64) -> Result<f64> {
    if max_duration_ms <= 0.0 || !max_duration_ms.is_finite() {
        return Err(Error::InvalidArgument(
            "calibration budget must be a positive duration",
        ));
    }

    let start = Timer::now();
    let mut best_observed = f64::INFINITY;

    let mut trial_ms = INITIAL_TRIAL_MS;
    while trial_ms <= MAX_TRIAL_MS {
        let mut honored = true;
        for _ in 0..SAMPLES_PER_TRIAL {
            // A worst-case sample takes trial * OVERSHOOT_FACTOR; stop
            // while that still fits in the budget.
            let spent = Timer::now().millis_since(&start);
            if spent + trial_ms * OVERSHOOT_FACTOR > max_duration_ms {
                return Ok(budget_exhausted(best_observed, spent));
            }

            let before = Timer::now();
            std::thread::sleep(Duration::from_secs_f64(trial_ms / 1000.0));
            let actual_ms = Timer::now().millis_since(&before);

            best_observed = best_observed.min(actual_ms);
            if actual_ms > trial_ms * OVERSHOOT_FACTOR {
                honored = false;
                break;
            }
        }
        if honored {
            log::debug!(
                "calibrated sleep granularity to {trial_ms}ms in {:.1}ms",
                Timer::now().millis_since(&start)
            );
            return Ok(trial_ms);
        }
        trial_ms *= 2.0;
    }

    // Even the coarsest trial was rounded up. The smallest sleep the OS
    // actually produced is the closest thing to its quantum we have.
    log::debug!("no trial honored, using smallest observed sleep {best_observed:.3}ms");
    Ok(best_observed)
}

fn budget_exhausted(best_observed: f64, spent_ms: f64) -> f64 {
    if best_observed.is_finite() {
        log::warn!(
            "calibration budget exhausted after {spent_ms:.1}ms, \
             keeping best estimate {best_observed:.3}ms"
        );
        best_observed
    } else {
        log::warn!("calibration budget too small for any sample, keeping default");
        DEFAULT_GRANULARITY_MS
    }
}
