use thiserror::Error;

/// Errors surfaced by the pacing engine.
///
/// Per-frame variance (slow frames, OS sleep overshoot, a cleared target) is
/// never an error; only misuse and a missing time source are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A caller-supplied value was out of range, e.g. a non-positive target
    /// framerate or calibration budget.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The monotonic time source could not be read. Fatal at construction;
    /// the engine never degrades to a non-monotonic clock.
    #[error("monotonic time source unavailable")]
    ClockUnavailable,
}

pub type Result<T> = std::result::Result<T, Error>;
