//! Frame scheduler: memoryless probabilistic decimation.
//!
//! Hand trackers in the browser push frames as fast as
//! `requestAnimationFrame` allows.  Rather than queueing (which adds
//! latency) the scheduler flips a biased coin per frame and drops the
//! losers.  There is no state between frames and no token bucket: each
//! frame is kept with probability `keep_rate / 100` regardless of history.

use rand::Rng;

/// Default keep rate in percent.
pub const DEFAULT_KEEP_RATE_PERCENT: u8 = 90;

/// Source of uniform draws in `[0, 1)`.
///
/// Production code uses [`ThreadRandom`]; tests inject fixed sequences.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

/// Draws from the thread-local `rand` generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Decides per frame whether it enters the pipeline.
pub struct FrameScheduler {
    keep_probability: f64,
    source: Box<dyn RandomSource>,
}

impl FrameScheduler {
    /// Creates a scheduler keeping `keep_rate_percent`% of frames.
    ///
    /// Values above 100 are treated as 100.
    pub fn new(keep_rate_percent: u8) -> Self {
        Self::with_source(keep_rate_percent, Box::new(ThreadRandom))
    }

    /// Creates a scheduler with an explicit random source.
    pub fn with_source(keep_rate_percent: u8, source: Box<dyn RandomSource>) -> Self {
        Self {
            keep_probability: f64::from(keep_rate_percent.min(100)) / 100.0,
            source,
        }
    }

    /// Probability in `[0, 1]` that a frame is processed.
    pub fn keep_probability(&self) -> f64 {
        self.keep_probability
    }

    /// Draws once and returns `true` if this frame should be processed.
    pub fn should_process(&self) -> bool {
        self.source.next_unit() <= self.keep_probability
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_KEEP_RATE_PERCENT)
    }
}

impl std::fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("keep_probability", &self.keep_probability)
            .finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
