//! Per-frame signal processing.
//!
//! The stages are independent and individually testable; [`SignalChain`]
//! composes the stateful ones for a single hand.

pub mod chain;
pub mod mapping;
pub mod scheduler;
pub mod smoothing;

pub use chain::{HandControl, SignalChain};
pub use mapping::{linlin, unit_to_cc, SpreadRange, CC_MAX};
pub use scheduler::{FrameScheduler, RandomSource, ThreadRandom, DEFAULT_KEEP_RATE_PERCENT};
pub use smoothing::{MovingAverage, SmoothingBank, DEFAULT_WINDOW};
