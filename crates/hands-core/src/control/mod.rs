//! Control output side of the pipeline.
//!
//! - [`LastSentState`] remembers the last value dispatched on each channel
//!   so unchanged values are not re-sent (edge triggering).
//! - [`ControlSink`] abstracts one output device; [`ControlOutputRegistry`]
//!   maps device names to sinks.

pub mod latch;
pub mod output;

pub use latch::{LastSentState, LatchGuard};
pub use output::{ControlChange, ControlOutputRegistry, ControlSink, OutputError};

#[cfg(test)]
pub use output::MockControlSink;
