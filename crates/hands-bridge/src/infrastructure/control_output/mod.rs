//! Control output backends.
//!
//! - [`midi`] binds every MIDI output port the OS exposes (via `midir`).
//! - [`recording`] is an in-memory sink for tests that need to observe
//!   exactly what reached the device.

pub mod midi;
pub mod recording;

pub use midi::{open_registry, MidirSink};
pub use recording::RecordingSink;
