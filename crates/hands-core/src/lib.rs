//! # hands-core
//!
//! Signal pipeline that turns hand-landmark frames into MIDI control values.
//!
//! This crate is used by the `hands-bridge` WebSocket service.  It has zero
//! dependencies on sockets, async runtimes, or MIDI backends, so every stage
//! can be unit tested with plain synthetic data.
//!
//! # Pipeline overview
//!
//! ```text
//! FrameScheduler ──► reduce() ──► SmoothingBank ──► linlin / unit_to_cc ──► LastSentState
//!   (decimate)      (geometry)    (moving avg)        (range mapping)        (edge trigger)
//! ```
//!
//! - **`domain`** – Landmarks, handedness, the three per-hand features, and
//!   the six control channels they map onto.
//!
//! - **`signal`** – Per-frame processing: frame decimation, moving-average
//!   smoothing, range mapping, and the [`SignalChain`] that strings them
//!   together for one hand.
//!
//! - **`control`** – The output side: the last-sent latch that suppresses
//!   repeated values, and the [`ControlSink`] abstraction over MIDI outputs.

pub mod control;
pub mod domain;
pub mod signal;

pub use control::{
    ControlChange, ControlOutputRegistry, ControlSink, LastSentState, OutputError,
};
pub use domain::{
    reduce, Channel, Feature, GeometryError, Hand, HandFeatures, HandObservation, Landmark,
    CHANNEL_COUNT, HAND_LANDMARK_COUNT,
};
pub use signal::{
    linlin, unit_to_cc, FrameScheduler, HandControl, MovingAverage, RandomSource, SignalChain,
    SmoothingBank, SpreadRange,
};
