//! Domain types for hand tracking input and control channel addressing.
//!
//! Everything here is plain data plus pure functions.  No locks, no I/O.

pub mod channel;
pub mod geometry;
pub mod landmarks;

pub use channel::{Channel, Feature, CHANNEL_COUNT};
pub use geometry::{reduce, spread_ratio, GeometryError, HandFeatures};
pub use landmarks::{
    Hand, HandObservation, Landmark, HAND_LANDMARK_COUNT, MIDDLE_FINGER_TIP, PINKY_MCP, WRIST,
};
