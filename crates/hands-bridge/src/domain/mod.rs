//! Domain layer for hands-bridge.
//!
//! Pure types with no I/O: the JSON messages exchanged with the browser and
//! the bridge configuration.  Anything touching sockets, files, or MIDI
//! ports lives in `infrastructure`.

pub mod config;
pub mod messages;

pub use config::{BridgeConfig, ConfigError};
pub use messages::{FrameMessage, Handedness, OutboundMsg};
