//! Infrastructure layer for hands-bridge.
//!
//! Handles all I/O: the WebSocket listener, MIDI output ports, and the
//! optional configuration file.
//!
//! # What does NOT belong here?
//!
//! - Signal processing (that is hands-core, driven by the application layer)
//! - Message type definitions (that is the domain layer)
//! - Command-line parsing (that is done in `main.rs`)

pub mod config_file;
pub mod control_output;
pub mod ws_server;

pub use config_file::{load_config, ConfigFileError, FileConfig};
pub use ws_server::{bind, run_server, BridgeServer};
