//! hands-bridge library crate.
//!
//! Accepts hand-landmark frames from a browser over WebSocket, runs them
//! through the `hands-core` pipeline, and turns hand movement into MIDI
//! Control Change messages while echoing the current values back to the
//! page.
//!
//! # Architecture
//!
//! ```text
//! Browser (JSON over WebSocket)
//!         ↕
//! [hands-bridge]
//!   ├── domain/           Pure types: JSON messages, BridgeConfig
//!   ├── application/      Pipeline context, control emitter, session registry
//!   └── infrastructure/
//!         ├── ws_server/       WebSocket accept loop (tokio-tungstenite)
//!         ├── control_output/  MIDI output ports (midir)
//!         └── config_file/     Optional TOML configuration
//!         ↓
//! MIDI output port (Control Change, controllers 0-5)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async.
//! - `application` depends on `domain` and `hands-core` only.
//! - `infrastructure` depends on all other layers plus `tokio`,
//!   `tungstenite`, and `midir`.

/// Domain layer: pure types (no I/O).
pub mod domain;

/// Application layer: per-frame orchestration and connection state.
pub mod application;

/// Infrastructure layer: WebSocket server, MIDI outputs, config file.
pub mod infrastructure;
