//! Application layer for hands-bridge.
//!
//! Orchestrates the hands-core pipeline for incoming frames: it knows *what*
//! to do with a frame, but leaves sockets and MIDI ports to the
//! infrastructure layer.
//!
//! # Responsibilities
//!
//! - Running each hand through smoothing and range mapping
//!   ([`PipelineContext`])
//! - Edge-triggered dispatch to the selected control output
//!   ([`ControlEmitter`])
//! - Tracking open connections and their selected output
//!   ([`SessionRegistry`])

pub mod control_emitter;
pub mod pipeline;
pub mod session;

pub use control_emitter::{ControlEmitter, Dispatch};
pub use pipeline::{PipelineContext, PipelineError};
pub use session::{Session, SessionInfo, SessionRegistry};
