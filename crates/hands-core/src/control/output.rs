//! Control output abstraction and device registry.
//!
//! The registry is filled once at startup (one entry per MIDI output port
//! that could be opened) and is read-only afterwards, so lookups need no
//! lock.  The MIDI backend lives in `hands-bridge`; this crate only knows
//! the [`ControlSink`] trait.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

/// MIDI status nibble for a Control Change message.
pub const CONTROL_CHANGE_STATUS: u8 = 0xB0;

/// Errors reported by a control output device.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The backend refused or failed to deliver the message.
    #[error("control output '{device}' failed to send: {reason}")]
    Send { device: String, reason: String },

    /// The device has been closed.
    #[error("control output '{0}' is closed")]
    Closed(String),
}

/// One MIDI Control Change message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlChange {
    /// MIDI channel, 0-based (`0..=15`).
    pub channel: u8,
    /// Controller number (`0..=127`).
    pub controller: u8,
    /// Controller value (`0..=127`).
    pub value: u8,
}

impl ControlChange {
    pub fn new(channel: u8, controller: u8, value: u8) -> Self {
        Self {
            channel,
            controller,
            value,
        }
    }

    /// Encodes the message as the three MIDI wire bytes.
    ///
    /// Out-of-range fields are masked rather than rejected so a bad value
    /// can never produce a status byte in a data position.
    pub fn to_bytes(self) -> [u8; 3] {
        [
            CONTROL_CHANGE_STATUS | (self.channel & 0x0F),
            self.controller & 0x7F,
            self.value & 0x7F,
        ]
    }
}

/// A device that accepts control change messages.
///
/// Implementations must be shareable across the pipeline tasks; any
/// interior locking is the implementation's business.
#[cfg_attr(test, mockall::automock)]
pub trait ControlSink: Send + Sync {
    fn send(&self, message: ControlChange) -> Result<(), OutputError>;
}

/// Device name → open control output.
#[derive(Default, Clone)]
pub struct ControlOutputRegistry {
    outputs: BTreeMap<String, Arc<dyn ControlSink>>,
}

impl ControlOutputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `sink` under `name`, replacing any previous entry.
    pub fn insert(&mut self, name: impl Into<String>, sink: Arc<dyn ControlSink>) {
        self.outputs.insert(name.into(), sink);
    }

    /// Looks up a device by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ControlSink>> {
        self.outputs.get(name)
    }

    /// Device names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.outputs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}

impl std::fmt::Debug for ControlOutputRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.outputs.keys()).finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_change_encodes_status_controller_value() {
        let bytes = ControlChange::new(0, 5, 127).to_bytes();
        assert_eq!(bytes, [0xB0, 5, 127]);
    }

    #[test]
    fn test_control_change_places_channel_in_low_nibble() {
        assert_eq!(ControlChange::new(9, 1, 64).to_bytes()[0], 0xB9);
    }

    #[test]
    fn test_control_change_masks_out_of_range_fields() {
        let bytes = ControlChange::new(0x1F, 0x80, 0xFF).to_bytes();
        assert_eq!(bytes, [0xBF, 0x00, 0x7F]);
    }

    #[test]
    fn test_registry_lookup_is_exact_match() {
        let mut registry = ControlOutputRegistry::new();
        registry.insert("IAC Driver Bus 1", Arc::new(MockControlSink::new()));

        assert!(registry.get("IAC Driver Bus 1").is_some());
        assert!(registry.get("iac driver bus 1").is_none());
        assert!(registry.get("").is_none());
    }

    #[test]
    fn test_registry_names_are_sorted() {
        let mut registry = ControlOutputRegistry::new();
        registry.insert("b", Arc::new(MockControlSink::new()));
        registry.insert("a", Arc::new(MockControlSink::new()));

        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_mock_sink_receives_message() {
        let mut sink = MockControlSink::new();
        sink.expect_send()
            .withf(|m| m.controller == 2 && m.value == 10)
            .times(1)
            .returning(|_| Ok(()));

        sink.send(ControlChange::new(0, 2, 10)).unwrap();
    }
}
