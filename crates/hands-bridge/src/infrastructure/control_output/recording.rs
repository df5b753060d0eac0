//! In-memory control output for testing.
//!
//! Records every [`ControlChange`] it receives so tests can assert on what
//! would have reached a MIDI device, without a MIDI backend.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use hands_core::{ControlChange, ControlSink, OutputError};

/// A [`ControlSink`] that stores messages instead of sending them.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<ControlChange>>,
    fail: AtomicBool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `send` fail with [`OutputError::Closed`].
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::Relaxed);
    }

    /// All messages accepted so far, in arrival order.
    pub fn sent(&self) -> Vec<ControlChange> {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Messages accepted for one controller number.
    pub fn sent_on(&self, controller: u8) -> Vec<ControlChange> {
        self.sent()
            .into_iter()
            .filter(|m| m.controller == controller)
            .collect()
    }
}

impl ControlSink for RecordingSink {
    fn send(&self, message: ControlChange) -> Result<(), OutputError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(OutputError::Closed("recording".to_string()));
        }
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).push(message);
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
