//! Last-sent latch for edge-triggered control output.
//!
//! Each of the six channels is a two-value latch: the value last dispatched
//! and the value just computed.  A message goes out only when they differ.
//!
//! # Locking
//!
//! All six slots sit behind one `Mutex`.  The emitter takes the lock once
//! per hand, compares and updates that hand's three slots, writes to the
//! output device, and releases it.  Holding the lock across the device
//! write keeps the device and the latch in agreement when two frames race:
//! whichever frame records last is also the one whose bytes arrive last.
//! Network writes never happen under this lock.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::{Channel, CHANNEL_COUNT};

/// The last value dispatched on each channel.
///
/// Slots start empty, so the first value computed for a channel is always
/// dispatched.
#[derive(Debug, Default)]
pub struct LastSentState {
    slots: Mutex<[Option<u8>; CHANNEL_COUNT]>,
}

impl LastSentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the latch for a compare-and-dispatch step.
    pub fn lock(&self) -> LatchGuard<'_> {
        LatchGuard {
            slots: self.slots.lock().unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// The value last recorded for `channel`, if any.
    pub fn last(&self, channel: Channel) -> Option<u8> {
        self.lock().last(channel)
    }

    /// Records `value` on `channel`; returns `true` if it differs from the
    /// previous value.  Convenience for a single-channel step.
    pub fn record(&self, channel: Channel, value: u8) -> bool {
        self.lock().record(channel, value)
    }
}

/// Exclusive access to the latch for the duration of one dispatch step.
pub struct LatchGuard<'a> {
    slots: MutexGuard<'a, [Option<u8>; CHANNEL_COUNT]>,
}

impl LatchGuard<'_> {
    pub fn last(&self, channel: Channel) -> Option<u8> {
        self.slots[channel.index()]
    }

    /// Stores `value` for `channel`.  Returns `true` when the stored value
    /// changed, i.e. when a control message should be sent.
    pub fn record(&mut self, channel: Channel, value: u8) -> bool {
        let slot = &mut self.slots[channel.index()];
        if *slot == Some(value) {
            false
        } else {
            *slot = Some(value);
            true
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
