//! Moving-average smoothing.
//!
//! Hand-tracking models jitter by a few pixels from frame to frame.  Feeding
//! that straight into a MIDI controller makes knobs flutter, so every
//! (hand, feature) channel passes through its own fixed-size moving average.
//!
//! # Thread safety
//!
//! [`SmoothingBank`] keeps one `Mutex` per channel rather than one for the
//! whole bank.  Two frames updating the left hand's X and the right hand's
//! spread never contend; two frames updating the *same* window are
//! serialized so samples are never lost or torn.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use crate::domain::{Channel, CHANNEL_COUNT};

/// Default number of samples per window.
pub const DEFAULT_WINDOW: usize = 10;

/// A bounded FIFO of recent samples and their arithmetic mean.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    capacity: usize,
    samples: VecDeque<f64>,
}

impl MovingAverage {
    /// Creates an empty window holding at most `capacity` samples.
    ///
    /// A capacity of 0 is treated as 1; configuration validation rejects 0
    /// before it gets here.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends `sample`, evicting the oldest one first if the window is
    /// full, and returns the new average.
    pub fn push(&mut self, sample: f64) -> f64 {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
        self.mean()
    }

    /// Current average, or `None` if no sample has been pushed yet.
    pub fn average(&self) -> Option<f64> {
        (!self.samples.is_empty()).then(|| self.mean())
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // Recomputed from the held samples so no floating-point drift builds
    // up over a long session.  The window is small.
    fn mean(&self) -> f64 {
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }
}

/// The six smoothing windows, one per [`Channel`].
///
/// Constructed once with a fixed capacity and shared (behind an `Arc`) by
/// every connection and every hand.
#[derive(Debug)]
pub struct SmoothingBank {
    capacity: usize,
    windows: [Mutex<MovingAverage>; CHANNEL_COUNT],
}

impl SmoothingBank {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            windows: std::array::from_fn(|_| Mutex::new(MovingAverage::new(capacity))),
        }
    }

    /// Adds a raw sample to `channel`'s window and returns the smoothed value.
    pub fn add(&self, channel: Channel, raw: f64) -> f64 {
        self.window(channel).push(raw)
    }

    /// Reads `channel`'s current average without adding a sample.
    pub fn average(&self, channel: Channel) -> Option<f64> {
        self.window(channel).average()
    }

    /// Window capacity shared by all channels.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn window(&self, channel: Channel) -> std::sync::MutexGuard<'_, MovingAverage> {
        // A panic while holding the lock cannot leave a VecDeque of f64 in
        // a broken state, so a poisoned lock is still safe to use.
        self.windows[channel.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SmoothingBank {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
