//! One hand through geometry → smoothing → range mapping.

use tracing::trace;

use crate::domain::{reduce, Channel, Feature, GeometryError, Hand, HandObservation};

use super::mapping::{unit_to_cc, SpreadRange};
use super::smoothing::SmoothingBank;

/// CC values computed for one hand in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandControl {
    pub hand: Hand,
    /// Values for the hand's channels in [`Feature::ALL`] order.
    pub values: [u8; 3],
    /// `false` when the spread was degenerate this frame.  The values are
    /// still fit for display but must not be dispatched to a control output.
    pub dispatchable: bool,
}

impl HandControl {
    /// Pairs each of the hand's channels with its value.
    pub fn channel_values(&self) -> [(Channel, u8); 3] {
        let channels = Channel::for_hand(self.hand);
        [
            (channels[0], self.values[0]),
            (channels[1], self.values[1]),
            (channels[2], self.values[2]),
        ]
    }

    /// Value for a single feature.
    pub fn value(&self, feature: Feature) -> u8 {
        self.values[feature.index()]
    }
}

/// The stateful part of the per-hand pipeline.
///
/// Owns the smoothing windows; shared by every connection through the
/// pipeline context.
#[derive(Debug)]
pub struct SignalChain {
    smoothing: SmoothingBank,
    spread_range: SpreadRange,
}

impl SignalChain {
    pub fn new(window: usize, spread_range: SpreadRange) -> Self {
        Self {
            smoothing: SmoothingBank::new(window),
            spread_range,
        }
    }

    pub fn smoothing(&self) -> &SmoothingBank {
        &self.smoothing
    }

    pub fn spread_range(&self) -> SpreadRange {
        self.spread_range
    }

    /// Runs one observation through the chain.
    ///
    /// Position features always feed their windows.  A degenerate spread
    /// does not: the spread value shown is the window's current average (0
    /// if it has never been fed) and the result is marked not dispatchable.
    ///
    /// # Errors
    ///
    /// Propagates [`GeometryError`] for malformed observations; no window is
    /// touched in that case.
    pub fn process(&self, observation: &HandObservation) -> Result<HandControl, GeometryError> {
        let features = reduce(observation)?;
        let [x_channel, y_channel, spread_channel] = Channel::for_hand(features.hand);

        let x = self.smoothing.add(x_channel, features.mean_x);
        let y = self.smoothing.add(y_channel, features.mean_y);
        let spread = match features.spread {
            Some(raw) => Some(self.smoothing.add(spread_channel, raw)),
            None => {
                trace!(hand = %features.hand, "degenerate spread, holding smoothed value");
                self.smoothing.average(spread_channel)
            }
        };

        // Image y grows downwards; raising the hand should raise the value.
        let values = [
            unit_to_cc(x),
            unit_to_cc(1.0 - y),
            spread
                .map(|s| unit_to_cc(self.spread_range.normalize(s)))
                .unwrap_or(0),
        ];

        Ok(HandControl {
            hand: features.hand,
            values,
            dispatchable: features.spread.is_some(),
        })
    }
}

impl Default for SignalChain {
    fn default() -> Self {
        Self::new(super::smoothing::DEFAULT_WINDOW, SpreadRange::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
