//! Control channel addressing.
//!
//! Each hand yields three features, and each (hand, feature) pair owns one
//! smoothing window and one MIDI controller number:
//!
//! | Hand  | Feature   | Channel / CC |
//! |-------|-----------|--------------|
//! | Left  | PositionX | 0            |
//! | Left  | PositionY | 1            |
//! | Left  | Spread    | 2            |
//! | Right | PositionX | 3            |
//! | Right | PositionY | 4            |
//! | Right | Spread    | 5            |

use std::fmt;

use super::landmarks::Hand;

/// Total number of logical control channels (2 hands × 3 features).
pub const CHANNEL_COUNT: usize = 6;

/// One of the three scalar features extracted from a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Mean x coordinate of all landmarks.
    PositionX,
    /// Mean y coordinate of all landmarks (inverted before CC mapping).
    PositionY,
    /// Fingertip-to-wrist / pinky-base-to-wrist distance ratio.
    Spread,
}

impl Feature {
    /// All features, in channel order.
    pub const ALL: [Feature; 3] = [Feature::PositionX, Feature::PositionY, Feature::Spread];

    /// Offset of this feature within its hand's channel block.
    pub fn index(self) -> usize {
        match self {
            Feature::PositionX => 0,
            Feature::PositionY => 1,
            Feature::Spread => 2,
        }
    }

    /// Single-letter tag used in display summaries (`x`, `y`, `o` for openness).
    pub fn tag(self) -> &'static str {
        match self {
            Feature::PositionX => "x",
            Feature::PositionY => "y",
            Feature::Spread => "o",
        }
    }
}

/// A (hand, feature) pair — the key for smoothing windows and the
/// last-sent latch, and the source of the MIDI controller number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    pub hand: Hand,
    pub feature: Feature,
}

impl Channel {
    /// All six channels in index order.
    pub const ALL: [Channel; CHANNEL_COUNT] = [
        Channel::new(Hand::Left, Feature::PositionX),
        Channel::new(Hand::Left, Feature::PositionY),
        Channel::new(Hand::Left, Feature::Spread),
        Channel::new(Hand::Right, Feature::PositionX),
        Channel::new(Hand::Right, Feature::PositionY),
        Channel::new(Hand::Right, Feature::Spread),
    ];

    pub const fn new(hand: Hand, feature: Feature) -> Self {
        Self { hand, feature }
    }

    /// Dense index in `0..CHANNEL_COUNT`: `hand * 3 + feature`.
    pub fn index(self) -> usize {
        self.hand.index() * Feature::ALL.len() + self.feature.index()
    }

    /// MIDI controller number for this channel.  Always in `0..=5`.
    pub fn controller(self) -> u8 {
        // index() < CHANNEL_COUNT, so the cast cannot truncate.
        self.index() as u8
    }

    /// The three channels belonging to `hand`, in feature order.
    pub fn for_hand(hand: Hand) -> [Channel; 3] {
        Feature::ALL.map(|feature| Channel::new(hand, feature))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} (cc {})", self.hand.key(), self.feature.tag(), self.controller())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_indices_are_dense_and_ordered() {
        for (expected, channel) in Channel::ALL.iter().enumerate() {
            assert_eq!(channel.index(), expected);
        }
    }

    #[test]
    fn test_right_hand_channels_start_at_three() {
        let channels = Channel::for_hand(Hand::Right);
        let controllers: Vec<u8> = channels.iter().map(|c| c.controller()).collect();
        assert_eq!(controllers, vec![3, 4, 5]);
    }

    #[test]
    fn test_channel_display_names_hand_feature_and_cc() {
        let channel = Channel::new(Hand::Left, Feature::Spread);
        assert_eq!(channel.to_string(), "left/o (cc 2)");
    }
}
