//! Hand landmarks and handedness.
//!
//! The perception front end reports each detected hand as 21 landmarks in
//! the canonical hand-skeleton order:
//!
//! ```text
//!            12
//!        8   |   16
//!        |  11   |   20
//!        7   |  15   |
//!        |  10   |  19
//!  4     6   |  14   |
//!  |     |   9   |  18
//!  3     5 ──┴───13──17
//!   \    |          /
//!    2   |         /
//!     \  |        /
//!      1 |       /
//!       \|      /
//!        0 ─────
//! ```
//!
//! Only three indices matter to the pipeline: the wrist (0), the middle
//! fingertip (12) and the pinky base (17).  Coordinates are normalized to the
//! image frame, typically `[0, 1]` for x and y with y growing downwards.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of landmarks in a complete hand observation.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Landmark index of the wrist.
pub const WRIST: usize = 0;

/// Landmark index of the middle fingertip.
pub const MIDDLE_FINGER_TIP: usize = 12;

/// Landmark index of the pinky metacarpophalangeal joint (pinky base).
pub const PINKY_MCP: usize = 17;

/// One tracked point on a hand in normalized image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    /// Relative depth.  Carried through for completeness; the pipeline only
    /// uses the image-plane coordinates.
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other` in the image plane (x, y only).
    pub fn planar_distance(&self, other: &Landmark) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// `true` when every coordinate is a finite number.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Which hand an observation belongs to.
///
/// This is the canonical internal key.  The wire format spells labels as
/// `"Left"` / `"Right"` and display ids as `"left"` / `"right"`; both are
/// derived from this enum rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// Both hands, in channel order.
    pub const ALL: [Hand; 2] = [Hand::Left, Hand::Right];

    /// Parses a handedness label, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything other than left/right.
    pub fn from_label(label: &str) -> Option<Hand> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("left") {
            Some(Hand::Left)
        } else if label.eq_ignore_ascii_case("right") {
            Some(Hand::Right)
        } else {
            None
        }
    }

    /// Channel-block offset: 0 for the left hand, 1 for the right hand.
    pub fn index(self) -> usize {
        match self {
            Hand::Left => 0,
            Hand::Right => 1,
        }
    }

    /// Lowercase identifier used as the display element id.
    pub fn key(self) -> &'static str {
        match self {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    }

    /// Capitalized label used in human-readable summaries.
    pub fn label(self) -> &'static str {
        match self {
            Hand::Left => "Left",
            Hand::Right => "Right",
        }
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One detected hand within one frame.
///
/// Built from a decoded inbound message, consumed synchronously by the
/// pipeline, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct HandObservation {
    pub hand: Hand,
    /// Classifier confidence for `hand`, in `[0, 1]`.
    pub score: f64,
    pub landmarks: Vec<Landmark>,
}

impl HandObservation {
    pub fn new(hand: Hand, score: f64, landmarks: Vec<Landmark>) -> Self {
        Self {
            hand,
            score,
            landmarks,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
