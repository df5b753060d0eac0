//! Geometry reducer: 21 landmarks → three scalar features.
//!
//! - `mean_x`, `mean_y`: unweighted mean of all landmark coordinates.  This
//!   tracks where the hand is in the camera frame.
//! - `spread`: `|wrist → middle fingertip| / |wrist → pinky base|`.  Dividing
//!   by a bone length that barely changes as the hand opens makes the ratio
//!   independent of hand size and camera distance.  An open hand sits near
//!   2.3, a closed fist near 0.85.
//!
//! # Degenerate input
//!
//! Landmark sets of the wrong length or with non-finite coordinates are
//! rejected with a [`GeometryError`].  A zero wrist-to-pinky distance is not
//! an error: the means are still valid, so the spread comes back as `None`
//! and the caller decides what "no spread this frame" means.

use thiserror::Error;

use super::landmarks::{
    Hand, HandObservation, Landmark, HAND_LANDMARK_COUNT, MIDDLE_FINGER_TIP, PINKY_MCP, WRIST,
};

/// Reasons a hand observation cannot be reduced at all.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// The observation does not carry exactly [`HAND_LANDMARK_COUNT`] points.
    #[error("expected {expected} landmarks, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    /// A coordinate was NaN or infinite.
    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },
}

/// Raw (unsmoothed) features for one hand in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandFeatures {
    pub hand: Hand,
    pub mean_x: f64,
    pub mean_y: f64,
    /// `None` when the wrist and pinky base coincide.
    pub spread: Option<f64>,
}

/// Reduces one hand observation to its three features.
///
/// # Errors
///
/// Returns [`GeometryError::LandmarkCount`] unless exactly 21 landmarks are
/// present, and [`GeometryError::NonFiniteCoordinate`] if any coordinate is
/// NaN or infinite.
///
/// # Example
///
/// ```rust
/// use hands_core::domain::{reduce, Hand, HandObservation, Landmark};
///
/// let landmarks = vec![Landmark::new(0.5, 0.5, 0.0); 21];
/// let features = reduce(&HandObservation::new(Hand::Left, 0.9, landmarks)).unwrap();
/// assert_eq!(features.mean_x, 0.5);
/// assert_eq!(features.spread, None); // every point coincides
/// ```
pub fn reduce(observation: &HandObservation) -> Result<HandFeatures, GeometryError> {
    let landmarks = &observation.landmarks;
    if landmarks.len() != HAND_LANDMARK_COUNT {
        return Err(GeometryError::LandmarkCount {
            expected: HAND_LANDMARK_COUNT,
            actual: landmarks.len(),
        });
    }
    if let Some(index) = landmarks.iter().position(|lm| !lm.is_finite()) {
        return Err(GeometryError::NonFiniteCoordinate { index });
    }

    let n = landmarks.len() as f64;
    let mean_x = landmarks.iter().map(|lm| lm.x).sum::<f64>() / n;
    let mean_y = landmarks.iter().map(|lm| lm.y).sum::<f64>() / n;

    Ok(HandFeatures {
        hand: observation.hand,
        mean_x,
        mean_y,
        spread: spread_ratio(landmarks),
    })
}

/// Computes the spread ratio, or `None` when it is undefined.
///
/// Expects a full 21-point hand; shorter slices yield `None`.
pub fn spread_ratio(landmarks: &[Landmark]) -> Option<f64> {
    let wrist = landmarks.get(WRIST)?;
    let tip = landmarks.get(MIDDLE_FINGER_TIP)?;
    let pinky = landmarks.get(PINKY_MCP)?;

    let denominator = wrist.planar_distance(pinky);
    if denominator == 0.0 {
        return None;
    }
    let ratio = wrist.planar_distance(tip) / denominator;
    // Subnormal denominators can still overflow to infinity.
    ratio.is_finite().then_some(ratio)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
