//! Range mapping: smoothed features → `[0, 1]` → MIDI CC values.

/// Largest value a 7-bit MIDI data byte can carry.
pub const CC_MAX: u8 = 127;

/// Linearly rescales `value` from `[src_lo, src_hi]` to `[dst_lo, dst_hi]`,
/// clamping to the destination endpoints outside the source range.
///
/// The endpoints map exactly: `linlin(src_lo, ..) == dst_lo` and
/// `linlin(src_hi, ..) == dst_hi`.
///
/// ```rust
/// use hands_core::linlin;
///
/// assert_eq!(linlin(1.5, 1.0, 2.0, 0.0, 10.0), 5.0);
/// assert_eq!(linlin(-3.0, 1.0, 2.0, 0.0, 10.0), 0.0);
/// ```
pub fn linlin(value: f64, src_lo: f64, src_hi: f64, dst_lo: f64, dst_hi: f64) -> f64 {
    if value <= src_lo {
        dst_lo
    } else if value >= src_hi {
        dst_hi
    } else {
        (value - src_lo) / (src_hi - src_lo) * (dst_hi - dst_lo) + dst_lo
    }
}

/// Maps a unit-range value to a CC value in `0..=127`.
///
/// Scales by 127, rounds half away from zero, then clamps.  Clamping after
/// rounding keeps `1.0 → 127` and `0.0 → 0` exact.  Non-finite input maps
/// to 0.
pub fn unit_to_cc(unit: f64) -> u8 {
    if !unit.is_finite() {
        return 0;
    }
    let scaled = (unit * f64::from(CC_MAX)).round();
    scaled.clamp(0.0, f64::from(CC_MAX)) as u8
}

/// Source range of the smoothed spread ratio, mapped onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadRange {
    /// Ratio treated as a fully closed hand.
    pub min: f64,
    /// Ratio treated as a fully open hand.
    pub max: f64,
}

impl SpreadRange {
    pub const DEFAULT_MIN: f64 = 0.85;
    pub const DEFAULT_MAX: f64 = 2.3;

    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `true` when both bounds are finite and `min < max`.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }

    /// Maps a smoothed spread ratio onto `[0, 1]`.
    pub fn normalize(&self, spread: f64) -> f64 {
        linlin(spread, self.min, self.max, 0.0, 1.0)
    }
}

impl Default for SpreadRange {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN, Self::DEFAULT_MAX)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linlin_endpoints_are_exact() {
        assert_eq!(linlin(0.85, 0.85, 2.3, 0.0, 1.0), 0.0);
        assert_eq!(linlin(2.3, 0.85, 2.3, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_linlin_clamps_outside_source_range() {
        assert_eq!(linlin(-100.0, 0.0, 1.0, 10.0, 20.0), 10.0);
        assert_eq!(linlin(100.0, 0.0, 1.0, 10.0, 20.0), 20.0);
    }

    #[test]
    fn test_linlin_interpolates_inside_range() {
        assert_eq!(linlin(0.25, 0.0, 1.0, 0.0, 8.0), 2.0);
    }

    #[test]
    fn test_linlin_supports_descending_destination() {
        assert_eq!(linlin(0.75, 0.0, 1.0, 1.0, 0.0), 0.25);
    }

    #[test]
    fn test_unit_to_cc_rounds_half_away_from_zero() {
        // 0.5 * 127 = 63.5 → 64
        assert_eq!(unit_to_cc(0.5), 64);
        assert_eq!(unit_to_cc(1.0), 127);
        assert_eq!(unit_to_cc(0.0), 0);
    }

    #[test]
    fn test_unit_to_cc_clamps_after_rounding() {
        assert_eq!(unit_to_cc(1.2), 127);
        assert_eq!(unit_to_cc(-0.3), 0);
        // -0.003 * 127 rounds to -0 and must not wrap
        assert_eq!(unit_to_cc(-0.003), 0);
    }

    #[test]
    fn test_unit_to_cc_maps_non_finite_to_zero() {
        assert_eq!(unit_to_cc(f64::NAN), 0);
        assert_eq!(unit_to_cc(f64::INFINITY), 0);
    }

    #[test]
    fn test_spread_far_outside_range_clamps_into_midi_domain() {
        let range = SpreadRange::default();
        assert_eq!(unit_to_cc(range.normalize(10.0)), 127);
        assert_eq!(unit_to_cc(range.normalize(-5.0)), 0);
    }

    #[test]
    fn test_spread_range_validation() {
        assert!(SpreadRange::default().is_valid());
        assert!(!SpreadRange::new(2.0, 2.0).is_valid());
        assert!(!SpreadRange::new(3.0, 1.0).is_valid());
        assert!(!SpreadRange::new(f64::NAN, 1.0).is_valid());
    }
}
