use std::fmt;

use crate::common::unit::{EMUS_PER_HALF_PT, EMUS_PER_PT};

/// Length measurement with units.
///
/// Stored in EMUs (English Metric Units), the native unit of Office Open XML.
/// Run font sizes are written in half-points, so the conversions that matter
/// here are to and from points and half-points.
///
/// # Examples
///
/// ```rust
/// use surat_izin::common::Length;
///
/// let size = Length::from_points(11.0);
/// assert_eq!(size.half_points(), 22);
/// assert_eq!(Length::from_half_points(24).points(), 12.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Length {
    /// Value in EMUs (1 pt = 12,700 EMUs)
    emus: i64,
}

impl Length {
    /// Create a length from whole points.
    #[inline]
    pub const fn pt(points: i64) -> Self {
        Self {
            emus: points * EMUS_PER_PT,
        }
    }

    /// Create a length from points.
    #[inline]
    pub fn from_points(points: f64) -> Self {
        Self {
            emus: (points * EMUS_PER_PT as f64).round() as i64,
        }
    }

    /// Create a length from half-points, the unit of `<w:sz w:val>`.
    #[inline]
    pub const fn from_half_points(half_points: u32) -> Self {
        Self {
            emus: half_points as i64 * EMUS_PER_HALF_PT,
        }
    }

    /// Convert to points (1/72 inch).
    #[inline]
    pub fn points(&self) -> f64 {
        self.emus as f64 / EMUS_PER_PT as f64
    }

    /// Convert to half-points, rounding to the nearest value and clamping
    /// negative lengths to zero.
    #[inline]
    pub fn half_points(&self) -> u32 {
        let half_points = (self.emus as f64 / EMUS_PER_HALF_PT as f64).round();
        half_points.clamp(0.0, u32::MAX as f64) as u32
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}pt", self.points())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_conversions() {
        assert_eq!(Length::pt(11).half_points(), 22);
        assert_eq!(Length::from_points(10.5).half_points(), 21);
        assert_eq!(Length::from_half_points(22), Length::pt(11));
        assert_eq!(Length::pt(-3).half_points(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Length::from_points(10.5).to_string(), "10.5pt");
    }
}
