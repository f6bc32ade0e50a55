//! Easing curves for settle animations.
//!
//! Easing functions map a linear progress value (0.0 to 1.0) to a transformed
//! value. Settling wheels want curves that arrive gently, so the default is a
//! cubic ease-out.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Available easing functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-out (starts fast, decelerates).
    EaseOut,
    /// Quadratic ease-in-out (smooth start and end).
    EaseInOut,
    /// Cubic ease-out, the usual wheel settle curve.
    #[default]
    EaseOutCubic,
    /// Sinusoidal ease-out.
    EaseOutSine,
}

/// Apply an easing function to a progress value.
///
/// # Example
///
/// ```
/// use horizon_wheel::{ease, Easing};
///
/// assert_eq!(ease(Easing::Linear, 0.5), 0.5);
/// assert!(ease(Easing::EaseOutCubic, 0.5) > 0.5);
/// ```
#[inline]
pub fn ease(easing: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Easing::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        Easing::EaseOutSine => ((t * PI) / 2.0).sin(),
    }
}

/// Interpolate between two values using an easing function.
#[inline]
pub fn lerp_eased(easing: Easing, start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * ease(easing, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::EaseOutCubic,
            Easing::EaseOutSine,
        ] {
            assert!(ease(easing, 0.0).abs() < 0.001, "{easing:?} at 0");
            assert!((ease(easing, 1.0) - 1.0).abs() < 0.001, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_ease_out_is_front_loaded() {
        assert!(ease(Easing::EaseOut, 0.5) > 0.5);
        assert!(ease(Easing::EaseOutCubic, 0.5) > ease(Easing::EaseOut, 0.5));
        assert_eq!(ease(Easing::EaseInOut, 0.5), 0.5);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(ease(Easing::Linear, -0.5), 0.0);
        assert_eq!(ease(Easing::Linear, 1.5), 1.0);
    }

    #[test]
    fn test_lerp_eased() {
        assert_eq!(lerp_eased(Easing::Linear, 100.0, 200.0, 0.5), 150.0);
        assert_eq!(lerp_eased(Easing::EaseOutCubic, 100.0, 200.0, 1.0), 200.0);
    }
}
