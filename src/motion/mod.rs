//! Motion derivation for the background layers
//!
//! Pointer smoothing (spring), per-layer parallax and pose math (mapper) and
//! the per-layer Idle/Focused state machine (variant).

pub mod mapper;
pub mod pointer;
pub mod spring;
pub mod variant;

pub use mapper::{Layer, LayerMotion, Pose};
pub use pointer::PointerTracker;
pub use spring::SpringParams;
pub use variant::{LayerAnimator, Transition, Variant};

use std::ops::Div;

/// 2D displacement in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

impl Div<f32> for Offset {
    type Output = Offset;

    fn div(self, divisor: f32) -> Offset {
        Offset::new(self.x / divisor, self.y / divisor)
    }
}

/// CSS `ease-in-out` (cubic-bezier(0.42, 0, 0.58, 1)), input clamped to [0, 1]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t == 0.0 || t == 1.0 {
        return t;
    }

    // Solve bezier_x(u) = t with Newton's method, then evaluate bezier_y(u)
    const X1: f32 = 0.42;
    const X2: f32 = 0.58;
    let bezier = |u: f32, p1: f32, p2: f32| {
        let inv = 1.0 - u;
        3.0 * inv * inv * u * p1 + 3.0 * inv * u * u * p2 + u * u * u
    };
    let bezier_slope = |u: f32, p1: f32, p2: f32| {
        let inv = 1.0 - u;
        3.0 * inv * inv * p1 + 6.0 * inv * u * (p2 - p1) + 3.0 * u * u * (1.0 - p2)
    };

    let mut u = t;
    for _ in 0..8 {
        let slope = bezier_slope(u, X1, X2);
        if slope.abs() < 1e-6 {
            break;
        }
        u = (u - (bezier(u, X1, X2) - t) / slope).clamp(0.0, 1.0);
    }
    bezier(u, 0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_in_out_endpoints() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert_eq!(ease_in_out(-3.0), 0.0);
        assert_eq!(ease_in_out(3.0), 1.0);
    }

    #[test]
    fn test_ease_in_out_is_symmetric_and_monotonic() {
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-4);

        let mut previous = 0.0;
        for i in 1..=100 {
            let t = i as f32 / 100.0;
            let eased = ease_in_out(t);
            assert!(eased >= previous, "not monotonic at {t}");
            assert!((eased + ease_in_out(1.0 - t) - 1.0).abs() < 1e-3, "not symmetric at {t}");
            previous = eased;
        }
    }

    #[test]
    fn test_ease_in_out_starts_slow() {
        assert!(ease_in_out(0.1) < 0.1);
        assert!(ease_in_out(0.9) > 0.9);
    }

    #[test]
    fn test_offset_div() {
        assert_eq!(Offset::new(80.0, -40.0) / 2.0, Offset::new(40.0, -20.0));
        assert_eq!(Offset::new(3.0, 4.0).length(), 5.0);
    }
}
