//! Pointer smoothing: raw cursor position to a damped offset from the viewport center

use super::Offset;
use super::spring::{Spring, SpringParams};

/// Spring-smoothed pointer offset from the viewport center
#[derive(Debug, Clone)]
pub struct PointerTracker {
    x: Spring,
    y: Spring,
}

impl PointerTracker {
    pub fn new(params: SpringParams) -> Self {
        Self {
            x: Spring::new(params),
            y: Spring::new(params),
        }
    }

    /// Retune both axes; no-op when the constants did not change
    pub fn set_params(&mut self, params: SpringParams) {
        if self.x.params() != params {
            self.x.retune(params);
            self.y.retune(params);
        }
    }

    pub fn params(&self) -> SpringParams {
        self.x.params()
    }

    /// Feed a raw pointer sample in viewport coordinates
    pub fn pointer_moved(&mut self, x: f32, y: f32, viewport_width: f32, viewport_height: f32) {
        self.x.set_target(x - viewport_width / 2.0);
        self.y.set_target(y - viewport_height / 2.0);
    }

    pub fn tick(&mut self, dt: f32) {
        self.x.step(dt);
        self.y.step(dt);
    }

    /// Smoothed offset to feed the parallax mapping
    pub fn offset(&self) -> Offset {
        Offset::new(self.x.position(), self.y.position())
    }

    /// Raw (unsmoothed) offset of the last sample
    pub fn target(&self) -> Offset {
        Offset::new(self.x.target(), self.y.target())
    }

    pub fn is_settled(&self) -> bool {
        self.x.is_settled() && self.y.is_settled()
    }
}
