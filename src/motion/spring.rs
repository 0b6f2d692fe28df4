//! Damped spring used to smooth pointer input
//!
//! `m·x'' = -k·(x - target) - c·x'`, integrated at a fixed sub-step with the
//! damping term treated implicitly so heavy damping on a light mass stays
//! stable. Retuning keeps position and velocity, so a change of constants
//! re-settles the motion instead of snapping it.

use crate::constants::animation::{MAX_FRAME_DT, SPRING_REST_DELTA, SPRING_REST_SPEED, SPRING_SUBSTEP};
use crate::settings::BackgroundSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringParams {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringParams {
    pub fn from_settings(settings: &BackgroundSettings) -> Self {
        Self {
            stiffness: settings.spring_stiffness as f32,
            damping: settings.spring_damping as f32,
            mass: settings.spring_mass as f32,
        }
    }

    /// Mass must be positive; stiffness and damping non-negative
    pub fn is_valid(&self) -> bool {
        self.mass.is_finite()
            && self.mass > 0.0
            && self.stiffness.is_finite()
            && self.stiffness >= 0.0
            && self.damping.is_finite()
            && self.damping >= 0.0
    }

    /// ζ = c / (2·√(k·m)); 1.0 is critical damping
    pub fn damping_ratio(&self) -> f32 {
        let critical = 2.0 * (self.stiffness * self.mass).sqrt();
        if critical > 0.0 { self.damping / critical } else { f32::INFINITY }
    }
}

#[derive(Debug, Clone)]
pub struct Spring {
    params: SpringParams,
    position: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(params: SpringParams) -> Self {
        Self {
            params,
            position: 0.0,
            velocity: 0.0,
            target: 0.0,
        }
    }

    pub fn params(&self) -> SpringParams {
        self.params
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Swap constants without disturbing the current motion
    pub fn retune(&mut self, params: SpringParams) {
        self.params = params;
    }

    /// Advance by `dt` seconds (clamped to [`MAX_FRAME_DT`]).
    ///
    /// Invalid constants (e.g. zero mass) degrade to following the target
    /// directly.
    pub fn step(&mut self, dt: f32) {
        if !self.params.is_valid() {
            self.position = self.target;
            self.velocity = 0.0;
            return;
        }

        let mut remaining = dt.clamp(0.0, MAX_FRAME_DT);
        while remaining > 0.0 {
            let h = remaining.min(SPRING_SUBSTEP);
            self.substep(h);
            remaining -= h;
        }

        if self.is_settled() {
            self.position = self.target;
            self.velocity = 0.0;
        }
    }

    pub fn is_settled(&self) -> bool {
        (self.position - self.target).abs() < SPRING_REST_DELTA && self.velocity.abs() < SPRING_REST_SPEED
    }

    fn substep(&mut self, h: f32) {
        let SpringParams { stiffness, damping, mass } = self.params;
        let spring_force = -stiffness * (self.position - self.target);
        self.velocity = (self.velocity + h * spring_force / mass) / (1.0 + h * damping / mass);
        self.position += self.velocity * h;
    }
}
