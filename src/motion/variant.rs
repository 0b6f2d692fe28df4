//! Per-layer Idle/Focused animation state machine
//!
//! Each layer starts Idle (looping oscillation). Raising the focus flag moves
//! it to Focused, easing from whatever pose is on screen to the focused
//! resting pose; lowering it eases back into a fresh idle loop. A flip that
//! arrives mid-transition starts from the pose displayed at that instant, so
//! there is never a jump-cut and never two transitions in flight on a layer.

use super::ease_in_out;
use super::mapper::{Layer, Pose, focused_pose, idle_pose};
use crate::constants::animation::FOCUS_TRANSITION_SECS;
use crate::settings::BackgroundSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Idle,
    Focused,
}

impl Variant {
    pub fn for_focus(focused: bool) -> Self {
        if focused { Variant::Focused } else { Variant::Idle }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Idle => "idle",
            Variant::Focused => "focused",
        }
    }
}

/// Tagged state of one layer; times are seconds on the surface clock
#[derive(Debug, Clone, Copy, PartialEq)]
enum LayerState {
    /// Entered at `since`, loop phase measured from `loop_start`; `entering`
    /// is the pose to blend out of, if any
    Idle {
        since: f64,
        loop_start: f64,
        entering: Option<Pose>,
    },
    /// Easing from `from` toward the resting pose since `since`
    Focused { since: f64, from: Pose },
}

/// A state change reported by [`LayerAnimator::set_focus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub layer: Layer,
    pub from: Variant,
    pub to: Variant,
}

#[derive(Debug, Clone)]
pub struct LayerAnimator {
    layer: Layer,
    state: LayerState,
}

impl LayerAnimator {
    /// Initial state is Idle, looping from `now`
    pub fn new(layer: Layer, now: f64) -> Self {
        Self {
            layer,
            state: LayerState::Idle {
                since: now,
                loop_start: now,
                entering: None,
            },
        }
    }

    pub fn layer(&self) -> Layer {
        self.layer
    }

    pub fn variant(&self) -> Variant {
        match self.state {
            LayerState::Idle { .. } => Variant::Idle,
            LayerState::Focused { .. } => Variant::Focused,
        }
    }

    /// Transition function. Returns the transition taken, or `None` when the
    /// flag already matches the current variant.
    pub fn set_focus(&mut self, focused: bool, now: f64, settings: &BackgroundSettings) -> Option<Transition> {
        let to = Variant::for_focus(focused);
        let from = self.variant();
        if from == to {
            return None;
        }

        let displayed = self.pose(settings, now);
        self.state = match to {
            Variant::Focused => LayerState::Focused { since: now, from: displayed },
            Variant::Idle => LayerState::Idle {
                since: now,
                loop_start: now,
                entering: Some(displayed),
            },
        };

        Some(Transition { layer: self.layer, from, to })
    }

    /// Pose displayed at `now` under the given settings
    pub fn pose(&self, settings: &BackgroundSettings, now: f64) -> Pose {
        match self.state {
            LayerState::Idle { since, loop_start, entering } => {
                let elapsed = (now - since).max(0.0) as f32;
                let looping = idle_pose(settings, self.layer, (now - loop_start).max(0.0) as f32);
                match entering {
                    Some(from) if elapsed < FOCUS_TRANSITION_SECS => {
                        from.lerp(looping, ease_in_out(elapsed / FOCUS_TRANSITION_SECS))
                    }
                    _ => looping,
                }
            }
            LayerState::Focused { since, from } => {
                let elapsed = (now - since).max(0.0) as f32;
                let resting = focused_pose(settings, self.layer);
                from.lerp(resting, ease_in_out(elapsed / FOCUS_TRANSITION_SECS))
            }
        }
    }

    /// Rebase the idle loop after its cycle length changed from `old_cycle`
    /// to `new_cycle` seconds, keeping the current phase
    pub fn retime(&mut self, old_cycle: f32, new_cycle: f32, now: f64) {
        if let LayerState::Idle { loop_start, .. } = &mut self.state {
            let progress = loop_progress((now - *loop_start).max(0.0), old_cycle);
            *loop_start = now - progress * loop_length(new_cycle);
        }
    }

    /// Whether a variant change is still easing at `now`
    pub fn is_transitioning(&self, now: f64) -> bool {
        let (since, easing) = match self.state {
            LayerState::Idle { since, entering, .. } => (since, entering.is_some()),
            LayerState::Focused { since, .. } => (since, true),
        };
        easing && ((now - since) as f32) < FOCUS_TRANSITION_SECS
    }
}

/// Fraction of the loop completed after `elapsed` seconds
fn loop_progress(elapsed: f64, cycle: f32) -> f64 {
    let cycle = loop_length(cycle);
    if cycle > 0.0 { (elapsed / cycle).rem_euclid(1.0) } else { 0.0 }
}

/// Cycle length in seconds; zero when the loop is static
fn loop_length(cycle: f32) -> f64 {
    if cycle.is_finite() && cycle > 0.0 { cycle as f64 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::schema::defaults;

    fn approx_pose(a: Pose, b: Pose) -> bool {
        (a.scale - b.scale).abs() < 1e-3
            && (a.opacity - b.opacity).abs() < 1e-3
            && (a.rotation_deg - b.rotation_deg).abs() < 1e-2
    }

    #[test]
    fn test_initial_state_is_idle() {
        let animator = LayerAnimator::new(Layer::Primary, 0.0);
        assert_eq!(animator.variant(), Variant::Idle);
        assert!(!animator.is_transitioning(0.0));
    }

    #[test]
    fn test_focus_roundtrip_visits_each_state_once() {
        let settings = defaults();
        let mut animators: Vec<LayerAnimator> = Layer::ALL.iter().map(|l| LayerAnimator::new(*l, 0.0)).collect();
        let mut log = Vec::new();

        let samples = [(1.0, false), (2.0, true), (2.5, true), (3.0, true), (6.0, false), (6.1, false)];
        for (now, focused) in samples {
            for animator in animators.iter_mut() {
                log.extend(animator.set_focus(focused, now, &settings));
            }
        }

        for layer in Layer::ALL {
            let transitions: Vec<_> = log.iter().filter(|t| t.layer == layer).collect();
            assert_eq!(
                transitions,
                vec![
                    &Transition { layer, from: Variant::Idle, to: Variant::Focused },
                    &Transition { layer, from: Variant::Focused, to: Variant::Idle },
                ]
            );
        }
        assert!(animators.iter().all(|a| a.variant() == Variant::Idle));
    }

    #[test]
    fn test_repeated_flag_is_noop() {
        let settings = defaults();
        let mut animator = LayerAnimator::new(Layer::Accent, 0.0);
        assert_eq!(animator.set_focus(false, 1.0, &settings), None);
        assert!(animator.set_focus(true, 1.0, &settings).is_some());
        assert_eq!(animator.set_focus(true, 1.5, &settings), None);
    }

    #[test]
    fn test_focus_transition_is_continuous_then_rests() {
        let settings = defaults();
        let mut animator = LayerAnimator::new(Layer::Primary, 0.0);
        let before = animator.pose(&settings, 4.0);

        animator.set_focus(true, 4.0, &settings);

        assert!(approx_pose(animator.pose(&settings, 4.0), before));
        assert!(animator.is_transitioning(5.0));
        assert!(!animator.is_transitioning(6.0));
        assert!(approx_pose(animator.pose(&settings, 6.0), focused_pose(&settings, Layer::Primary)));
        assert!(approx_pose(animator.pose(&settings, 60.0), focused_pose(&settings, Layer::Primary)));
    }

    #[test]
    fn test_return_to_idle_is_continuous_and_restarts_loop() {
        let settings = defaults();
        let mut animator = LayerAnimator::new(Layer::Secondary, 0.0);
        animator.set_focus(true, 1.0, &settings);
        let resting = animator.pose(&settings, 10.0);

        animator.set_focus(false, 10.0, &settings);

        assert!(approx_pose(animator.pose(&settings, 10.0), resting));
        assert!(approx_pose(animator.pose(&settings, 13.0), idle_pose(&settings, Layer::Secondary, 3.0)));
    }

    #[test]
    fn test_flip_mid_transition_starts_from_displayed_pose() {
        let settings = defaults();
        let mut animator = LayerAnimator::new(Layer::Accent, 0.0);
        animator.set_focus(true, 2.0, &settings);
        let midway = animator.pose(&settings, 3.0);

        let transition = animator.set_focus(false, 3.0, &settings);

        assert_eq!(transition.map(|t| t.to), Some(Variant::Idle));
        assert!(approx_pose(animator.pose(&settings, 3.0), midway));
    }

    #[test]
    fn test_no_jump_between_frames_across_flips() {
        let settings = defaults();
        let mut animator = LayerAnimator::new(Layer::Primary, 0.0);
        let frame = 1.0 / 60.0;
        let mut previous = animator.pose(&settings, 0.0);

        for i in 1..(60 * 12) {
            let now = i as f64 * frame;
            if i == 60 * 3 {
                animator.set_focus(true, now, &settings);
            }
            if i == 60 * 4 {
                animator.set_focus(false, now, &settings);
            }
            let pose = animator.pose(&settings, now);
            assert!((pose.opacity - previous.opacity).abs() < 0.01, "opacity jump at frame {i}");
            assert!((pose.scale - previous.scale).abs() < 0.01, "scale jump at frame {i}");
            assert!((pose.rotation_deg - previous.rotation_deg).abs() < 0.5, "rotation jump at frame {i}");
            previous = pose;
        }
    }

    #[test]
    fn test_focused_pose_tracks_live_settings() {
        let mut settings = defaults();
        let mut animator = LayerAnimator::new(Layer::Primary, 0.0);
        animator.set_focus(true, 0.0, &settings);

        settings.focus_dampening = 0.5;

        let pose = animator.pose(&settings, 5.0);
        assert!((pose.opacity - 0.15 * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_retime_keeps_idle_phase() {
        let mut settings = defaults();
        let mut animator = LayerAnimator::new(Layer::Primary, 0.0);
        let before = animator.pose(&settings, 100.0);

        settings.primary_duration = 19.0;
        animator.retime(18.0, 19.0, 100.0);

        assert!(approx_pose(animator.pose(&settings, 100.0), before));
        assert!(approx_pose(animator.pose(&settings, 119.0), before));
    }

    #[test]
    fn test_retime_mid_blend_keeps_blend_progress() {
        let mut settings = defaults();
        let mut animator = LayerAnimator::new(Layer::Accent, 0.0);
        animator.set_focus(true, 1.0, &settings);
        animator.set_focus(false, 5.0, &settings);
        let before = animator.pose(&settings, 6.0);

        settings.accent_duration = 40.0;
        animator.retime(25.0, 40.0, 6.0);

        assert!(approx_pose(animator.pose(&settings, 6.0), before));
        assert!(animator.is_transitioning(6.5));
        assert!(!animator.is_transitioning(7.0));
    }

    #[test]
    fn test_retime_is_noop_while_focused() {
        let mut settings = defaults();
        let mut animator = LayerAnimator::new(Layer::Secondary, 0.0);
        animator.set_focus(true, 1.0, &settings);
        let before = animator.pose(&settings, 2.0);

        settings.secondary_duration = 5.0;
        animator.retime(23.0, 5.0, 2.0);

        assert!(approx_pose(animator.pose(&settings, 2.0), before));
    }

    #[test]
    fn test_retime_to_static_cycle_holds_first_keyframe() {
        let mut settings = defaults();
        let mut animator = LayerAnimator::new(Layer::Primary, 0.0);

        settings.primary_duration = 0.0;
        animator.retime(18.0, 0.0, 7.0);

        assert!(approx_pose(animator.pose(&settings, 9.0), idle_pose(&settings, Layer::Primary, 0.0)));
    }
}
