//! Render surface: composes the animated layers into a frame description
//!
//! The surface owns the time-dependent state (surface clock, pointer spring,
//! per-layer animators, noise tween) and reads everything else from the
//! latest settings snapshot. `frame()` is a pure read; the painter turns the
//! result into pixels.

use std::sync::Arc;
use tracing::debug;

use crate::color::Rgb;
use crate::constants::animation::{GRADIENT_ANGLE_DEG, MAX_FRAME_DT, NOISE_TRANSITION_SECS};
use crate::constants::layout::{ACCENT_RIGHT, ACCENT_TOP, PRIMARY_INSET, SECONDARY_INSET};
use crate::motion::mapper::map_layers;
use crate::motion::{Layer, LayerAnimator, Offset, PointerTracker, Pose, SpringParams, Transition, Variant, ease_in_out};
use crate::settings::{BackgroundSettings, BlendMode};

/// How a layer is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Rgb),
    LinearGradient { start: Rgb, end: Rgb, angle_deg: f32 },
}

/// Square bounds of a layer before its transform, in viewport pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

impl Bounds {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

/// Everything needed to draw one layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerDraw {
    pub layer: Layer,
    pub fill: Fill,
    pub size_vw: f32,
    pub blur_px: f32,
    /// `None` for a full circle
    pub corner_radius_px: Option<f32>,
    pub blend: BlendMode,
    pub translate: Offset,
    pub pose: Pose,
    pub variant: Variant,
}

impl LayerDraw {
    /// Anchored square for a viewport of the given size
    pub fn bounds(&self, viewport_width: f32, viewport_height: f32) -> Bounds {
        let size = self.size_vw / 100.0 * viewport_width;
        let (x, y) = match self.layer {
            Layer::Primary => (PRIMARY_INSET * viewport_width, PRIMARY_INSET * viewport_height),
            Layer::Secondary => (
                viewport_width * (1.0 - SECONDARY_INSET) - size,
                viewport_height * (1.0 - SECONDARY_INSET) - size,
            ),
            Layer::Accent => (viewport_width * (1.0 - ACCENT_RIGHT) - size, viewport_height * ACCENT_TOP),
        };
        Bounds { x, y, size }
    }
}

/// Noise texture overlay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoiseDraw {
    pub opacity: f32,
    /// `None` for the texture's native tile size
    pub tile_px: Option<f32>,
}

/// One composed frame, back to front
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub background: Rgb,
    pub layers: [LayerDraw; 3],
    pub noise: Option<NoiseDraw>,
}

/// Eases the noise opacity between its idle and focused levels
#[derive(Debug, Clone, Copy)]
struct NoiseTween {
    from: f32,
    since: f64,
}

impl NoiseTween {
    fn value(&self, target: f32, now: f64) -> f32 {
        let t = ((now - self.since).max(0.0) as f32) / NOISE_TRANSITION_SECS;
        self.from + (target - self.from) * ease_in_out(t)
    }
}

pub struct RenderSurface {
    settings: Arc<BackgroundSettings>,
    pointer: PointerTracker,
    animators: [LayerAnimator; 3],
    noise: NoiseTween,
    focused: bool,
    clock: f64,
}

impl RenderSurface {
    pub fn new(settings: Arc<BackgroundSettings>) -> Self {
        let pointer = PointerTracker::new(SpringParams::from_settings(&settings));
        let noise = NoiseTween {
            from: settings.noise_opacity_idle as f32,
            since: 0.0,
        };
        Self {
            pointer,
            animators: Layer::ALL.map(|layer| LayerAnimator::new(layer, 0.0)),
            noise,
            focused: false,
            clock: 0.0,
            settings,
        }
    }

    pub fn settings(&self) -> &BackgroundSettings {
        &self.settings
    }

    /// Adopt a new settings snapshot. The pointer spring is retuned in place
    /// and idle loops whose cycle changed keep their current phase.
    pub fn on_settings_changed(&mut self, settings: Arc<BackgroundSettings>) {
        let params = SpringParams::from_settings(&settings);
        if params != self.pointer.params() {
            debug!(stiffness = params.stiffness, damping = params.damping, mass = params.mass, "Retuning pointer spring");
        }
        self.pointer.set_params(params);

        for animator in self.animators.iter_mut() {
            let layer = animator.layer();
            let (old_cycle, new_cycle) = (layer.cycle_secs(&self.settings), layer.cycle_secs(&settings));
            if old_cycle != new_cycle {
                debug!(layer = layer.name(), old_cycle, new_cycle, "Retiming idle loop");
                animator.retime(old_cycle, new_cycle, self.clock);
            }
        }
        self.settings = settings;
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, viewport_width: f32, viewport_height: f32) {
        self.pointer.pointer_moved(x, y, viewport_width, viewport_height);
    }

    /// Update the focus flag; returns the layer transitions it caused
    pub fn set_focus(&mut self, focused: bool) -> Vec<Transition> {
        if focused == self.focused {
            return Vec::new();
        }

        let now = self.clock;
        let displayed_noise = self.noise.value(self.noise_target(), now);
        self.focused = focused;
        self.noise = NoiseTween { from: displayed_noise, since: now };

        let transitions: Vec<Transition> = self
            .animators
            .iter_mut()
            .filter_map(|animator| animator.set_focus(focused, now, &self.settings))
            .collect();
        debug!(focused, transitions = transitions.len(), "Focus changed");
        transitions
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Advance the surface clock and the pointer spring
    pub fn advance(&mut self, dt: f32) {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        self.clock += dt as f64;
        self.pointer.tick(dt);
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn variants(&self) -> [Variant; 3] {
        [0, 1, 2].map(|i| self.animators[i].variant())
    }

    pub fn frame(&self) -> Frame {
        let settings = self.settings.as_ref();
        let motions = map_layers(settings, self.pointer.offset(), self.focused);
        let layers = [0, 1, 2].map(|i| {
            let motion = motions[i];
            let animator = &self.animators[i];
            LayerDraw {
                layer: motion.layer,
                fill: layer_fill(settings, motion.layer),
                size_vw: motion.layer.size_vw(settings),
                blur_px: motion.layer.blur_px(settings),
                corner_radius_px: settings.corner_radius_px(),
                blend: settings.blend_mode,
                translate: motion.translate,
                pose: animator.pose(settings, self.clock),
                variant: animator.variant(),
            }
        });

        let noise = settings.noise_enabled.then(|| NoiseDraw {
            opacity: self.noise.value(self.noise_target(), self.clock),
            tile_px: settings.noise_tile_px(),
        });

        Frame {
            background: Rgb::parse_or(&settings.background_color, Rgb::BLACK),
            layers,
            noise,
        }
    }

    fn noise_target(&self) -> f32 {
        if self.focused {
            self.settings.noise_opacity_focused as f32
        } else {
            self.settings.noise_opacity_idle as f32
        }
    }
}

fn layer_fill(settings: &BackgroundSettings, layer: Layer) -> Fill {
    let parse = |hex: &str| Rgb::parse_or(hex, Rgb::BLACK);
    match layer {
        Layer::Primary => Fill::LinearGradient {
            start: parse(&settings.primary_color_start),
            end: parse(&settings.primary_color_end),
            angle_deg: GRADIENT_ANGLE_DEG,
        },
        Layer::Secondary => Fill::Solid(parse(&settings.secondary_color)),
        Layer::Accent => Fill::Solid(parse(&settings.accent_color)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::mapper::{focused_pose, idle_pose};
    use crate::settings::schema::defaults;

    const FRAME: f32 = 1.0 / 60.0;

    fn surface() -> RenderSurface {
        RenderSurface::new(Arc::new(defaults()))
    }

    fn run(surface: &mut RenderSurface, seconds: f32) {
        for _ in 0..(seconds / FRAME).round() as usize {
            surface.advance(FRAME);
        }
    }

    #[test]
    fn test_initial_frame() {
        let frame = surface().frame();

        assert_eq!(frame.background, Rgb::new(0x05, 0x05, 0x11));
        assert_eq!(frame.layers.map(|l| l.layer), Layer::ALL);
        assert_eq!(
            frame.layers[0].fill,
            Fill::LinearGradient {
                start: Rgb::new(0xD4, 0x34, 0xFE),
                end: Rgb::new(0x4B, 0x50, 0xE6),
                angle_deg: 135.0,
            }
        );
        assert_eq!(frame.layers[2].fill, Fill::Solid(Rgb::new(0x00, 0xC2, 0xFF)));
        assert!(frame.layers.iter().all(|l| l.variant == Variant::Idle));
        assert!(frame.layers.iter().all(|l| l.translate == Offset::ZERO));
        assert_eq!(frame.layers[1].corner_radius_px, None);
        assert_eq!(frame.noise, Some(NoiseDraw { opacity: 0.035, tile_px: None }));
    }

    #[test]
    fn test_bounds_anchor_layers() {
        let frame = surface().frame();
        let (w, h) = (1000.0, 800.0);

        let primary = frame.layers[0].bounds(w, h);
        assert!((primary.x + 150.0).abs() < 1e-3);
        assert!((primary.y + 120.0).abs() < 1e-3);
        assert!((primary.size - 650.0).abs() < 1e-3);

        let secondary = frame.layers[1].bounds(w, h);
        assert!((secondary.x + secondary.size - 1150.0).abs() < 1e-3);
        assert!((secondary.y + secondary.size - 920.0).abs() < 1e-3);

        let accent = frame.layers[2].bounds(w, h);
        assert!((accent.x + accent.size - 850.0).abs() < 1e-3);
        assert!((accent.y - 280.0).abs() < 1e-3);
    }

    #[test]
    fn test_pointer_drives_parallax_after_smoothing() {
        let mut surface = surface();
        surface.pointer_moved(1200.0, 450.0, 800.0, 900.0);

        assert_eq!(surface.frame().layers[0].translate, Offset::ZERO);

        run(&mut surface, 60.0);
        let frame = surface.frame();
        assert_eq!(frame.layers[0].translate, Offset::new(10.0, 0.0));
        assert_eq!(frame.layers[2].translate.x, 800.0 / 30.0);
    }

    #[test]
    fn test_focus_roundtrip_transitions_each_layer_once() {
        let mut surface = surface();
        run(&mut surface, 1.0);

        let mut log = surface.set_focus(true);
        run(&mut surface, 0.5);
        log.extend(surface.set_focus(true));
        run(&mut surface, 3.0);
        log.extend(surface.set_focus(false));
        log.extend(surface.set_focus(false));

        assert_eq!(log.len(), 6);
        for layer in Layer::ALL {
            let steps: Vec<(Variant, Variant)> =
                log.iter().filter(|t| t.layer == layer).map(|t| (t.from, t.to)).collect();
            assert_eq!(steps, vec![(Variant::Idle, Variant::Focused), (Variant::Focused, Variant::Idle)]);
        }
        assert_eq!(surface.variants(), [Variant::Idle; 3]);
    }

    #[test]
    fn test_focused_frame_settles_on_dimmed_pose() {
        let mut surface = surface();
        surface.set_focus(true);
        run(&mut surface, 2.5);

        let frame = surface.frame();
        for draw in frame.layers.iter() {
            let resting = focused_pose(surface.settings(), draw.layer);
            assert!((draw.pose.opacity - resting.opacity).abs() < 1e-4);
            assert_eq!(draw.variant, Variant::Focused);
        }
        let noise = frame.noise.unwrap();
        assert!((noise.opacity - 0.015).abs() < 1e-4);
    }

    #[test]
    fn test_settings_change_applies_without_restarting_animation() {
        let mut surface = surface();
        run(&mut surface, 100.0);
        let clock = surface.clock();
        let before = surface.frame().layers[0].pose;

        let mut next = defaults();
        next.global_opacity = 0.5;
        next.noise_enabled = false;
        next.border_radius = "40px".to_string();
        next.primary_duration = 19.0;
        surface.on_settings_changed(Arc::new(next.clone()));

        let frame = surface.frame();
        assert_eq!(surface.clock(), clock);
        let expected = idle_pose(&next, Layer::Accent, clock as f32);
        assert!((frame.layers[2].pose.opacity - expected.opacity).abs() < 1e-4);
        assert_eq!(frame.noise, None);
        assert_eq!(frame.layers[0].corner_radius_px, Some(40.0));

        // Cycle edit keeps the primary loop where it was
        let after = frame.layers[0].pose;
        assert!((after.scale - before.scale).abs() < 1e-3);
        assert!((after.rotation_deg - before.rotation_deg).abs() < 1e-2);
        assert!((after.opacity - before.opacity * 0.5).abs() < 1e-3);

        // and the next frame moves only a frame's worth
        surface.advance(FRAME);
        let next_frame = surface.frame().layers[0].pose;
        assert!((next_frame.scale - after.scale).abs() < 1e-3);
        assert!((next_frame.rotation_deg - after.rotation_deg).abs() < 0.1);
    }

    #[test]
    fn test_settings_change_retunes_spring_in_place() {
        let mut surface = surface();
        surface.pointer_moved(800.0, 0.0, 800.0, 800.0);
        run(&mut surface, 0.5);
        let before = surface.frame().layers[0].translate;

        let mut next = defaults();
        next.spring_stiffness = 180.0;
        next.spring_damping = 20.0;
        next.spring_mass = 1.0;
        surface.on_settings_changed(Arc::new(next));

        assert_eq!(surface.frame().layers[0].translate, before);
    }

    #[test]
    fn test_blend_mode_applies_to_all_layers() {
        let mut settings = defaults();
        settings.blend_mode = BlendMode::Multiply;
        let frame = RenderSurface::new(Arc::new(settings)).frame();
        assert!(frame.layers.iter().all(|l| l.blend == BlendMode::Multiply));
    }

    #[test]
    fn test_noise_tween_starts_from_displayed_value() {
        let mut surface = surface();
        surface.set_focus(true);
        run(&mut surface, 0.75);
        let midway = surface.frame().noise.unwrap().opacity;
        assert!(midway < 0.035 && midway > 0.015);

        surface.set_focus(false);
        assert!((surface.frame().noise.unwrap().opacity - midway).abs() < 1e-6);
    }
}
