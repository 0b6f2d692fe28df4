//! Pure mapping from settings, smoothed pointer and focus to layer parameters

use super::variant::Variant;
use super::{Offset, ease_in_out};
use crate::settings::BackgroundSettings;

/// One of the three decorative shapes, back to front
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Primary,
    Secondary,
    Accent,
}

/// Idle keyframes and focused resting pose of a layer.
///
/// Keyframes are spread evenly over the cycle; rotation keyframes are
/// multiples of the layer's rotation amplitude.
struct LayerKeyframes {
    scale: &'static [f32],
    opacity: &'static [f32],
    rotation: &'static [f32],
    focused_scale: f32,
    focused_opacity: f32,
}

const PRIMARY_KEYFRAMES: LayerKeyframes = LayerKeyframes {
    scale: &[1.0, 1.05, 0.98, 1.0],
    opacity: &[0.35, 0.45, 0.35],
    rotation: &[0.0, 1.0, -1.0, 0.0],
    focused_scale: 0.95,
    focused_opacity: 0.15,
};

const SECONDARY_KEYFRAMES: LayerKeyframes = LayerKeyframes {
    scale: &[1.0, 1.1, 0.9, 1.0],
    opacity: &[0.25, 0.35, 0.25],
    rotation: &[0.0, -1.0, 1.0, 0.0],
    focused_scale: 0.9,
    focused_opacity: 0.1,
};

const ACCENT_KEYFRAMES: LayerKeyframes = LayerKeyframes {
    scale: &[1.0, 1.2, 0.9, 1.0],
    opacity: &[0.15, 0.1, 0.15],
    rotation: &[0.0, 1.0, -1.0, 0.0],
    focused_scale: 0.8,
    focused_opacity: 0.05,
};

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Primary, Layer::Secondary, Layer::Accent];

    pub fn name(&self) -> &'static str {
        match self {
            Layer::Primary => "primary",
            Layer::Secondary => "secondary",
            Layer::Accent => "accent",
        }
    }

    pub fn parallax_divisor(&self, settings: &BackgroundSettings) -> f32 {
        match self {
            Layer::Primary => settings.parallax_primary_divisor as f32,
            Layer::Secondary => settings.parallax_secondary_divisor as f32,
            Layer::Accent => settings.parallax_accent_divisor as f32,
        }
    }

    /// Edge length in percent of viewport width
    pub fn size_vw(&self, settings: &BackgroundSettings) -> f32 {
        match self {
            Layer::Primary => settings.primary_size as f32,
            Layer::Secondary => settings.secondary_size as f32,
            Layer::Accent => settings.accent_size as f32,
        }
    }

    pub fn blur_px(&self, settings: &BackgroundSettings) -> f32 {
        match self {
            Layer::Primary => settings.primary_blur as f32,
            Layer::Secondary => settings.secondary_blur as f32,
            Layer::Accent => settings.accent_blur as f32,
        }
    }

    /// Idle cycle duration in seconds
    pub fn cycle_secs(&self, settings: &BackgroundSettings) -> f32 {
        match self {
            Layer::Primary => settings.primary_duration as f32,
            Layer::Secondary => settings.secondary_duration as f32,
            Layer::Accent => settings.accent_duration as f32,
        }
    }

    /// Idle rotation amplitude in degrees
    pub fn rotation_deg(&self, settings: &BackgroundSettings) -> f32 {
        match self {
            Layer::Primary => settings.primary_rotation as f32,
            Layer::Secondary => settings.secondary_rotation as f32,
            Layer::Accent => settings.accent_rotation as f32,
        }
    }

    fn keyframes(&self) -> &'static LayerKeyframes {
        match self {
            Layer::Primary => &PRIMARY_KEYFRAMES,
            Layer::Secondary => &SECONDARY_KEYFRAMES,
            Layer::Accent => &ACCENT_KEYFRAMES,
        }
    }
}

/// Animated transform of one layer; `opacity` is already composited
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub scale: f32,
    pub opacity: f32,
    pub rotation_deg: f32,
}

impl Pose {
    pub fn lerp(self, other: Pose, t: f32) -> Pose {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Pose {
            scale: mix(self.scale, other.scale),
            opacity: mix(self.opacity, other.opacity),
            rotation_deg: mix(self.rotation_deg, other.rotation_deg),
        }
    }
}

/// Per-layer output of [`map_layers`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerMotion {
    pub layer: Layer,
    pub translate: Offset,
    pub variant: Variant,
}

/// Smoothed pointer offset scaled down by a parallax divisor.
///
/// A zero, negative or non-finite divisor means no displacement.
pub fn parallax(offset: Offset, divisor: f32) -> Offset {
    if !divisor.is_finite() || divisor <= 0.0 {
        return Offset::ZERO;
    }
    offset / divisor
}

/// base × globalOpacity × (focusDampening when focused)
pub fn composite_opacity(base: f32, settings: &BackgroundSettings, variant: Variant) -> f32 {
    let dampening = match variant {
        Variant::Idle => 1.0,
        Variant::Focused => settings.focus_dampening as f32,
    };
    base * settings.global_opacity as f32 * dampening
}

/// Pose of the looping idle oscillation `elapsed` seconds into the loop
pub fn idle_pose(settings: &BackgroundSettings, layer: Layer, elapsed: f32) -> Pose {
    let keyframes = layer.keyframes();
    let cycle = layer.cycle_secs(settings);
    let progress = if cycle.is_finite() && cycle > 0.0 {
        (elapsed / cycle).rem_euclid(1.0)
    } else {
        0.0
    };
    let amplitude = layer.rotation_deg(settings);

    Pose {
        scale: sample_keyframes(keyframes.scale, progress),
        opacity: composite_opacity(sample_keyframes(keyframes.opacity, progress), settings, Variant::Idle),
        rotation_deg: sample_keyframes(keyframes.rotation, progress) * amplitude,
    }
}

/// Resting pose of the focused variant
pub fn focused_pose(settings: &BackgroundSettings, layer: Layer) -> Pose {
    let keyframes = layer.keyframes();
    Pose {
        scale: keyframes.focused_scale,
        opacity: composite_opacity(keyframes.focused_opacity, settings, Variant::Focused),
        rotation_deg: 0.0,
    }
}

/// Translation and variant of every layer for one frame
pub fn map_layers(settings: &BackgroundSettings, smoothed: Offset, focused: bool) -> [LayerMotion; 3] {
    let variant = Variant::for_focus(focused);
    Layer::ALL.map(|layer| LayerMotion {
        layer,
        translate: parallax(smoothed, layer.parallax_divisor(settings)),
        variant,
    })
}

/// Evenly spaced keyframes with ease-in-out between each pair
fn sample_keyframes(frames: &[f32], progress: f32) -> f32 {
    match frames {
        [] => 0.0,
        [only] => *only,
        _ => {
            let segments = (frames.len() - 1) as f32;
            let position = progress.clamp(0.0, 1.0) * segments;
            let index = (position.floor() as usize).min(frames.len() - 2);
            let local = position - index as f32;
            let (from, to) = (frames[index], frames[index + 1]);
            from + (to - from) * ease_in_out(local)
        }
    }
}
