//! Parameter schema for the animated background
//!
//! One authoritative table describing every tunable field: its persisted key,
//! UI label, section and kind (range bounds, choice options, color, toggle).
//! The store uses it to validate keyed updates and merge persisted records;
//! the settings panel generates one control per entry.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Rgb;
use crate::constants::layout::CIRCLE_RADIUS_PX;

/// How the blob layers composite against the background
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Screen,
    Overlay,
    SoftLight,
    Normal,
    Multiply,
}

impl BlendMode {
    pub const ALL: [BlendMode; 5] = [
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::SoftLight,
        BlendMode::Normal,
        BlendMode::Multiply,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BlendMode::Screen => "screen",
            BlendMode::Overlay => "overlay",
            BlendMode::SoftLight => "soft-light",
            BlendMode::Normal => "normal",
            BlendMode::Multiply => "multiply",
        }
    }
}

/// Every tunable parameter of the animated background
///
/// Missing keys in a persisted record deserialize to the defaults below and
/// unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BackgroundSettings {
    // Color + blend
    pub primary_color_start: String,
    pub primary_color_end: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub blend_mode: BlendMode,

    // Motion / parallax
    pub parallax_primary_divisor: f64,
    pub parallax_secondary_divisor: f64,
    pub parallax_accent_divisor: f64,
    pub spring_damping: f64,
    pub spring_stiffness: f64,
    pub spring_mass: f64,

    // Shape / presence
    /// Percent of viewport width
    pub primary_size: f64,
    pub secondary_size: f64,
    pub accent_size: f64,
    /// Pixels
    pub primary_blur: f64,
    pub secondary_blur: f64,
    pub accent_blur: f64,
    /// "9999px" (circle) or "40px" (rounded box)
    pub border_radius: String,

    // Animation timing
    /// Idle cycle length in seconds
    pub primary_duration: f64,
    pub secondary_duration: f64,
    pub accent_duration: f64,
    /// Idle rotation amplitude in degrees
    pub primary_rotation: f64,
    pub secondary_rotation: f64,
    pub accent_rotation: f64,

    // Contrast / brightness
    pub global_opacity: f64,
    pub focus_dampening: f64,
    pub background_color: String,

    // Noise / texture
    pub noise_opacity_idle: f64,
    pub noise_opacity_focused: f64,
    pub noise_enabled: bool,
    /// "auto" or a tile size such as "100px"
    pub noise_size: String,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            primary_color_start: "#D434FE".to_string(),
            primary_color_end: "#4B50E6".to_string(),
            secondary_color: "#4B50E6".to_string(),
            accent_color: "#00C2FF".to_string(),
            blend_mode: BlendMode::Screen,
            parallax_primary_divisor: 80.0,
            parallax_secondary_divisor: 50.0,
            parallax_accent_divisor: 30.0,
            spring_damping: 100.0,
            spring_stiffness: 30.0,
            spring_mass: 3.0,
            primary_size: 65.0,
            secondary_size: 75.0,
            accent_size: 35.0,
            primary_blur: 100.0,
            secondary_blur: 120.0,
            accent_blur: 80.0,
            border_radius: "9999px".to_string(),
            primary_duration: 18.0,
            secondary_duration: 23.0,
            accent_duration: 25.0,
            primary_rotation: 5.0,
            secondary_rotation: 8.0,
            accent_rotation: 15.0,
            global_opacity: 1.0,
            focus_dampening: 1.0,
            background_color: "#050511".to_string(),
            noise_opacity_idle: 0.035,
            noise_opacity_focused: 0.015,
            noise_enabled: true,
            noise_size: "auto".to_string(),
        }
    }
}

impl BackgroundSettings {
    /// Look up one field by its persisted key
    pub fn get(&self, key: &str) -> Option<Value> {
        describe(key)?;
        let record = serde_json::to_value(self).ok()?;
        record.get(key).cloned()
    }

    /// Shared corner radius in pixels; `None` means a full circle
    pub fn corner_radius_px(&self) -> Option<f32> {
        match parse_px(&self.border_radius) {
            Some(px) if px < CIRCLE_RADIUS_PX => Some(px),
            _ => None,
        }
    }

    /// Noise tile edge in pixels; `None` for "auto" (texture's native size)
    pub fn noise_tile_px(&self) -> Option<f32> {
        parse_px(&self.noise_size).filter(|px| *px > 0.0)
    }
}

fn parse_px(value: &str) -> Option<f32> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

/// Full default configuration
pub fn defaults() -> BackgroundSettings {
    BackgroundSettings::default()
}

/// Settings panel grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    ColorBlend,
    MotionPhysics,
    ShapePresence,
    AnimationTiming,
    GlobalContrast,
    Texture,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::ColorBlend,
        Section::MotionPhysics,
        Section::ShapePresence,
        Section::AnimationTiming,
        Section::GlobalContrast,
        Section::Texture,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::ColorBlend => "Color & Blend",
            Section::MotionPhysics => "Motion Physics",
            Section::ShapePresence => "Shape & Presence",
            Section::AnimationTiming => "Animation Timing",
            Section::GlobalContrast => "Global Contrast",
            Section::Texture => "Texture",
        }
    }
}

/// Semantic type of a field, with its UI constraints
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// `#RRGGBB` string
    Color,
    /// Number edited with a slider over `[min, max]`
    Range { min: f64, max: f64, step: f64 },
    /// One of a fixed set of strings, as `(value, label)`
    Choice { options: &'static [(&'static str, &'static str)] },
    /// Boolean checkbox
    Toggle,
}

impl FieldKind {
    /// Whether `value` has the right shape for this field.
    ///
    /// Range bounds are not checked here: only the settings panel enforces them.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Color => value.as_str().and_then(Rgb::parse_hex).is_some(),
            FieldKind::Range { .. } => value.as_f64().is_some_and(f64::is_finite),
            FieldKind::Choice { options } => value
                .as_str()
                .is_some_and(|s| options.iter().any(|(option, _)| *option == s)),
            FieldKind::Toggle => value.is_boolean(),
        }
    }

    /// Clamp a slider value into the declared bounds; identity for other kinds
    pub fn clamp(&self, value: f64) -> f64 {
        match self {
            FieldKind::Range { min, max, .. } => value.clamp(*min, *max),
            _ => value,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FieldKind::Color => "hex color like #RRGGBB".to_string(),
            FieldKind::Range { min, max, step } => format!("number in {min}..={max} (step {step})"),
            FieldKind::Choice { options } => {
                let values: Vec<&str> = options.iter().map(|(value, _)| *value).collect();
                format!("one of: {}", values.join(", "))
            }
            FieldKind::Toggle => "true or false".to_string(),
        }
    }
}

/// Schema entry for one configuration field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Persisted JSON key
    pub key: &'static str,
    pub label: &'static str,
    pub section: Section,
    pub kind: FieldKind,
}

const fn range(min: f64, max: f64, step: f64) -> FieldKind {
    FieldKind::Range { min, max, step }
}

const fn field(key: &'static str, label: &'static str, section: Section, kind: FieldKind) -> FieldSpec {
    FieldSpec { key, label, section, kind }
}

const BLEND_OPTIONS: &[(&str, &str)] = &[
    ("screen", "screen"),
    ("overlay", "overlay"),
    ("soft-light", "soft-light"),
    ("normal", "normal"),
    ("multiply", "multiply"),
];

const CORNER_OPTIONS: &[(&str, &str)] = &[("9999px", "Circle"), ("40px", "Rounded Box")];

const NOISE_SIZE_OPTIONS: &[(&str, &str)] = &[
    ("auto", "auto"),
    ("50px", "50px"),
    ("100px", "100px"),
    ("200px", "200px"),
];

use Section::*;

/// Every field, in settings panel order
pub const FIELDS: &[FieldSpec] = &[
    field("primaryColorStart", "Primary Start", ColorBlend, FieldKind::Color),
    field("primaryColorEnd", "Primary End", ColorBlend, FieldKind::Color),
    field("secondaryColor", "Secondary", ColorBlend, FieldKind::Color),
    field("accentColor", "Accent", ColorBlend, FieldKind::Color),
    field("backgroundColor", "Background Base", ColorBlend, FieldKind::Color),
    field("blendMode", "Blend Mode", ColorBlend, FieldKind::Choice { options: BLEND_OPTIONS }),
    field("springDamping", "Damping (Heavy)", MotionPhysics, range(10.0, 200.0, 1.0)),
    field("springStiffness", "Stiffness (Snap)", MotionPhysics, range(10.0, 200.0, 1.0)),
    field("springMass", "Mass (Inertia)", MotionPhysics, range(0.5, 10.0, 0.5)),
    field("parallaxPrimaryDivisor", "Parallax: Primary", MotionPhysics, range(10.0, 200.0, 1.0)),
    field("parallaxSecondaryDivisor", "Parallax: Secondary", MotionPhysics, range(10.0, 200.0, 1.0)),
    field("parallaxAccentDivisor", "Parallax: Accent", MotionPhysics, range(10.0, 200.0, 1.0)),
    field("primarySize", "Primary Size (vw)", ShapePresence, range(20.0, 100.0, 1.0)),
    field("secondarySize", "Secondary Size (vw)", ShapePresence, range(20.0, 100.0, 1.0)),
    field("accentSize", "Accent Size (vw)", ShapePresence, range(10.0, 80.0, 1.0)),
    field("primaryBlur", "Primary Blur (px)", ShapePresence, range(0.0, 200.0, 1.0)),
    field("secondaryBlur", "Secondary Blur (px)", ShapePresence, range(0.0, 200.0, 1.0)),
    field("accentBlur", "Accent Blur (px)", ShapePresence, range(0.0, 200.0, 1.0)),
    field("borderRadius", "Shape Edge", ShapePresence, FieldKind::Choice { options: CORNER_OPTIONS }),
    field("primaryDuration", "Primary Cycle (s)", AnimationTiming, range(2.0, 60.0, 1.0)),
    field("secondaryDuration", "Secondary Cycle (s)", AnimationTiming, range(2.0, 60.0, 1.0)),
    field("accentDuration", "Accent Cycle (s)", AnimationTiming, range(2.0, 60.0, 1.0)),
    field("primaryRotation", "Primary Rotation (°)", AnimationTiming, range(0.0, 180.0, 1.0)),
    field("secondaryRotation", "Secondary Rotation (°)", AnimationTiming, range(0.0, 180.0, 1.0)),
    field("accentRotation", "Accent Rotation (°)", AnimationTiming, range(0.0, 180.0, 1.0)),
    field("globalOpacity", "Global Opacity", GlobalContrast, range(0.0, 1.0, 0.05)),
    field("focusDampening", "Focus Dampening", GlobalContrast, range(0.0, 2.0, 0.1)),
    field("noiseEnabled", "Noise Overlay", Texture, FieldKind::Toggle),
    field("noiseOpacityIdle", "Opacity (Idle)", Texture, range(0.0, 0.2, 0.005)),
    field("noiseOpacityFocused", "Opacity (Focused)", Texture, range(0.0, 0.2, 0.005)),
    field("noiseSize", "Noise Scale", Texture, FieldKind::Choice { options: NOISE_SIZE_OPTIONS }),
];

/// Schema entry for `key`, if it names a field
pub fn describe(key: &str) -> Option<&'static FieldSpec> {
    FIELDS.iter().find(|spec| spec.key == key)
}

/// Fields of one panel section, in display order
pub fn fields_in(section: Section) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(move |spec| spec.section == section)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_covers_every_serialized_field() {
        let record = serde_json::to_value(defaults()).unwrap();
        let object = record.as_object().unwrap();

        assert_eq!(object.len(), FIELDS.len());
        for key in object.keys() {
            assert!(describe(key).is_some(), "field '{key}' missing from schema");
        }
    }

    #[test]
    fn test_schema_keys_are_unique() {
        for (i, spec) in FIELDS.iter().enumerate() {
            assert!(FIELDS[i + 1..].iter().all(|other| other.key != spec.key), "duplicate key {}", spec.key);
        }
    }

    #[test]
    fn test_defaults_satisfy_their_own_schema() {
        let settings = defaults();
        for spec in FIELDS {
            let value = settings.get(spec.key).unwrap();
            assert!(spec.kind.accepts(&value), "default for {} rejected: {value}", spec.key);
            if let (FieldKind::Range { min, max, .. }, Some(number)) = (spec.kind, value.as_f64()) {
                assert!(number >= min && number <= max, "default {} out of range: {number}", spec.key);
            }
        }
    }

    #[test]
    fn test_describe_unknown_key() {
        assert!(describe("primaryColour").is_none());
        assert!(describe("").is_none());
    }

    #[test]
    fn test_describe_mass_range() {
        let spec = describe("springMass").unwrap();
        assert_eq!(spec.kind, FieldKind::Range { min: 0.5, max: 10.0, step: 0.5 });
        assert_eq!(spec.section, Section::MotionPhysics);
    }

    #[test]
    fn test_every_section_has_fields() {
        for section in Section::ALL {
            assert!(fields_in(section).count() > 0, "{} is empty", section.title());
        }
    }

    #[test]
    fn test_kind_accepts() {
        assert!(FieldKind::Color.accepts(&json!("#00C2FF")));
        assert!(!FieldKind::Color.accepts(&json!("blue")));
        assert!(!FieldKind::Color.accepts(&json!(12)));

        let slider = range(0.0, 1.0, 0.05);
        assert!(slider.accepts(&json!(0.4)));
        assert!(slider.accepts(&json!(7)), "bounds are a UI concern");
        assert!(!slider.accepts(&json!("0.4")));

        let blend = describe("blendMode").unwrap().kind;
        assert!(blend.accepts(&json!("soft-light")));
        assert!(!blend.accepts(&json!("darken")));

        assert!(FieldKind::Toggle.accepts(&json!(false)));
        assert!(!FieldKind::Toggle.accepts(&json!(0)));
    }

    #[test]
    fn test_kind_clamp() {
        let slider = range(10.0, 200.0, 1.0);
        assert_eq!(slider.clamp(5.0), 10.0);
        assert_eq!(slider.clamp(250.0), 200.0);
        assert_eq!(slider.clamp(42.0), 42.0);
        assert_eq!(FieldKind::Toggle.clamp(250.0), 250.0);
    }

    #[test]
    fn test_blend_mode_serializes_kebab_case() {
        for mode in BlendMode::ALL {
            assert_eq!(serde_json::to_value(mode).unwrap(), json!(mode.as_str()));
        }
    }

    #[test]
    fn test_get_reads_persisted_key() {
        let settings = defaults();
        assert_eq!(settings.get("primaryColorStart"), Some(json!("#D434FE")));
        assert_eq!(settings.get("blendMode"), Some(json!("screen")));
        assert_eq!(settings.get("noiseEnabled"), Some(json!(true)));
        assert_eq!(settings.get("springMass"), Some(json!(3.0)));
        assert_eq!(settings.get("noiseOpacityIdle"), Some(json!(0.035)));
        assert_eq!(settings.get("noiseOpacityFocused"), Some(json!(0.015)));
        assert_eq!(settings.get("primary_color_start"), None);
    }

    #[test]
    fn test_corner_radius() {
        let mut settings = defaults();
        assert_eq!(settings.corner_radius_px(), None);

        settings.border_radius = "40px".to_string();
        assert_eq!(settings.corner_radius_px(), Some(40.0));

        settings.border_radius = "garbage".to_string();
        assert_eq!(settings.corner_radius_px(), None);
    }

    #[test]
    fn test_noise_tile() {
        let mut settings = defaults();
        assert_eq!(settings.noise_tile_px(), None);

        settings.noise_size = "100px".to_string();
        assert_eq!(settings.noise_tile_px(), Some(100.0));

        settings.noise_size = "0px".to_string();
        assert_eq!(settings.noise_tile_px(), None);
    }
}
