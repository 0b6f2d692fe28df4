//! Hex color parsing shared by the renderer and the settings panel

use std::fmt;

/// Opaque sRGB color parsed from a `#RRGGBB` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or the `#RGB` shorthand. The leading '#' is optional.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let hex = input.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            6 => {
                let value = u32::from_str_radix(hex, 16).ok()?;
                Some(Self::new((value >> 16) as u8, (value >> 8) as u8, value as u8))
            }
            3 => {
                let mut channels = hex.chars().map(|c| {
                    let nibble = c.to_digit(16).unwrap_or(0) as u8;
                    nibble << 4 | nibble
                });
                Some(Self::new(channels.next()?, channels.next()?, channels.next()?))
            }
            _ => None,
        }
    }

    /// Parse, falling back to `fallback` for malformed input
    pub fn parse_or(input: &str, fallback: Rgb) -> Self {
        Self::parse_hex(input).unwrap_or(fallback)
    }

    /// Canonical `#RRGGBB` form
    pub fn to_hex(self) -> String {
        self.to_string()
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }

    /// Channel-wise linear interpolation, `t` clamped to [0, 1]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
