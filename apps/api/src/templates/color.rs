//! Hex color parsing and the float RGB triple the PDF writer consumes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A validated `#rrggbb` color. `#rgb` input is expanded on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor::new(0xff, 0xff, 0xff);
    pub const BLACK: HexColor = HexColor::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb` or `#rrggbb` (leading `#` optional, case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        let hex = raw.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
                Some(Self::new(digit(0)?, digit(1)?, digit(2)?))
            }
            6 => {
                let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
                Some(Self::new(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => None,
        }
    }

    pub fn rgb(self) -> Rgb {
        Rgb {
            r: f32::from(self.r) / 255.0,
            g: f32::from(self.g) / 255.0,
            b: f32::from(self.b) / 255.0,
        }
    }

    pub fn is_white(self) -> bool {
        self == Self::WHITE
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        HexColor::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {raw}")))
    }
}

/// Normalized RGB in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };
    /// Medium gray used for profile titles.
    pub const GRAY: Rgb = Rgb { r: 0.5, g: 0.5, b: 0.5 };

    /// Blends toward white. `white_mix` is clamped to `[0, 0.96]` so a tint
    /// never fully disappears.
    pub fn soften(self, white_mix: f32) -> Rgb {
        let mix = white_mix.clamp(0.0, 0.96);
        let blend = |c: f32| c * (1.0 - mix) + mix;
        Rgb {
            r: blend(self.r),
            g: blend(self.g),
            b: blend(self.b),
        }
    }
}

/// Shorthand for the fixed palette literals used by the builders.
pub fn hex(raw: &str) -> Rgb {
    HexColor::parse(raw).unwrap_or(HexColor::BLACK).rgb()
}
