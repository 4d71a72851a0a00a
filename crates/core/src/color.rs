//! Color types and the hex / RGB / HSL codec.
//!
//! Provides the 8-bit [`Rgb`] triple, the [`Hsl`] triple (hue in degrees,
//! saturation and lightness in percent) and the [`Color`] value object that
//! carries all three encodings of one point. Conversions are pure functions.
//!
//! The codec is fail-soft: [`hex_to_rgb`] and [`Color::from_hex`] decode
//! malformed input to black instead of failing. Callers that need to reject
//! bad input use [`parse_hex`] or [`normalize_hex`], which return
//! [`PaletteError::InvalidColor`].

use crate::error::PaletteError;
use crate::params::HslShift;
use crate::prng::Xorshift64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL triple: `h` in [0, 360), `s` and `l` in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// One color in all three encodings.
///
/// `hex` is always canonical uppercase `#RRGGBB`. `hsl` keeps the unrounded
/// values the color was built from, so `hsl` and `rgb` agree to within the
/// 8-bit quantization of `rgb`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub hex: String,
    pub hsl: Hsl,
    pub rgb: Rgb,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Creates a triple from its three channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Hsl {
    /// Creates an HSL triple as given, without wrapping or clamping.
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Wraps the hue into [0, 360) and clamps saturation and lightness to [0, 100].
    pub fn normalized(self) -> Self {
        Self {
            h: wrap_hue(self.h),
            s: clamp_percent(self.s),
            l: clamp_percent(self.l),
        }
    }
}

impl Color {
    /// Builds a color from a hex string. Malformed input yields black.
    pub fn from_hex(hex: &str) -> Color {
        Self::from_rgb(hex_to_rgb(hex))
    }

    /// Builds a color from an 8-bit triple.
    pub fn from_rgb(rgb: Rgb) -> Color {
        Color {
            hex: rgb_to_hex(rgb),
            hsl: rgb_to_hsl(rgb),
            rgb,
        }
    }

    /// Builds a color from HSL, wrapping the hue and clamping saturation/lightness.
    pub fn from_hsl(hsl: Hsl) -> Color {
        let hsl = hsl.normalized();
        let rgb = hsl_to_rgb(hsl);
        Color {
            hex: rgb_to_hex(rgb),
            hsl,
            rgb,
        }
    }

    /// Builds a color from raw HSL components with the global shift applied.
    ///
    /// The shift is added first and only then is the hue wrapped and the
    /// saturation/lightness clamped.
    pub fn from_hsl_shifted(h: f64, s: f64, l: f64, shift: &HslShift) -> Color {
        Self::from_hsl(Hsl {
            h: h + shift.hue,
            s: s + shift.saturation,
            l: l + shift.lightness,
        })
    }

    /// Returns this color with the global shift applied.
    pub fn shifted(&self, shift: &HslShift) -> Color {
        Self::from_hsl_shifted(self.hsl.h, self.hsl.s, self.hsl.l, shift)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Parses `#rrggbb` or `rrggbb` (case insensitive) strictly.
pub fn parse_hex(hex: &str) -> Result<Rgb, PaletteError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PaletteError::InvalidColor(format!(
            "expected 6 hex digits, got '{hex}'"
        )));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|e| PaletteError::InvalidColor(format!("invalid channel in '{hex}': {e}")))
    };
    Ok(Rgb {
        r: channel(0..2)?,
        g: channel(2..4)?,
        b: channel(4..6)?,
    })
}

/// Decodes a hex string, falling back to black when it is malformed.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    parse_hex(hex).unwrap_or(Rgb::BLACK)
}

/// Normalizes user-supplied hex to canonical `#RRGGBB`.
///
/// Trims whitespace, tolerates a missing `#` and expands 3-digit shorthand.
pub fn normalize_hex(hex: &str) -> Result<String, PaletteError> {
    let trimmed = hex.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    parse_hex(&expanded).map(rgb_to_hex)
}

/// Formats an 8-bit triple as uppercase `#RRGGBB`.
pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.r, rgb.g, rgb.b)
}

/// Converts 8-bit RGB to HSL (degrees / percent).
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = f64::from(rgb.r) / 255.0;
    let g = f64::from(rgb.g) / 255.0;
    let b = f64::from(rgb.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl {
            h: 0.0,
            s: 0.0,
            l: l * 100.0,
        };
    }

    let d = max - min;
    let s = if l < 0.5 {
        d / (max + min)
    } else {
        d / (2.0 - max - min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl {
        h: wrap_hue(h * 60.0),
        s: s * 100.0,
        l: l * 100.0,
    }
}

/// Converts HSL (degrees / percent) to 8-bit RGB with rounding.
///
/// The hue is wrapped and saturation/lightness clamped before conversion.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = wrap_hue(hsl.h) / 360.0;
    let s = clamp_percent(hsl.s) / 100.0;
    let l = clamp_percent(hsl.l) / 100.0;

    if s == 0.0 {
        let v = to_channel(l);
        return Rgb { r: v, g: v, b: v };
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb {
        r: to_channel(hue_to_channel(p, q, h + 1.0 / 3.0)),
        g: to_channel(hue_to_channel(p, q, h)),
        b: to_channel(hue_to_channel(p, q, h - 1.0 / 3.0)),
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(unit: f64) -> u8 {
    (unit.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Wraps a hue angle into [0, 360). NaN maps to 0.
pub fn wrap_hue(h: f64) -> f64 {
    if !h.is_finite() {
        return 0.0;
    }
    let wrapped = h.rem_euclid(360.0);
    // rem_euclid of a tiny negative value can round up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Clamps a saturation or lightness percentage to [0, 100].
pub fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

/// Shortest angular distance between two hues, in [0, 180].
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let d = (a - b).abs().rem_euclid(360.0);
    if d > 180.0 {
        360.0 - d
    } else {
        d
    }
}

/// Draws a random vivid base color: hue in [0, 360), saturation in [50, 100),
/// lightness in [30, 70), each floored to an integer.
pub fn random_color(rng: &mut Xorshift64) -> String {
    let h = (rng.next_f64() * 360.0).floor();
    let s = (rng.next_f64() * 50.0).floor() + 50.0;
    let l = (rng.next_f64() * 40.0).floor() + 30.0;
    rgb_to_hex(hsl_to_rgb(Hsl { h, s, l }))
}
