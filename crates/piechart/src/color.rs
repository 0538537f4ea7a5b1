use derive_more::{Deref, From, Into};
use palette::{Srgb, Srgba, WithAlpha};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 8-bit sRGB color with alpha, the unit every slice color is stored in.
pub type Color = Srgba<u8>;

pub const OPAQUE: u8 = 0xff;

/// Scales every color channel by `strength`, saturating at `0xff`. The result is always opaque.
///
/// A strength of exactly one leaves the channels untouched, values above one lighten the
/// color and values below one darken it.
pub fn highlight(color: Color, strength: f32) -> Color {
    let scale = |channel: u8| ((strength * channel as f32) as u32).min(0xff) as u8;
    Srgba::new(
        scale(color.red),
        scale(color.green),
        scale(color.blue),
        OPAQUE,
    )
}

/// Linear interpolation between two colors, `u` clamped to `0.0..=1.0`.
pub fn lerp(c0: Color, c1: Color, u: f32) -> Color {
    let u = u.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * u).round() as u8;
    Srgba::new(
        mix(c0.red, c1.red),
        mix(c0.green, c1.green),
        mix(c0.blue, c1.blue),
        mix(c0.alpha, c1.alpha),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid hex color '{0}'")]
pub struct ColorParseError(String);

/// Color written as `#rrggbb`, `#rgb` or `#rrggbbaa` in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Deref, From, Into, SerializeDisplay, DeserializeFromStr)]
pub struct HexColor(Color);

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let digits = s.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(err());
        }

        let (rgb, alpha) = match digits.len() {
            8 => {
                let alpha = u8::from_str_radix(&digits[6..], 16).map_err(|_| err())?;
                (&digits[..6], alpha)
            }
            _ => (digits, OPAQUE),
        };

        let rgb = Srgb::<u8>::from_str(rgb).map_err(|_| err())?;
        Ok(Self(rgb.with_alpha(alpha)))
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, a) = self.0.into_components();
        write!(f, "#{:02x}{:02x}{:02x}", r, g, b)?;
        if a != OPAQUE {
            write!(f, "{:02x}", a)?;
        }
        Ok(())
    }
}
