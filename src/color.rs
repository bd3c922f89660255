//! Hex color values and contrast helpers.
//!
//! Patterns store colors as 8-bit sRGB triplets written as `#rrggbb`.
//! [`HexColor`] converts to and from `palette::Srgb` so front ends can hand
//! the value straight to a renderer.

use core::fmt;
use core::str::FromStr;
use palette::Srgb;

/// An 8-bit sRGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HexColor {
    red: u8,
    green: u8,
    blue: u8,
}

/// Neutral color shown when a pattern has no steps.
pub const FALLBACK_COLOR: HexColor = HexColor::new(0x11, 0x18, 0x27);

pub const BLACK: HexColor = HexColor::new(0x00, 0x00, 0x00);
pub const WHITE: HexColor = HexColor::new(0xff, 0xff, 0xff);
pub const RED: HexColor = HexColor::new(0xff, 0x00, 0x00);

/// Brightness above which a background counts as light.
const LIGHT_THRESHOLD: u32 = 155;

impl HexColor {
    /// Creates a color from its 8-bit components.
    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    #[inline]
    pub const fn red(&self) -> u8 {
        self.red
    }

    #[inline]
    pub const fn green(&self) -> u8 {
        self.green
    }

    #[inline]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the color as `palette::Srgb<u8>`.
    #[inline]
    pub fn into_srgb(self) -> Srgb<u8> {
        Srgb::<u8>::new(self.red, self.green, self.blue)
    }

    /// Returns the color as `palette::Srgb<f32>` (0.0-1.0 components).
    #[inline]
    pub fn into_linear_range(self) -> Srgb<f32> {
        self.into_srgb().into_format()
    }

    /// Perceived brightness on a 0-255 scale (ITU-R BT.601 weights).
    pub fn brightness(&self) -> u32 {
        (self.red as u32 * 299 + self.green as u32 * 587 + self.blue as u32 * 114) / 1000
    }

    /// Returns true if dark text reads better on this color.
    pub fn is_light(&self) -> bool {
        // Compare against the unscaled sum so fractional brightness counts.
        self.red as u32 * 299 + self.green as u32 * 587 + self.blue as u32 * 114
            > LIGHT_THRESHOLD * 1000
    }

    /// Black or white, whichever contrasts with this color.
    pub fn contrast_text(&self) -> HexColor {
        if self.is_light() { BLACK } else { WHITE }
    }
}

impl From<Srgb<u8>> for HexColor {
    fn from(color: Srgb<u8>) -> Self {
        HexColor::new(color.red, color.green, color.blue)
    }
}

impl From<HexColor> for Srgb<u8> {
    fn from(color: HexColor) -> Self {
        color.into_srgb()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

/// Errors produced when parsing a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorParseError {
    /// The leading `#` is missing.
    MissingHash,

    /// Wrong number of digits after the `#`.
    InvalidLength(usize),

    /// A character is not a hex digit.
    InvalidDigit,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorParseError::MissingHash => write!(f, "color must start with '#'"),
            ColorParseError::InvalidLength(len) => {
                write!(f, "expected 6 hex digits after '#', found {}", len)
            }
            ColorParseError::InvalidDigit => write!(f, "color contains a non-hex digit"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ColorParseError {}

impl FromStr for HexColor {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').ok_or(ColorParseError::MissingHash)?;
        if digits.len() != 6 {
            return Err(ColorParseError::InvalidLength(digits.chars().count()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit);
        }

        let channel = |range: core::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorParseError::InvalidDigit)
        };

        Ok(HexColor::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// How overlay text picks its color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextColor {
    /// Black or white depending on the background.
    #[default]
    Auto,

    /// A fixed color regardless of background.
    Custom(HexColor),
}

impl TextColor {
    /// Resolves the text color to draw over `background`.
    pub fn resolve(&self, background: HexColor) -> HexColor {
        match self {
            TextColor::Auto => background.contrast_text(),
            TextColor::Custom(color) => *color,
        }
    }
}

/// Replaces every `{color}` in `template` (any letter case) with `color`'s hex.
#[cfg(feature = "std")]
pub fn substitute_color(template: &str, color: HexColor) -> String {
    const PLACEHOLDER: &[u8] = b"{color}";

    let hex = color.to_string();
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    // Matches start on an ASCII '{', so byte offsets are char boundaries.
    while let Some(index) = rest
        .as_bytes()
        .windows(PLACEHOLDER.len())
        .position(|window| window.eq_ignore_ascii_case(PLACEHOLDER))
    {
        out.push_str(&rest[..index]);
        out.push_str(&hex);
        rest = &rest[index + PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    extern crate std;
    use std::string::ToString;

    #[cfg(feature = "std")]
    #[test]
    fn substitute_color_replaces_every_placeholder() {
        assert_eq!(
            substitute_color("{color} / {COLOR} / {Color", RED),
            "#ff0000 / #ff0000 / {Color"
        );
        assert_eq!(substitute_color("", RED), "");
        assert_eq!(substitute_color("héllo {color}", WHITE), "héllo #ffffff");
    }

    #[test]
    fn fallback_formats_as_expected() {
        assert_eq!(FALLBACK_COLOR.to_string(), "#111827");
    }

    #[test]
    fn srgb_conversion_keeps_components() {
        let color = HexColor::new(0x12, 0x34, 0x56);
        let srgb: Srgb<u8> = color.into();
        assert_eq!((srgb.red, srgb.green, srgb.blue), (0x12, 0x34, 0x56));
        assert_eq!(HexColor::from(srgb), color);
    }

    #[test]
    fn linear_range_maps_full_channel_to_one() {
        let srgb = WHITE.into_linear_range();
        assert!((srgb.red - 1.0).abs() < 0.001);
        assert!(BLACK.into_linear_range().green.abs() < 0.001);
    }

    #[test]
    fn threshold_is_strictly_greater() {
        // 155 * 1000 / 1000 sits exactly on the threshold
        let grey = HexColor::new(155, 155, 155);
        assert_eq!(grey.brightness(), 155);
        assert!(!grey.is_light());
        assert!(HexColor::new(156, 156, 156).is_light());
    }
}
