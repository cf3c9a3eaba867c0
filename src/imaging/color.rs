//! Colors, background specs and transparency lookup.
//!
//! Background colors come in as CSS-style hex strings (`#RGB` or `#RRGGBB`,
//! the `#` is optional). A background is either an opaque color or the
//! [`BackgroundSpec::Transparent`] marker; which pixels that marker actually
//! produces depends on the *target* format and is decided by [`Fill::resolve`].

use super::params::ImageKind;
use super::raster::TransparentKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Hex color must have 3 or 6 digits: {0:?}")]
    Length(String),
    #[error("Invalid hex digit in color: {0:?}")]
    Digit(String),
}

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorRgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorRgb {
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RGB` or `#RRGGBB` (leading `#` optional).
    ///
    /// ```
    /// # use simple_thumb::imaging::ColorRgb;
    /// assert_eq!(ColorRgb::from_hex("#0af").unwrap(), ColorRgb::new(0x00, 0xaa, 0xff));
    /// assert_eq!(ColorRgb::from_hex("12ab9F").unwrap(), ColorRgb::new(0x12, 0xab, 0x9f));
    /// ```
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if !hex.is_ascii() {
            return Err(ColorError::Digit(input.to_string()));
        }
        let channel = |digits: &str| {
            u8::from_str_radix(digits, 16).map_err(|_| ColorError::Digit(input.to_string()))
        };

        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            _ => Err(ColorError::Length(input.to_string())),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for ColorRgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// What a freshly allocated canvas is filled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BackgroundSpec {
    Opaque(ColorRgb),
    Transparent,
}

impl Default for BackgroundSpec {
    fn default() -> Self {
        Self::Opaque(ColorRgb::WHITE)
    }
}

impl FromStr for BackgroundSpec {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("transparent") {
            return Ok(Self::Transparent);
        }
        ColorRgb::from_hex(s).map(Self::Opaque)
    }
}

impl TryFrom<String> for BackgroundSpec {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BackgroundSpec> for String {
    fn from(spec: BackgroundSpec) -> Self {
        match spec {
            BackgroundSpec::Opaque(color) => color.to_hex(),
            BackgroundSpec::Transparent => "transparent".to_string(),
        }
    }
}

/// A [`BackgroundSpec`] resolved against a target format and the source's
/// transparency metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// Opaque color; source pixels are alpha-blended over it.
    Solid(ColorRgb),
    /// Fully transparent black; source pixels are copied, alpha included.
    Clear,
    /// The source's transparent palette color at alpha 0; the output keeps
    /// the key so the GIF encoder can emit it as the transparent entry.
    Keyed(TransparentKey),
}

impl Fill {
    pub fn resolve(
        background: BackgroundSpec,
        target: ImageKind,
        source_key: Option<TransparentKey>,
    ) -> Self {
        match (background, target, source_key) {
            (BackgroundSpec::Opaque(color), _, _) => Fill::Solid(color),
            (BackgroundSpec::Transparent, kind, _) if kind.supports_alpha() => Fill::Clear,
            (BackgroundSpec::Transparent, ImageKind::Gif, Some(key)) => Fill::Keyed(key),
            (BackgroundSpec::Transparent, kind, _) => {
                tracing::debug!(?kind, "no transparency available, filling with white");
                Fill::Solid(ColorRgb::WHITE)
            }
        }
    }

    /// RGBA value written into every pixel before resampling.
    pub fn pixel(self) -> [u8; 4] {
        match self {
            Fill::Solid(c) => [c.r, c.g, c.b, 255],
            Fill::Clear => [0, 0, 0, 0],
            Fill::Keyed(key) => [key.color.r, key.color.g, key.color.b, 0],
        }
    }

    /// Whether resampled pixels are composited over the fill or replace it.
    pub fn blends(self) -> bool {
        matches!(self, Fill::Solid(_))
    }
}
