//! RGBA colors as stored on annotations.
//!
//! Colors travel as CSS-style hex strings (`#rrggbb` or `#rrggbbaa`) so that
//! records written by the web client round-trip unchanged.

#[cfg(test)]
#[path = "color_test.rs"]
mod color_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::annotation::AnnotationKind;

/// Errors produced when parsing a color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// The string does not start with `#`.
    #[error("color must start with '#': {0:?}")]
    MissingHash(String),

    /// The hex body is not 6 or 8 digits long.
    #[error("color must have 6 or 8 hex digits: {0:?}")]
    BadLength(String),

    /// A character in the body is not a hex digit.
    #[error("invalid hex digit in color: {0:?}")]
    BadDigit(String),
}

/// An 8-bit straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::rgb(0xff, 0xff, 0xff);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    #[must_use]
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// The color assigned to a new annotation of `kind`.
    #[must_use]
    pub const fn default_for(kind: AnnotationKind) -> Self {
        match kind {
            AnnotationKind::Circle => Self::rgb(0xff, 0x00, 0x00),
            AnnotationKind::Highlight => Self::rgb(0xff, 0xff, 0x00),
            AnnotationKind::Arrow => Self::rgb(0xff, 0x66, 0x00),
            AnnotationKind::Text => Self::BLACK,
        }
    }

    /// Channels as an `image::Rgba` pixel.
    #[must_use]
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(body) = s.strip_prefix('#') else {
            return Err(ColorError::MissingHash(s.to_owned()));
        };
        if !body.is_ascii() || !(body.len() == 6 || body.len() == 8) {
            return Err(ColorError::BadLength(s.to_owned()));
        }
        if !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::BadDigit(s.to_owned()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&body[i..i + 2], 16).map_err(|_| ColorError::BadDigit(s.to_owned()))
        };
        let a = if body.len() == 8 { channel(6)? } else { 0xff };
        Ok(Self { r: channel(0)?, g: channel(2)?, b: channel(4)?, a })
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
