//! Cascaded CSS values.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! The upstream parser hands every declaration over as one of three value
//! kinds. A fourth, [`Value::Absent`], stands for "no declaration applied"
//! and is what property lookups return on a miss.

use serde::Serialize;
use strum_macros::{Display, EnumString};

use marten_common::warning::warn_once;

use crate::error::StyleError;

/// [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
///
/// The units the cascade understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
pub enum Unit {
    /// CSS pixels.
    #[strum(serialize = "px")]
    Px,
    /// Points. "1pt = 1/72th of 1in", so `px = pt * 4 / 3`.
    #[strum(serialize = "pt")]
    Pt,
    /// A percentage of some reference length, resolved against an ancestor.
    #[strum(serialize = "%")]
    Percent,
    /// A bare number, treated as px.
    #[strum(serialize = "")]
    Unitless,
}

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl ColorValue {
    /// Opaque color from three channels.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A single cascaded value.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub enum Value {
    /// An identifier such as `auto`, `block` or `bold`.
    Keyword(String),
    /// A magnitude with its unit.
    Length(f32, Unit),
    /// An RGBA color.
    Color(ColorValue),
    /// No value. Distinct from a zero length.
    #[default]
    Absent,
}

impl Value {
    /// Build a keyword value.
    #[must_use]
    pub fn keyword(name: &str) -> Self {
        Self::Keyword(name.to_string())
    }

    /// Build a px length.
    #[must_use]
    pub const fn px(magnitude: f32) -> Self {
        Self::Length(magnitude, Unit::Px)
    }

    /// Build a length with an explicit unit.
    #[must_use]
    pub const fn length(magnitude: f32, unit: Unit) -> Self {
        Self::Length(magnitude, unit)
    }

    /// Build a color value.
    #[must_use]
    pub const fn color(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::Color(ColorValue::rgba(r, g, b, a))
    }

    /// Short name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Keyword(_) => "keyword",
            Self::Length(..) => "length",
            Self::Color(_) => "color",
            Self::Absent => "nothing",
        }
    }

    /// Whether any declaration produced this value.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Only `Keyword("auto")` is auto. Absent is not.
    #[must_use]
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Keyword(k) if k == "auto")
    }

    /// Whether this is a length of any unit.
    #[must_use]
    pub const fn is_length(&self) -> bool {
        matches!(self, Self::Length(..))
    }

    /// Return `self` unless it is absent, else `fallback`.
    #[must_use]
    pub fn or(self, fallback: Self) -> Self {
        if self.is_present() { self } else { fallback }
    }

    /// Used length in px.
    ///
    /// [§ 5.2 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    /// "1pt = 1/72th of 1in" and "1px = 1/96th of 1in", hence `pt * 4 / 3`.
    ///
    /// Keywords (including `auto`), colors and absent values count as 0, so
    /// a sum over box edges can include them unconditionally. A percentage
    /// reaching layout has no reference length left and also counts as 0.
    #[must_use]
    pub fn to_px(&self) -> f32 {
        match self {
            Self::Length(magnitude, Unit::Px | Unit::Unitless) => *magnitude,
            Self::Length(magnitude, Unit::Pt) => *magnitude * 4.0 / 3.0,
            Self::Length(_, Unit::Percent) => {
                warn_once(
                    "Style",
                    "unresolved percentage used as a length, treating as 0",
                );
                0.0
            }
            Self::Keyword(_) | Self::Color(_) | Self::Absent => 0.0,
        }
    }

    /// The keyword name.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::ExpectedKeyword`] for any other variant.
    pub fn as_keyword(&self) -> Result<&str, StyleError> {
        match self {
            Self::Keyword(name) => Ok(name.as_str()),
            other => Err(StyleError::ExpectedKeyword {
                found: other.kind(),
            }),
        }
    }

    /// The magnitude and unit.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::ExpectedLength`] for any other variant.
    pub fn as_length(&self) -> Result<(f32, Unit), StyleError> {
        match self {
            Self::Length(magnitude, unit) => Ok((*magnitude, *unit)),
            other => Err(StyleError::ExpectedLength {
                found: other.kind(),
            }),
        }
    }

    /// The color.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::ExpectedColor`] for any other variant.
    pub fn as_color(&self) -> Result<ColorValue, StyleError> {
        match self {
            Self::Color(color) => Ok(*color),
            other => Err(StyleError::ExpectedColor {
                found: other.kind(),
            }),
        }
    }
}
