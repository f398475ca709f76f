//! Font resolution for text runs.
//!
//! [CSS Fonts Module Level 4](https://www.w3.org/TR/css-fonts-4/)

use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use marten_common::warning::warn_once;

use crate::cascade::PropertyMap;
use crate::error::StyleError;
use crate::values::Value;

/// Family used when none is specified or font construction fails.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// Size in px when `font-size` is absent or an unknown keyword.
pub const DEFAULT_FONT_SIZE_PX: f32 = 18.0;

/// Size in pt of the fallback font.
pub const FALLBACK_FONT_SIZE_PT: f32 = 18.0;

/// [§ 2.5 Font size: the font-size property](https://www.w3.org/TR/css-fonts-4/#absolute-size-mapping)
///
/// `<absolute-size>` keywords mapped to engine px sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FontSizeKeyword {
    /// `xx-small`
    XxSmall,
    /// `x-small`
    XSmall,
    /// `small`
    Small,
    /// `medium`
    Medium,
    /// `large`
    Large,
    /// `x-large`
    XLarge,
    /// `xx-large`
    XxLarge,
}

impl FontSizeKeyword {
    /// The px size this keyword stands for.
    #[must_use]
    pub const fn px(self) -> f32 {
        match self {
            Self::XxSmall => 8.0,
            Self::XSmall => 13.0,
            Self::Small => 18.0,
            Self::Medium => 23.0,
            Self::Large => 28.0,
            Self::XLarge => 31.0,
            Self::XxLarge => 36.0,
        }
    }
}

/// [§ 3.3 font-style](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FontStyle {
    /// Upright glyphs.
    #[default]
    Normal,
    /// `italic` or `oblique`.
    Italic,
}

/// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Any keyword containing `bold`, or a numeric weight above 400.
    Bold,
}

/// The font a text run is measured and painted with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontDescriptor {
    /// Family name.
    pub family: String,
    /// Upright or italic.
    pub style: FontStyle,
    /// Normal or bold.
    pub weight: FontWeight,
    /// Size in points (`px * 3 / 4`).
    pub size_pt: f32,
}

impl FontDescriptor {
    /// `Arial`, normal, 18pt.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            style: FontStyle::Normal,
            weight: FontWeight::Normal,
            size_pt: FALLBACK_FONT_SIZE_PT,
        }
    }

    /// Size converted back to px.
    #[must_use]
    pub fn size_px(&self) -> f32 {
        self.size_pt * 4.0 / 3.0
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::fallback()
    }
}

fn property<'a>(values: &'a PropertyMap, name: &str) -> &'a Value {
    static ABSENT: Value = Value::Absent;
    values.get(name).unwrap_or(&ABSENT)
}

/// Resolve the font of a text run from its (inherited) property map.
///
/// Any contract violation falls back to [`FontDescriptor::fallback`].
#[must_use]
pub fn resolve_font(values: &PropertyMap) -> FontDescriptor {
    try_resolve_font(values).unwrap_or_else(|err| {
        let reason = match err {
            StyleError::InvalidFontSize { .. } => "font size is not a positive length".to_string(),
            other => other.to_string(),
        };
        warn_once("Style", &format!("{reason}; using {DEFAULT_FONT_FAMILY} 18pt"));
        FontDescriptor::fallback()
    })
}

/// Strict variant of [`resolve_font`].
///
/// # Errors
///
/// Returns a [`StyleError`] when a font property holds the wrong kind of
/// value, or the size is not a positive finite length.
pub fn try_resolve_font(values: &PropertyMap) -> Result<FontDescriptor, StyleError> {
    // STEP 1: Family, "Arial" unless specified.
    let family = match property(values, "font-family") {
        Value::Absent => DEFAULT_FONT_FAMILY.to_string(),
        value => value.as_keyword()?.to_string(),
    };

    // STEP 2: Style.
    let style = match property(values, "font-style") {
        Value::Absent => FontStyle::Normal,
        value => {
            let keyword = value.as_keyword()?;
            if keyword.eq_ignore_ascii_case("italic") || keyword.eq_ignore_ascii_case("oblique") {
                FontStyle::Italic
            } else {
                FontStyle::Normal
            }
        }
    };

    // STEP 3: Weight.
    let weight = match property(values, "font-weight") {
        Value::Keyword(keyword) => {
            let lower = keyword.to_ascii_lowercase();
            let numeric_bold = lower.parse::<f32>().is_ok_and(|w| w > 400.0);
            if lower.contains("bold") || numeric_bold {
                FontWeight::Bold
            } else {
                FontWeight::Normal
            }
        }
        Value::Length(weight, _) if *weight > 400.0 => FontWeight::Bold,
        Value::Length(..) | Value::Absent => FontWeight::Normal,
        value @ Value::Color(_) => {
            return Err(StyleError::ExpectedKeyword {
                found: value.kind(),
            });
        }
    };

    // STEP 4: Size in px.
    let size_px = match property(values, "font-size") {
        Value::Absent => DEFAULT_FONT_SIZE_PX,
        Value::Keyword(keyword) => FontSizeKeyword::from_str(keyword).map_or_else(
            |_| {
                warn_once(
                    "Style",
                    "font-size keyword not recognized, using 18px",
                );
                DEFAULT_FONT_SIZE_PX
            },
            FontSizeKeyword::px,
        ),
        value => {
            let _ = value.as_length()?;
            value.to_px()
        }
    };
    if !size_px.is_finite() || size_px <= 0.0 {
        return Err(StyleError::InvalidFontSize { size: size_px });
    }

    // STEP 5: Stored in points.
    Ok(FontDescriptor {
        family,
        style,
        weight,
        size_pt: size_px * 3.0 / 4.0,
    })
}
