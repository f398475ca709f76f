//! Text measurement.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! Inline layout never touches font files. It asks a [`FontMetrics`]
//! implementation, which must answer identically for identical input so that
//! layout is reproducible.

use crate::style::FontDescriptor;

use super::inline::PAD_END_MARKER;

/// Font metrics interface for text measurement during layout.
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it."
pub trait FontMetrics {
    /// Total advance width of `text` set in `font`.
    fn text_width(&self, text: &str, font: &FontDescriptor) -> f32;

    /// [§ 10.8.1 Leading and half-leading](https://www.w3.org/TR/CSS2/visudet.html#leading)
    ///
    /// "The initial value of 'line-height' is 'normal'. We recommend a used
    /// value for 'normal' between 1.0 and 1.2."
    fn line_height(&self, font: &FontDescriptor) -> f32;

    /// Advance width of a single character.
    fn char_width(&self, ch: char, font: &FontDescriptor) -> f32 {
        let mut buf = [0u8; 4];
        self.text_width(ch.encode_utf8(&mut buf), font)
    }
}

/// Approximate font metrics using fixed ratios.
///
/// Every character advances 0.6× the font's px size (about the average Latin
/// glyph of Arial) and a line is 1.2× the px size. Used when no font backend
/// is available, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl ApproximateFontMetrics {
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const LINE_HEIGHT_RATIO: f32 = 1.2;
}

impl FontMetrics for ApproximateFontMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, font: &FontDescriptor) -> f32 {
        // The padding terminator is a zero-width space and has no advance.
        let advancing = text.chars().filter(|&ch| ch != PAD_END_MARKER).count();
        advancing as f32 * font.size_px() * Self::CHAR_WIDTH_RATIO
    }

    fn line_height(&self, font: &FontDescriptor) -> f32 {
        font.size_px() * Self::LINE_HEIGHT_RATIO
    }
}
