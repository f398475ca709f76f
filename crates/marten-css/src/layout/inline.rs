//! Inline layout: text flow, line splitting and inline images.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! A text run that does not fit the rest of the line is cut into line
//! fragments. The first fragment stays in the original box; the others come
//! back to the caller as extra sibling boxes.
//!
//! A forced break (`<br>`) reaches layout as [`LINE_BREAK_MARKER`] inside the
//! text. It is emulated by padding the text before it with spaces up to the
//! line end, followed by [`PAD_END_MARKER`], so the split lands on the marker.
//! The padding is stripped again from the text carried to the next line.

use marten_common::warning::warn_once;
use marten_dom::strip_quotes;

use crate::style::{FontDescriptor, StyledNode};

use super::box_model::{BoxDimensions, Rect};
use super::layout_box::{BoxType, Cursor, InlineBox, LayoutBox, LayoutResult};
use super::metrics::FontMetrics;

/// Forced line break inside a text run.
pub const LINE_BREAK_MARKER: char = '\u{2028}';

/// Ends the space padding that emulates a forced break.
pub const PAD_END_MARKER: char = '\u{200B}';

/// Widths at or below this are treated as zero.
const EPSILON: f32 = 1e-3;

/// Replace the first [`LINE_BREAK_MARKER`] in `text` with enough spaces to
/// fill the line from `x`, followed by [`PAD_END_MARKER`].
///
/// Text without a marker is returned unchanged.
#[must_use]
pub fn pad_forced_break(
    text: &str,
    available: f32,
    x: f32,
    font: &FontDescriptor,
    metrics: &dyn FontMetrics,
) -> String {
    let Some(index) = text.find(LINE_BREAK_MARKER) else {
        return text.to_string();
    };
    let before = &text[..index];
    let after = &text[index + LINE_BREAK_MARKER.len_utf8()..];

    let space_width = metrics.char_width(' ', font);
    let remaining = available - x - metrics.text_width(before, font);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let spaces = if space_width <= EPSILON {
        0
    } else {
        (remaining / space_width).floor().max(0.0) as usize
    };

    let mut padded = String::with_capacity(text.len() + spaces + PAD_END_MARKER.len_utf8());
    padded.push_str(before);
    padded.extend(std::iter::repeat_n(' ', spaces));
    padded.push(PAD_END_MARKER);
    padded.push_str(after);
    padded
}

/// Remove every [`PAD_END_MARKER`] together with the whitespace right before it.
#[must_use]
pub fn strip_break_padding(text: &str) -> String {
    let mut stripped = String::with_capacity(text.len());
    for segment in text.split_inclusive(PAD_END_MARKER) {
        match segment.strip_suffix(PAD_END_MARKER) {
            Some(head) => stripped.push_str(head.trim_end()),
            None => stripped.push_str(segment),
        }
    }
    stripped
}

/// Cut `text` into lines for a line box `available` wide, the first line
/// starting at `start_x`. Returns each line's text and measured width.
///
/// The cut is proportional: a line keeps the share of characters that its
/// free width is of the text's width. A line starting at 0 keeps at least
/// one character. Text measuring (near) zero cannot be cut and stays whole.
#[must_use]
pub fn split_lines(
    text: &str,
    available: f32,
    start_x: f32,
    font: &FontDescriptor,
    metrics: &dyn FontMetrics,
) -> Vec<(String, f32)> {
    let mut lines = Vec::new();
    let mut pending = text.to_string();
    let mut x = start_x;

    loop {
        let width = metrics.text_width(&pending, font);
        if x + width <= available {
            break;
        }
        if width <= EPSILON {
            warn_once("Layout", "text measures zero width, not splitting it");
            break;
        }

        let len = pending.chars().count();
        let share = ((available - x) / width).max(0.0);
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let mut cutoff = (len as f32 * share).floor() as usize;
        if x <= EPSILON {
            cutoff = cutoff.max(1);
        }
        if cutoff >= len {
            break;
        }

        let split_at = pending
            .char_indices()
            .nth(cutoff)
            .map_or(pending.len(), |(index, _)| index);
        let tail = strip_break_padding(&pending[split_at..]);
        pending.truncate(split_at);
        let head_width = metrics.text_width(&pending, font);
        lines.push((std::mem::take(&mut pending), head_width));

        x = 0.0;
        pending = pad_forced_break(&tail, available, x, font, metrics);
    }

    let width = metrics.text_width(&pending, font);
    lines.push((pending, width));
    lines
}

/// An `<img>` size attribute in px. Quotes around the number are accepted.
fn image_dimension(node: &StyledNode, name: &str) -> Option<f32> {
    let raw = node.attr(name)?;
    match strip_quotes(raw).trim().parse::<f32>() {
        Ok(px) => Some(px),
        Err(_) => {
            warn_once(
                "Layout",
                &format!("<img> {name} is not a number, image has no size"),
            );
            None
        }
    }
}

impl<'a> LayoutBox<'a> {
    /// Inline dispatch: text, then images, then children-only boxes.
    pub(crate) fn layout_inline(
        &mut self,
        node: &'a StyledNode,
        container: &BoxDimensions,
        cursor: Cursor,
        metrics: &dyn FontMetrics,
    ) -> LayoutResult<'a> {
        let text = match &self.box_type {
            BoxType::Inline(inline) => inline.text.clone(),
            BoxType::Block(_) | BoxType::Anonymous => String::new(),
        };

        if let Some(run) = node.text.as_ref().filter(|_| !text.is_empty()) {
            return self.layout_text(node, &text, &run.font, container, cursor, metrics);
        }

        if node.tag_name == "img" {
            return LayoutResult::at(self.layout_image(node, container, cursor));
        }

        LayoutResult::at(self.layout_flow_container(container, cursor, metrics))
    }

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Every line fragment is one line height tall.
    fn layout_text(
        &mut self,
        node: &'a StyledNode,
        text: &str,
        font: &FontDescriptor,
        container: &BoxDimensions,
        cursor: Cursor,
        metrics: &dyn FontMetrics,
    ) -> LayoutResult<'a> {
        let available = container.content.width;
        let line_height = metrics.line_height(font);
        let mut cursor = cursor;

        // STEP 1: A cursor parked at the line end starts a new line.
        if (cursor.x - available).abs() <= EPSILON {
            cursor.x = 0.0;
            cursor.y += line_height;
        }

        // STEP 2: Forced break, then cut into lines.
        let padded = pad_forced_break(text, available, cursor.x, font, metrics);
        let mut lines = split_lines(&padded, available, cursor.x, font, metrics).into_iter();

        // STEP 3: The first line stays in this box at the cursor.
        let (first_text, first_width) = lines.next().unwrap_or_default();
        if let BoxType::Inline(inline) = &mut self.box_type {
            inline.text = first_text;
        }
        self.dimensions.content = Rect {
            x: container.content.x + cursor.x,
            y: container.content.y + cursor.y,
            width: first_width,
            height: line_height,
        };

        // STEP 4: The rest become fragments, one line further down each.
        let mut exit = Cursor::new(cursor.x + first_width, cursor.y);
        let mut extra_siblings = Vec::new();
        for (line_text, line_width) in lines {
            exit = Cursor::new(line_width, exit.y + line_height);
            let mut fragment = LayoutBox::new(BoxType::Inline(InlineBox {
                node,
                text: line_text,
            }));
            fragment.dimensions.content = Rect {
                x: container.content.x,
                y: container.content.y + exit.y,
                width: line_width,
                height: line_height,
            };
            extra_siblings.push(fragment);
        }

        LayoutResult {
            exit,
            extra_siblings,
        }
    }

    /// [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
    ///
    /// Size comes from the `width` and `height` attributes only. An image
    /// that does not fit the rest of the line is placed at the line start,
    /// one image height down.
    fn layout_image(
        &mut self,
        node: &StyledNode,
        container: &BoxDimensions,
        cursor: Cursor,
    ) -> Cursor {
        let (Some(width), Some(height)) = (
            image_dimension(node, "width"),
            image_dimension(node, "height"),
        ) else {
            return cursor;
        };

        let offset_x = if cursor.x + width > container.content.width {
            self.dimensions.content.x = container.content.x;
            self.dimensions.content.y = container.content.y + cursor.y + height;
            0.0
        } else {
            self.dimensions.content.x = container.content.x + cursor.x;
            self.dimensions.content.y = container.content.y + cursor.y;
            cursor.x
        };
        self.dimensions.content.width = width;
        self.dimensions.content.height = height;

        Cursor::new(offset_x + width, cursor.y + height)
    }
}
