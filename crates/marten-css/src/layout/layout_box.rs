//! Layout box types, box tree construction and block layout.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)

#[cfg(feature = "layout-trace")]
use std::cell::Cell;

use marten_common::warning::clear_warnings;
use serde::{Serialize, Serializer};

use crate::error::LayoutError;
use crate::style::{Display, StyledNode};
use crate::values::Value;

use super::box_model::BoxDimensions;
use super::metrics::FontMetrics;

#[cfg(feature = "layout-trace")]
thread_local! {
    static LAYOUT_DEPTH: Cell<usize> = const { Cell::new(0) };
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_tag<S: Serializer>(node: &&StyledNode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&node.tag_name)
}

/// The running inline position inside a block's content area, relative to
/// its content origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Cursor {
    /// Horizontal offset.
    pub x: f32,
    /// Vertical offset.
    pub y: f32,
}

impl Cursor {
    /// Create a cursor.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Payload of an inline box: its styled node and the text this box shows.
///
/// A text run split over several lines produces one inline box per line, all
/// sharing the same styled node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineBox<'a> {
    /// The styled node this box was generated for.
    #[serde(rename = "tag", serialize_with = "serialize_tag")]
    pub node: &'a StyledNode,
    /// Text of this box, `""` for element boxes.
    pub text: String,
}

impl<'a> InlineBox<'a> {
    /// The inline box for `node`, taking its text run if it has one.
    #[must_use]
    pub fn new(node: &'a StyledNode) -> Self {
        Self {
            node,
            text: node
                .text
                .as_ref()
                .map(|run| run.text.clone())
                .unwrap_or_default(),
        }
    }
}

/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
///
/// The kinds of box the engine generates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BoxType<'a> {
    /// [§ 9.2.1 Block-level elements and block boxes](https://www.w3.org/TR/CSS2/visuren.html#block-boxes)
    Block(#[serde(serialize_with = "serialize_tag")] &'a StyledNode),
    /// [§ 9.2.2 Inline-level elements and inline boxes](https://www.w3.org/TR/CSS2/visuren.html#inline-boxes)
    Inline(InlineBox<'a>),
    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// "if a block container box has a block-level box inside it, then we
    /// force it to have only block-level boxes inside it."
    Anonymous,
}

/// A node in the box tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutBox<'a> {
    /// Kind of box and its payload.
    pub box_type: BoxType<'a>,
    /// Geometry, filled in by [`LayoutBox::layout`].
    pub dimensions: BoxDimensions,
    /// Child boxes in flow order.
    pub children: Vec<LayoutBox<'a>>,
}

/// What a layout call hands back to the parent's children loop.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult<'a> {
    /// Cursor after this box.
    pub exit: Cursor,
    /// Line fragments split off this box. They belong right after it.
    pub extra_siblings: Vec<LayoutBox<'a>>,
}

impl LayoutResult<'_> {
    pub(crate) const fn at(exit: Cursor) -> Self {
        Self {
            exit,
            extra_siblings: Vec::new(),
        }
    }
}

impl<'a> LayoutBox<'a> {
    /// A box with zeroed geometry and no children.
    #[must_use]
    pub fn new(box_type: BoxType<'a>) -> Self {
        Self {
            box_type,
            dimensions: BoxDimensions::default(),
            children: Vec::new(),
        }
    }

    /// The styled node behind this box, if it is not anonymous.
    #[must_use]
    pub const fn styled_node(&self) -> Option<&'a StyledNode> {
        match &self.box_type {
            BoxType::Block(node) => Some(*node),
            BoxType::Inline(inline) => Some(inline.node),
            BoxType::Anonymous => None,
        }
    }

    /// Build the box tree for `root`.
    ///
    /// `display: none` nodes generate no box and their subtree is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::RootNotRendered`] if `root` itself is
    /// `display: none`.
    pub fn build(root: &'a StyledNode) -> Result<Self, LayoutError> {
        if root.display() == Display::None {
            return Err(LayoutError::RootNotRendered {
                tag: root.tag_name.clone(),
            });
        }
        Ok(Self::build_box(root))
    }

    fn build_box(node: &'a StyledNode) -> Self {
        let box_type = match node.display() {
            Display::Block => BoxType::Block(node),
            Display::Inline | Display::None => BoxType::Inline(InlineBox::new(node)),
        };
        let mut layout_box = Self::new(box_type);

        for child in &node.children {
            match child.display() {
                Display::Block => layout_box.children.push(Self::build_box(child)),
                Display::Inline => layout_box
                    .inline_container()
                    .children
                    .push(Self::build_box(child)),
                Display::None => {}
            }
        }

        layout_box
    }

    /// [§ 9.2.1.1 Anonymous block boxes](https://www.w3.org/TR/CSS2/visuren.html#anonymous-block-level)
    ///
    /// Where an inline child goes: this box itself if it is inline or
    /// anonymous, else its trailing anonymous child (created on demand, so a
    /// block sibling always starts a new one).
    pub fn inline_container(&mut self) -> &mut Self {
        if matches!(self.box_type, BoxType::Inline(_) | BoxType::Anonymous) {
            return self;
        }

        let ends_with_anonymous = self
            .children
            .last()
            .is_some_and(|last| last.box_type == BoxType::Anonymous);
        if !ends_with_anonymous {
            self.children.push(Self::new(BoxType::Anonymous));
        }
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Lay out this box inside `container` starting at `cursor`.
    ///
    /// Block boxes ignore the cursor and hand it back unchanged; the parent
    /// advances past them itself.
    pub fn layout(
        &mut self,
        container: &BoxDimensions,
        cursor: Cursor,
        metrics: &dyn FontMetrics,
    ) -> LayoutResult<'a> {
        #[cfg(feature = "layout-trace")]
        let _depth = {
            let depth = LAYOUT_DEPTH.with(|d| {
                let current = d.get();
                d.set(current + 1);
                current
            });
            eprintln!(
                "[LAYOUT] depth={depth} box={} cursor=({}, {}) children={}",
                match &self.box_type {
                    BoxType::Block(node) => format!("block <{}>", node.tag_name),
                    BoxType::Inline(inline) => format!("inline <{}>", inline.node.tag_name),
                    BoxType::Anonymous => "anonymous".to_string(),
                },
                cursor.x,
                cursor.y,
                self.children.len()
            );
            // Decrements the depth counter on every return path.
            struct DepthGuard;
            impl Drop for DepthGuard {
                fn drop(&mut self) {
                    LAYOUT_DEPTH.with(|d| d.set(d.get() - 1));
                }
            }
            DepthGuard
        };

        match self.box_type {
            BoxType::Block(node) => {
                self.layout_block(node, container, metrics);
                LayoutResult::at(cursor)
            }
            BoxType::Inline(ref inline) => {
                let node = inline.node;
                self.layout_inline(node, container, cursor, metrics)
            }
            BoxType::Anonymous => LayoutResult::at(self.layout_flow_container(container, cursor, metrics)),
        }
    }

    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    fn layout_block(
        &mut self,
        node: &StyledNode,
        container: &BoxDimensions,
        metrics: &dyn FontMetrics,
    ) {
        // STEP 1: Width and horizontal edges depend on the container.
        self.calculate_block_width(node, container);

        // STEP 2: Position below whatever the container holds so far.
        self.calculate_block_position(node, container);

        // STEP 3: Children, with the inline cursor parked at the line end.
        self.dimensions.content.height = 0.0;
        let start = Cursor::new(self.dimensions.content.width, 0.0);
        let _ = self.layout_block_children(start, metrics);

        // STEP 4: Height depends on the children.
        self.calculate_block_height(node);
    }

    /// [§ 10.3.3](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// "The following constraints must hold among the used values of the
    /// other properties:
    ///
    ///   'margin-left' + 'border-left-width' + 'padding-left' + 'width' +
    ///   'padding-right' + 'border-right-width' + 'margin-right'
    ///   = width of containing block"
    pub(crate) fn calculate_block_width(&mut self, node: &StyledNode, container: &BoxDimensions) {
        let zero = Value::px(0.0);

        // STEP 1: Gather the seven values. A width that is not a length is auto.
        let width = Some(node.value("width"))
            .filter(Value::is_length)
            .unwrap_or_else(|| Value::keyword("auto"));
        let margin_left = node.lookup("margin-left", "margin", zero.clone());
        let margin_right = node.lookup("margin-right", "margin", zero.clone());
        let border_left = node.lookup("border-left-width", "border-width", zero.clone());
        let border_right = node.lookup("border-right-width", "border-width", zero.clone());
        let padding_left = node.lookup("padding-left", "padding", zero.clone());
        let padding_right = node.lookup("padding-right", "padding", zero);

        // STEP 2: Everything counts towards the total, auto as 0.
        let total: f32 = [
            &width,
            &margin_left,
            &margin_right,
            &border_left,
            &border_right,
            &padding_left,
            &padding_right,
        ]
        .iter()
        .map(|value| value.to_px())
        .sum();
        let underflow = container.content.width - total;

        let mut used_width = width.to_px();
        let mut used_margin_left = margin_left.to_px();
        let mut used_margin_right = margin_right.to_px();

        // STEP 3: Exactly one of five cases, keyed on which values are auto.
        match (width.is_auto(), margin_left.is_auto(), margin_right.is_auto()) {
            // Over-constrained: the right margin absorbs the difference.
            (false, false, false) => used_margin_right += underflow,
            (false, false, true) => used_margin_right = underflow,
            (false, true, false) => used_margin_left = underflow,
            // "If both 'margin-left' and 'margin-right' are 'auto', their
            // used values are equal."
            (false, true, true) => {
                used_margin_left = underflow / 2.0;
                used_margin_right = underflow / 2.0;
            }
            // "If 'width' is set to 'auto', any other 'auto' values become
            // '0' and 'width' follows from the resulting equality."
            (true, _, _) => {
                if underflow >= 0.0 {
                    used_width = underflow;
                } else {
                    used_margin_right += underflow;
                }
            }
        }

        // STEP 4: Store the used values.
        let d = &mut self.dimensions;
        d.content.width = used_width;
        d.margin.left = used_margin_left;
        d.margin.right = used_margin_right;
        d.border.left = border_left.to_px();
        d.border.right = border_right.to_px();
        d.padding.left = padding_left.to_px();
        d.padding.right = padding_right.to_px();
    }

    /// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "In a block formatting context, boxes are laid out one after the
    /// other, vertically, beginning at the top of a containing block."
    ///
    /// The vertical offset adds the bottom padding and border widths rather
    /// than the top ones. Existing layouts depend on this offset.
    pub(crate) fn calculate_block_position(&mut self, node: &StyledNode, container: &BoxDimensions) {
        let zero = Value::px(0.0);
        let d = &mut self.dimensions;

        d.margin.top = node.lookup("margin-top", "margin", zero.clone()).to_px();
        d.margin.bottom = node.lookup("margin-bottom", "margin", zero.clone()).to_px();
        d.border.top = node
            .lookup("border-top-width", "border-width", zero.clone())
            .to_px();
        d.border.bottom = node
            .lookup("border-bottom-width", "border-width", zero.clone())
            .to_px();
        d.padding.top = node.lookup("padding-top", "padding", zero.clone()).to_px();
        d.padding.bottom = node.lookup("padding-bottom", "padding", zero).to_px();

        d.content.x = container.content.x + d.margin.left + d.border.left + d.padding.left;
        d.content.y = container.content.y
            + container.content.height
            + d.margin.top
            + d.padding.bottom
            + d.border.bottom;
    }

    /// [§ 10.6.3 Block-level non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#normal-block)
    ///
    /// The larger of the children's height and a specified `height`.
    pub(crate) fn calculate_block_height(&mut self, node: &StyledNode) {
        let specified = node.value("height").to_px();
        if specified > self.dimensions.content.height {
            self.dimensions.content.height = specified;
        }
    }

    /// Lay out children in order, threading the inline cursor through them.
    ///
    /// Content height grows by each child's vertical advance. Line fragments
    /// returned by a child are inserted directly after it.
    pub(crate) fn layout_block_children(
        &mut self,
        start: Cursor,
        metrics: &dyn FontMetrics,
    ) -> Cursor {
        let mut cursor = start;
        let children = std::mem::take(&mut self.children);
        let mut laid_out = Vec::with_capacity(children.len());

        for mut child in children {
            if matches!(child.box_type, BoxType::Block(_)) {
                let _ = child.layout(&self.dimensions, cursor, metrics);
                let advance = child.dimensions.margin_box().height;
                self.dimensions.content.height += advance;
                cursor = Cursor::new(self.dimensions.content.width, cursor.y + advance);
                laid_out.push(child);
            } else {
                let result = child.layout(&self.dimensions, cursor, metrics);
                self.dimensions.content.height += result.exit.y - cursor.y;
                cursor = result.exit;
                laid_out.push(child);
                laid_out.extend(result.extra_siblings);
            }
        }

        self.children = laid_out;
        cursor
    }

    /// Anonymous boxes, and inline boxes holding only children, take the
    /// container's origin and width and flow their children from `cursor`.
    pub(crate) fn layout_flow_container(
        &mut self,
        container: &BoxDimensions,
        cursor: Cursor,
        metrics: &dyn FontMetrics,
    ) -> Cursor {
        let d = &mut self.dimensions;
        d.content.x = container.content.x;
        d.content.y = container.content.y;
        d.content.width = container.content.width;
        d.content.height = 0.0;
        self.layout_block_children(cursor, metrics)
    }
}

/// Build the box tree for `root` and lay it out in `viewport`.
///
/// The viewport's height is an output: it is zeroed first and receives the
/// root's content height afterwards. Warnings already reported for an earlier
/// layout are reported again.
///
/// # Errors
///
/// Returns [`LayoutError::RootNotRendered`] when `root` is `display: none`.
pub fn layout_tree<'a>(
    root: &'a StyledNode,
    viewport: &mut BoxDimensions,
    metrics: &dyn FontMetrics,
) -> Result<LayoutBox<'a>, LayoutError> {
    clear_warnings();
    let mut root_box = LayoutBox::build(root)?;

    viewport.content.height = 0.0;
    let _ = root_box.layout(viewport, Cursor::default(), metrics);
    viewport.content.height = root_box.dimensions.content.height;

    Ok(root_box)
}
