//! CSS Layout Engine
//!
//! Turns a style tree into a positioned box tree.
//!
//! # Relevant Specifications
//!
//! - [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Visual Formatting Model Details](https://www.w3.org/TR/CSS2/visudet.html)
//!
//! # Module Structure
//!
//! - [`box_model`] - Box dimensions, rectangles, and edge sizes
//! - [`layout_box`] - Box tree construction and block layout
//! - [`inline`] - Text flow, line splitting and inline images
//! - [`metrics`] - Text measurement seam

pub mod box_model;
pub mod inline;
pub mod layout_box;
pub mod metrics;

// Re-exports for convenience
pub use box_model::{BoxDimensions, EdgeSizes, Rect};
pub use inline::{LINE_BREAK_MARKER, PAD_END_MARKER, pad_forced_break, split_lines, strip_break_padding};
pub use layout_box::{BoxType, Cursor, InlineBox, LayoutBox, LayoutResult, layout_tree};
pub use metrics::{ApproximateFontMetrics, FontMetrics};
