//! Style cascade and box-model layout for the Marten engine core.
//!
//! # Scope
//!
//! This crate implements:
//! - **Values** - keywords, lengths (`px`, `pt`, `%`) and colors
//! - **Stylesheets** ([CSS Syntax Level 3](https://www.w3.org/TR/css-syntax-3/))
//!   - Already parsed rules, selectors and declarations
//!   - The user-agent default sheet
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class and ID selectors, and descendant chains
//!   - Specificity calculation
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Specificity-based ordering with document-order tie-break
//!   - Inheritance of font and color properties
//!   - Percentage lengths resolved against the parent
//!
//! - **Layout Engine** ([CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html))
//!   - Block, inline and anonymous boxes
//!   - Block widths per the auto-margin constraint
//!   - Text line splitting and inline images
//!
//! # Not Yet Implemented
//!
//! - Parsing (stylesheets and documents arrive already parsed)
//! - Floats, positioning, tables
//! - Intrinsic image sizes
//! - Painting

/// Errors raised by the style and layout passes.
pub mod error;
/// Cascade and inheritance per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Box tree and layout per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Selector matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Style tree construction.
pub mod style;
/// Parsed stylesheet model.
pub mod stylesheet;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;
/// Specified values per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod values;

// Re-exports for convenience
pub use cascade::{INHERITED_PROPERTIES, PropertyMap, RELATIVE_PREFIX, specified_values};
pub use error::{LayoutError, StyleError};
pub use layout::{
    ApproximateFontMetrics, BoxDimensions, BoxType, Cursor, EdgeSizes, FontMetrics, InlineBox,
    LINE_BREAK_MARKER, LayoutBox, LayoutResult, PAD_END_MARKER, Rect, layout_tree,
};
pub use selector::matches;
pub use style::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PX, Display, FALLBACK_FONT_SIZE_PT, FontDescriptor,
    FontSizeKeyword, FontStyle, FontWeight, StyleTree, StyledNode, TextRun,
};
pub use stylesheet::{Declaration, Rule, Selector, SimpleSelector, Specificity, Stylesheet};
pub use ua_stylesheet::ua_stylesheet;
pub use values::{ColorValue, Unit, Value};
