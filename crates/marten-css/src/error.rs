//! Error types for style resolution and layout.
//!
//! Most bad input is recovered from where it is found (missing properties
//! fall back to defaults, broken fonts fall back to Arial). These types cover
//! the remaining caller contract violations.

use thiserror::Error;

/// Failures while reading cascaded values or building the style tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    /// A keyword was required but the value holds something else.
    #[error("expected a keyword, found {found}")]
    ExpectedKeyword {
        /// Kind of the value actually present.
        found: &'static str,
    },

    /// A length was required but the value holds something else.
    #[error("expected a length, found {found}")]
    ExpectedLength {
        /// Kind of the value actually present.
        found: &'static str,
    },

    /// A color was required but the value holds something else.
    #[error("expected a color, found {found}")]
    ExpectedColor {
        /// Kind of the value actually present.
        found: &'static str,
    },

    /// A font size that cannot produce a usable font.
    #[error("font size {size}px is not a positive finite length")]
    InvalidFontSize {
        /// The rejected size in px.
        size: f32,
    },

    /// The document tree holds no element to style.
    #[error("document has no document element")]
    NoDocumentElement,
}

/// Failures while building or laying out the box tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The root styled node has `display: none`, so there is nothing to lay out.
    #[error("root element <{tag}> is display: none and generates no box")]
    RootNotRendered {
        /// Tag name of the root.
        tag: String,
    },
}
