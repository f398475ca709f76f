//! Style tree construction.
//!
//! The style pass walks the document once and produces a [`StyledNode`] tree
//! that mirrors it node for node. Each node carries its cascaded and
//! inherited property map; text nodes also carry their resolved font.

pub mod font;

use std::collections::BTreeMap;

use serde::Serialize;
use strum_macros::EnumString;

use marten_common::warning::clear_warnings;
use marten_dom::{DomTree, ElementData, NodeId};

use crate::cascade::{PropertyMap, apply_phrase_tag, inherit_from_parent, specified_values};
use crate::error::StyleError;
use crate::stylesheet::Stylesheet;
use crate::values::Value;

pub use font::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE_PX, FALLBACK_FONT_SIZE_PT, FontDescriptor,
    FontSizeKeyword, FontStyle, FontWeight, resolve_font, try_resolve_font,
};

/// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// The three box-generation outcomes the layout engine knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum Display {
    /// Generates a block box.
    Block,
    /// Generates an inline box. Anything that is not `block` or `none`.
    Inline,
    /// Generates no box at all.
    None,
}

/// A text node's content and the font it is set in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    /// Literal text as it appeared in the document.
    pub text: String,
    /// Font resolved from the inherited properties.
    pub font: FontDescriptor,
}

/// A document node decorated with its resolved style.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyledNode {
    /// Tag name, `""` for text.
    pub tag_name: String,
    /// Cascaded plus inherited values.
    pub specified_values: PropertyMap,
    /// Raw element attributes (image sizes are read from here).
    pub attrs: BTreeMap<String, String>,
    /// Present on text nodes only.
    pub text: Option<TextRun>,
    /// Styled children in document order.
    pub children: Vec<StyledNode>,
}

impl StyledNode {
    /// The value of `name`, or [`Value::Absent`] on a miss.
    #[must_use]
    pub fn value(&self, name: &str) -> Value {
        self.specified_values.get(name).cloned().unwrap_or_default()
    }

    /// `name`, else `fallback_name`, else `default`.
    #[must_use]
    pub fn lookup(&self, name: &str, fallback_name: &str, default: Value) -> Value {
        self.value(name).or(self.value(fallback_name)).or(default)
    }

    /// Raw attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// `block` and `none` keywords map to themselves, anything else is inline.
    #[must_use]
    pub fn display(&self) -> Display {
        match self.value("display") {
            Value::Keyword(keyword) => match keyword.parse::<Display>() {
                Ok(Display::Block) => Display::Block,
                Ok(Display::None) => Display::None,
                _ => Display::Inline,
            },
            _ => Display::Inline,
        }
    }

    /// Whether this node came from a text node.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        self.text.is_some()
    }
}

/// Entry point of the style pass.
pub struct StyleTree;

impl StyleTree {
    /// Style the document element and everything below it.
    ///
    /// Starts a new document as far as warning deduplication goes.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::NoDocumentElement`] when the document has no
    /// element child.
    pub fn build(tree: &DomTree, stylesheet: &Stylesheet) -> Result<StyledNode, StyleError> {
        clear_warnings();
        let root = tree
            .document_element()
            .ok_or(StyleError::NoDocumentElement)?;
        let mut ancestors = Vec::new();
        Ok(style_node(tree, root, None, stylesheet, &mut ancestors))
    }
}

/// Style one node and recurse into its children.
///
/// `ancestors` holds the node's strict element ancestors, closest last; the
/// node pushes itself before styling its children and pops itself after.
pub fn style_node<'d>(
    tree: &'d DomTree,
    id: NodeId,
    parent: Option<&PropertyMap>,
    stylesheet: &Stylesheet,
    ancestors: &mut Vec<&'d ElementData>,
) -> StyledNode {
    let mut styled = StyledNode::default();
    let element = tree.as_element(id);

    // STEP 1: Cascade, then let phrase tags force their presentation.
    if let Some(element) = element {
        styled.tag_name.clone_from(&element.tag_name);
        styled.specified_values = specified_values(element, stylesheet, ancestors);
        apply_phrase_tag(&element.tag_name, &mut styled.specified_values);
        styled.attrs = element
            .attrs
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
    }

    // STEP 2: Inherit from the already resolved parent.
    if let Some(parent) = parent {
        inherit_from_parent(&mut styled.specified_values, parent);
    }

    // STEP 3: Text runs get their font.
    if let Some(text) = tree.as_text(id) {
        styled.text = Some(TextRun {
            text: text.to_string(),
            font: resolve_font(&styled.specified_values),
        });
    }

    // STEP 4: Children see this node as their closest ancestor.
    if let Some(element) = element {
        ancestors.push(element);
    }
    let children: Vec<StyledNode> = tree
        .children(id)
        .iter()
        .map(|&child| {
            style_node(
                tree,
                child,
                Some(&styled.specified_values),
                stylesheet,
                ancestors,
            )
        })
        .collect();
    styled.children = children;
    if element.is_some() {
        let _ = ancestors.pop();
    }

    styled
}
