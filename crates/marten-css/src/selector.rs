//! Selector matching against document elements.
//!
//! [Selectors Level 4 § 4.1](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
//!
//! Ancestors are passed in explicitly, closest last, because the style pass
//! already keeps that stack while it walks the tree.

use marten_dom::ElementData;

use crate::stylesheet::{Selector, SimpleSelector};

/// Whether every part of `selector` holds for `element`.
///
/// - a non-empty tag must equal the element's tag name
/// - a non-empty id must equal the element's id
/// - every class must be on the element (case-sensitive, quotes stripped)
#[must_use]
pub fn matches_simple(element: &ElementData, selector: &SimpleSelector) -> bool {
    if !selector.tag_name.is_empty() && selector.tag_name != element.tag_name {
        return false;
    }

    if !selector.id.is_empty() && selector.id != element.id() {
        return false;
    }

    if selector.classes.is_empty() {
        return true;
    }
    let element_classes = element.classes();
    selector
        .classes
        .iter()
        .all(|class| element_classes.contains(&class.as_str()))
}

/// `A ... Z` matches when the element matches `Z` and any strict ancestor
/// matches `A`. Links between the two ends are not checked.
#[must_use]
pub fn matches_descendant(
    element: &ElementData,
    chain: &[SimpleSelector],
    ancestors: &[&ElementData],
) -> bool {
    let (Some(first), Some(last)) = (chain.first(), chain.last()) else {
        return false;
    };

    matches_simple(element, last)
        && ancestors
            .iter()
            .any(|ancestor| matches_simple(ancestor, first))
}

/// Dispatch on the selector kind.
#[must_use]
pub fn matches(element: &ElementData, selector: &Selector, ancestors: &[&ElementData]) -> bool {
    match selector {
        Selector::Simple(simple) => matches_simple(element, simple),
        Selector::Descendant(chain) => matches_descendant(element, chain, ancestors),
    }
}
