//! CSS Cascading
//!
//! This module resolves which declarations apply to an element per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/),
//! reduced to specificity and document order, plus the inheritance and
//! relative-length steps that run once the parent is known.

use std::collections::BTreeMap;

use marten_common::warning::warn_once;
use marten_dom::ElementData;

use crate::selector::matches;
use crate::stylesheet::{Rule, Specificity, Stylesheet};
use crate::values::Value;

/// Resolved `property -> value` map of one styled node.
///
/// Ordered so that two resolutions of the same input serialize identically.
pub type PropertyMap = BTreeMap<String, Value>;

/// Prefix the parser puts on percentage lengths awaiting an ancestor value.
pub const RELATIVE_PREFIX: &str = "REL-";

/// [§ 7.1 Inherited Properties](https://www.w3.org/TR/css-cascade-4/#inherited-property)
/// "Some properties are inherited from an ancestor element to its descendants."
pub const INHERITED_PROPERTIES: [&str; 5] =
    ["font-family", "font-style", "font-weight", "font-size", "color"];

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// A matched rule with its specificity for cascade ordering.
struct MatchedRule<'a> {
    specificity: Specificity,
    rule: &'a Rule,
}

/// A rule contributes once, with the specificity of its first matching
/// selector.
fn match_rule<'a>(
    element: &ElementData,
    rule: &'a Rule,
    ancestors: &[&ElementData],
) -> Option<MatchedRule<'a>> {
    rule.selectors
        .iter()
        .find(|selector| matches(element, selector, ancestors))
        .map(|selector| MatchedRule {
            specificity: selector.specificity(),
            rule,
        })
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
/// "The cascade takes an unordered list of declared values for a given property
/// on a given element, sorts them by their declaration's precedence..."
///
/// `ancestors` are the element's strict ancestors, closest last. An element
/// matching nothing gets an empty map.
#[must_use]
pub fn specified_values(
    element: &ElementData,
    stylesheet: &Stylesheet,
    ancestors: &[&ElementData],
) -> PropertyMap {
    // STEP 1: Collect matches in document order.
    let mut matched: Vec<MatchedRule<'_>> = stylesheet
        .rules
        .iter()
        .filter_map(|rule| match_rule(element, rule, ancestors))
        .collect();

    // [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
    // STEP 2: Sort by specificity, lower first. The sort is stable, so among
    // equal specificities the later declaration stays later.
    matched.sort_by(|a, b| a.specificity.cmp(&b.specificity));

    // [§ 6.4.4 Order of Appearance](https://www.w3.org/TR/css-cascade-4/#cascade-order)
    // STEP 3: "The last declaration in document order wins."
    let mut values = PropertyMap::new();
    for m in matched {
        for decl in &m.rule.declarations {
            let _ = values.insert(decl.name.clone(), decl.value.clone());
        }
    }
    values
}

/// Phrase elements force their own presentation after the cascade.
pub fn apply_phrase_tag(tag_name: &str, values: &mut PropertyMap) {
    let forced = match tag_name {
        "em" | "i" => ("font-style", "italic"),
        "b" | "strong" | "bold" => ("font-weight", "bold"),
        _ => return,
    };
    let _ = values.insert("display".to_string(), Value::keyword("inline"));
    let _ = values.insert(forced.0.to_string(), Value::keyword(forced.1));
}

/// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// Copy the parent's resolved value of each inherited property the node
/// lacks, then resolve `REL-` lengths against the parent.
pub fn inherit_from_parent(values: &mut PropertyMap, parent: &PropertyMap) {
    for name in INHERITED_PROPERTIES {
        if values.get(name).is_some_and(Value::is_present) {
            continue;
        }
        if let Some(inherited) = parent.get(name).filter(|v| v.is_present()) {
            let _ = values.insert(name.to_string(), inherited.clone());
        }
    }

    resolve_relative_lengths(values, parent);
}

/// `REL-<name>: N%` becomes `N / 100 * parent.<name>` in the parent's unit.
///
/// The entry keeps its `REL-` key, so plain lookups of `<name>` still miss.
fn resolve_relative_lengths(values: &mut PropertyMap, parent: &PropertyMap) {
    for (key, value) in values.iter_mut() {
        let Some(name) = key.strip_prefix(RELATIVE_PREFIX) else {
            continue;
        };
        let Some(parent_value) = parent.get(name).filter(|v| v.is_present()) else {
            continue;
        };

        let (Ok((percent, _)), Ok((base, unit))) = (value.as_length(), parent_value.as_length())
        else {
            warn_once(
                "Style",
                &format!(
                    "cannot resolve a relative {} against a {} parent value",
                    value.kind(),
                    parent_value.kind()
                ),
            );
            continue;
        };

        *value = Value::length(percent / 100.0 * base, unit);
    }
}
