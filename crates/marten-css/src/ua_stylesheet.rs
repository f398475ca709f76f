//! User-Agent Stylesheet
//!
//! [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html)
//!
//! "User agents are expected to have a default style sheet that presents elements
//! of HTML documents in ways consistent with general user expectations."
//!
//! The CSS parser is not part of this crate, so the sheet is assembled from
//! rule values directly. It is placed in front of author sheets, which makes
//! author rules win every specificity tie.

use std::sync::OnceLock;

use crate::stylesheet::{Declaration, Rule, SimpleSelector, Stylesheet};
use crate::values::Value;

/// [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
///
/// "The following elements must have their 'display' property set to 'none'."
const HIDDEN_ELEMENTS: &[&str] = &["head", "link", "meta", "script", "style", "title"];

/// [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
///
/// "The following elements must have their 'display' property set to 'block'."
const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "center",
    "div",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "ul",
];

/// [§ 15.3.6 Sections and headings](https://html.spec.whatwg.org/multipage/rendering.html#sections-and-headings)
///
/// "h1 { font-size: 2.00em }" through "h6 { font-size: 0.67em }", taken
/// against a 16px base.
const HEADING_SIZES_PX: &[(&str, f32)] = &[
    ("h1", 32.0),
    ("h2", 24.0),
    ("h3", 18.72),
    ("h4", 16.0),
    ("h5", 13.28),
    ("h6", 10.72),
];

fn tag_rule(tags: &[&str], declarations: Vec<Declaration>) -> Rule {
    Rule::new(
        tags.iter()
            .map(|tag| SimpleSelector::new().tag(tag).into())
            .collect(),
        declarations,
    )
}

fn build_ua_stylesheet() -> Stylesheet {
    let mut rules = vec![
        tag_rule(
            HIDDEN_ELEMENTS,
            vec![Declaration::new("display", Value::keyword("none"))],
        ),
        tag_rule(
            BLOCK_ELEMENTS,
            vec![Declaration::new("display", Value::keyword("block"))],
        ),
    ];

    // "h1, h2, h3, h4, h5, h6 { font-weight: bold; }"
    rules.extend(HEADING_SIZES_PX.iter().map(|&(tag, size)| {
        tag_rule(
            &[tag],
            vec![
                Declaration::new("font-weight", Value::keyword("bold")),
                Declaration::new("font-size", Value::px(size)),
            ],
        )
    }));

    Stylesheet::new(rules)
}

/// The process-wide user-agent stylesheet, built on first use.
#[must_use]
pub fn ua_stylesheet() -> &'static Stylesheet {
    static UA: OnceLock<Stylesheet> = OnceLock::new();
    UA.get_or_init(build_ua_stylesheet)
}
