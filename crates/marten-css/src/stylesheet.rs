//! Stylesheet model handed over by the CSS parser.
//!
//! Shorthands (`margin`, `padding`, `border`) arrive already expanded into
//! longhands, and percentage lengths that must be resolved against an
//! ancestor arrive under a `REL-<property>` name.

use serde::Serialize;

use crate::values::Value;

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)
///
/// Specificities are compared by comparing the three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// Create a specificity from (ids, classes, tags).
    #[must_use]
    pub const fn new(ids: u32, classes: u32, tags: u32) -> Self {
        Self(ids, classes, tags)
    }
}

impl std::ops::Add for Specificity {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0, self.1 + other.1, self.2 + other.2)
    }
}

/// [§ 3.1 Structure and Terminology](https://www.w3.org/TR/selectors-4/#structure)
///
/// A compound of an optional type, an optional id and any number of classes.
/// Empty parts match anything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SimpleSelector {
    /// Type selector, `""` when absent.
    pub tag_name: String,
    /// Id selector, `""` when absent.
    pub id: String,
    /// Class selectors.
    pub classes: Vec<String>,
    specificity: Specificity,
}

impl SimpleSelector {
    /// The universal selector: matches every element.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require the element's tag name.
    #[must_use]
    pub fn tag(mut self, tag_name: &str) -> Self {
        if !tag_name.is_empty() {
            self.tag_name = tag_name.to_string();
            self.specificity.2 += 1;
        }
        self
    }

    /// Require the element's id.
    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        if !id.is_empty() {
            self.id = id.to_string();
            self.specificity.0 += 1;
        }
        self
    }

    /// Require a class on the element.
    #[must_use]
    pub fn class(mut self, class: &str) -> Self {
        if !class.is_empty() {
            self.classes.push(class.to_string());
            self.specificity.1 += 1;
        }
        self
    }

    /// Presence-weighted counts of this selector's parts.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }
}

/// A selector as it appears in a rule's selector list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Selector {
    /// A single compound selector.
    Simple(SimpleSelector),
    /// `A B ... Z`: matches when the element matches the last link and some
    /// ancestor matches the first. Middle links take part in specificity only.
    Descendant(Vec<SimpleSelector>),
}

impl Selector {
    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Component-wise sum over every simple selector in the chain.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Simple(simple) => simple.specificity(),
            Self::Descendant(chain) => chain
                .iter()
                .map(SimpleSelector::specificity)
                .fold(Specificity::default(), |acc, s| acc + s),
        }
    }
}

impl From<SimpleSelector> for Selector {
    fn from(simple: SimpleSelector) -> Self {
        Self::Simple(simple)
    }
}

/// A `name: value` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Declaration {
    /// Longhand property name, possibly `REL-` prefixed.
    pub name: String,
    /// The declared value.
    pub value: Value,
}

impl Declaration {
    /// Create a declaration.
    #[must_use]
    pub fn new(name: &str, value: Value) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// A style rule: a selector list and the declarations it applies.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Rule {
    /// Comma-separated selectors of the rule.
    pub selectors: Vec<Selector>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

impl Rule {
    /// Create a rule.
    #[must_use]
    pub const fn new(selectors: Vec<Selector>, declarations: Vec<Declaration>) -> Self {
        Self {
            selectors,
            declarations,
        }
    }
}

/// Rules in document order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Stylesheet {
    /// The rules, in the order they were declared.
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    /// Create a stylesheet.
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
    ///
    /// "Declarations from style sheets independently linked by the originating
    /// document are treated as if they were concatenated in linking order."
    #[must_use]
    pub fn merged<I>(sheets: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        Self {
            rules: sheets.into_iter().flat_map(|sheet| sheet.rules).collect(),
        }
    }

    /// The user-agent sheet followed by `author`, so author rules win ties.
    #[must_use]
    pub fn with_user_agent_defaults(author: Self) -> Self {
        Self::merged([crate::ua_stylesheet::ua_stylesheet().clone(), author])
    }
}
