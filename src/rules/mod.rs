//! Label rewrite rules.
//!
//! A rule file maps TE class/subclass labels to replacement labels. Rules come
//! in three tiers, checked in priority order:
//!
//! - `explicit`: the whole label must match the rule's match term.
//! - `wildcard_by_class` (`$/S = ...`): any class with subclass `S`.
//! - `wildcard_by_subclass` (`C/* = ...`): any subclass of class `C`.
//!
//! Wildcard replacements are templates; a `$` part stands for the matched
//! class and a `*` part for the matched subclass.

pub mod loader;
pub mod rewrite;

use ahash::AHashMap;

pub use loader::{load_rules, parse_rules};

/// Placeholder for "any class" in a match term, "the matched class" in a template.
pub const CLASS_WILDCARD: &str = "$";

/// Placeholder for "any subclass" in a match term, "the matched subclass" in a template.
pub const SUBCLASS_WILDCARD: &str = "*";

/// Replacement of a wildcard rule: one or two `/`-separated parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    parts: Vec<String>,
}

impl Template {
    pub fn new<S: Into<String>>(parts: impl IntoIterator<Item = S>) -> Self {
        Template {
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }

    /// Replace `$` parts with `class` and `*` parts with `subclass`, joined by `/`.
    pub fn substitute(&self, class: &str, subclass: &str) -> String {
        self.parts
            .iter()
            .map(|part| match part.as_str() {
                CLASS_WILDCARD => class,
                SUBCLASS_WILDCARD => subclass,
                other => other,
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// The three rule tiers loaded from a rule file.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    /// Full label -> replacement label.
    pub explicit: AHashMap<String, String>,
    /// Subclass key -> template, from `$/subclass` rules.
    pub wildcard_by_class: AHashMap<String, Template>,
    /// Class key -> template, from `class/*` rules.
    pub wildcard_by_subclass: AHashMap<String, Template>,
}

impl RuleTable {
    /// An empty table leaves every label unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty()
            && self.wildcard_by_class.is_empty()
            && self.wildcard_by_subclass.is_empty()
    }

    pub fn len(&self) -> usize {
        self.explicit.len() + self.wildcard_by_class.len() + self.wildcard_by_subclass.len()
    }
}

/// Which tier, if any, a label resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMatch<'a> {
    Explicit(&'a str),
    WildcardClass(&'a Template),
    WildcardSubclass(&'a Template),
    NoMatch,
}
