//! Global rules: resets and element selectors.
//!
//! Global declarations go through the same resolution as element styles
//! (utils, tokens, nested selectors, breakpoints) but compile against their
//! own selector instead of a generated class.

use indexmap::IndexMap;

use crate::declaration::Declaration;
use crate::error::StyleError;

/// Selector → declaration pairs inserted once into the global section.
///
/// # Example
///
/// ```rust
/// use stitchwork::{Declaration, GlobalStyles, Value};
///
/// let reset = GlobalStyles::new()
///     .rule("body", Declaration::new().set("margin", 0))
///     .rule("ul", Declaration::new().set("paddingLeft", Value::token("4")));
/// assert_eq!(reset.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalStyles {
    rules: IndexMap<String, Declaration>,
}

impl GlobalStyles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. A repeated selector is merged into the earlier one.
    pub fn rule(mut self, selector: &str, decl: Declaration) -> Self {
        self.rules
            .entry(selector.to_string())
            .or_default()
            .merge(&decl);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Declaration)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Parses `{ selector: { property: value, ... }, ... }`.
    pub fn from_json(doc: &serde_json::Value) -> Result<Self, StyleError> {
        let object = doc
            .as_object()
            .ok_or_else(|| StyleError::malformed("<global>", "expected a map of selectors"))?;

        let mut styles = GlobalStyles::new();
        for (selector, decl) in object {
            styles = styles.rule(selector, Declaration::from_json_at(decl, selector)?);
        }
        Ok(styles)
    }
}
