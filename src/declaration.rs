//! Style declarations and layered merging.
//!
//! A [`Declaration`] is an ordered tree. Its keys are one of:
//!
//! - a property (`fontSize`, `mx`), holding a [`Value`]
//! - a nested selector (`&:hover`, `.metaverse &`, `:focus`), holding a block
//! - a breakpoint (`@bp1`), holding a block applied at that media condition
//! - a raw media query (`@media (hover: hover)`), holding a block
//!
//! Merging is what gives the engine its precedence rules: a later layer's
//! property replaces an earlier one and moves to the end of its block, so it
//! also wins over related longhand/shorthand properties set earlier.

use indexmap::IndexMap;

use crate::error::StyleError;
use crate::value::Value;

/// One entry of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Value(Value),
    Block(Declaration),
}

/// How a declaration key is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyKind<'a> {
    Property,
    Selector,
    /// `@initial`: applies unconditionally.
    Initial,
    /// `@bp1` → `"bp1"`.
    Breakpoint(&'a str),
    /// A literal at-rule prelude such as `@media (hover: hover)`.
    Media(&'a str),
}

pub(crate) const INITIAL: &str = "initial";

pub(crate) fn classify(key: &str) -> KeyKind<'_> {
    if let Some(rest) = key.strip_prefix('@') {
        if rest.starts_with("media") {
            KeyKind::Media(key)
        } else if rest == INITIAL {
            KeyKind::Initial
        } else {
            KeyKind::Breakpoint(rest)
        }
    } else if key.contains('&') || key.starts_with(':') || key.contains(' ') {
        KeyKind::Selector
    } else {
        KeyKind::Property
    }
}

/// An ordered style declaration.
///
/// # Example
///
/// ```rust
/// use stitchwork::{Declaration, Value};
///
/// let card = Declaration::new()
///     .set("padding", Value::token("3"))
///     .set("bc", Value::token("yellow"))
///     .set("position", "relative")
///     .nest(".metaverse &", Declaration::new().set("bc", "transparent"))
///     .at("bp1", Declaration::new().set("padding", Value::token("4")));
/// assert_eq!(card.len(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    entries: IndexMap<String, Entry>,
}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, returning the declaration for chaining.
    pub fn set(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.insert(property.to_string(), Entry::Value(value.into()));
        self
    }

    /// Adds a nested selector block (`&:hover`, `.metaverse &`).
    pub fn nest(mut self, selector: &str, block: Declaration) -> Self {
        self.insert(selector.to_string(), Entry::Block(block));
        self
    }

    /// Adds a block applied from the named breakpoint upwards.
    pub fn at(mut self, breakpoint: &str, block: Declaration) -> Self {
        let key = format!("@{}", breakpoint.trim_start_matches('@'));
        self.insert(key, Entry::Block(block));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Layers `other` on top of `self`.
    ///
    /// Properties from `other` replace existing ones and move to the end of the
    /// block. Blocks under the same key are merged recursively.
    pub fn merge(&mut self, other: &Declaration) {
        for (key, entry) in &other.entries {
            self.insert(key.clone(), entry.clone());
        }
    }

    /// Consuming form of [`merge`](Self::merge).
    pub fn merged(mut self, other: &Declaration) -> Self {
        self.merge(other);
        self
    }

    fn insert(&mut self, key: String, entry: Entry) {
        if let Entry::Block(block) = &entry {
            if let Some(Entry::Block(existing)) = self.entries.get_mut(&key) {
                existing.merge(block);
                return;
            }
        }
        self.entries.shift_remove(&key);
        self.entries.insert(key, entry);
    }

    /// Parses a declaration from a JSON-shaped document.
    ///
    /// Strings go through [`Value::parse`], so `$token` words become token
    /// references; numbers are kept verbatim; objects become nested blocks;
    /// nulls are skipped.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, StyleError> {
        Self::from_json_at(value, "")
    }

    pub(crate) fn from_json_at(value: &serde_json::Value, path: &str) -> Result<Self, StyleError> {
        let object = value
            .as_object()
            .ok_or_else(|| StyleError::malformed(display_path(path), "expected a map"))?;

        let mut decl = Declaration::new();
        for (key, item) in object {
            let item_path = join_path(path, key);
            let entry = match item {
                serde_json::Value::Null => continue,
                serde_json::Value::String(text) => Entry::Value(Value::parse(text)),
                serde_json::Value::Number(n) => Entry::Value(Value::literal(n.to_string())),
                serde_json::Value::Object(_) => {
                    Entry::Block(Declaration::from_json_at(item, &item_path)?)
                }
                other => {
                    return Err(StyleError::malformed(
                        item_path,
                        format!("unsupported value {}", other),
                    ))
                }
            };
            decl.insert(key.clone(), entry);
        }
        Ok(decl)
    }
}

pub(crate) fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}
