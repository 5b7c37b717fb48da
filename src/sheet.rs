//! The append-only stylesheet that collects generated rules.
//!
//! Rules are stored in two sections: global rules (resets, element selectors)
//! and class rules produced by element builds. Each entry is keyed by its cache
//! key and holds the canonical body the key was derived from, so a second
//! insert with the same key is either a no-op or a detected collision.
//!
//! # Thread Safety
//!
//! Insertion takes the write lock for the whole check-then-insert, so two
//! concurrent builds of the same style can't both insert, and a key can never
//! end up with two bodies. Lookups of existing keys only take the read lock.

use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::error::StyleError;
use crate::key::KeyKind;

/// Id of the `<style>` element produced by [`Stylesheet::style_tag`].
pub const STYLE_TAG_ID: &str = "stitchwork";

static GLOBAL_SHEET: Lazy<Arc<Stylesheet>> = Lazy::new(|| Arc::new(Stylesheet::new()));

#[derive(Debug, Clone, PartialEq, Eq)]
struct RuleGroup {
    canonical: String,
    rules: Vec<String>,
}

#[derive(Debug, Default)]
struct SheetState {
    globals: IndexMap<String, RuleGroup>,
    classes: IndexMap<String, RuleGroup>,
}

impl SheetState {
    fn section(&self, kind: KeyKind) -> &IndexMap<String, RuleGroup> {
        match kind {
            KeyKind::Global => &self.globals,
            KeyKind::Class => &self.classes,
        }
    }

    fn section_mut(&mut self, kind: KeyKind) -> &mut IndexMap<String, RuleGroup> {
        match kind {
            KeyKind::Global => &mut self.globals,
            KeyKind::Class => &mut self.classes,
        }
    }
}

/// A collection of generated CSS rules, deduplicated by cache key.
///
/// Most code uses the process-wide sheet from [`Stylesheet::global`]; tests
/// and isolated renders can create their own with [`Stylesheet::new`].
#[derive(Debug, Default)]
pub struct Stylesheet {
    state: RwLock<SheetState>,
}

impl Stylesheet {
    /// Creates an empty, independent stylesheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide stylesheet.
    pub fn global() -> Arc<Stylesheet> {
        Arc::clone(&GLOBAL_SHEET)
    }

    /// Inserts a rule group if its key is absent.
    ///
    /// Returns `Ok(true)` if the rules were inserted and `Ok(false)` if the key
    /// was already present with the same canonical body.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::KeyCollision`] if the key is present with a
    /// different body.
    pub(crate) fn insert(
        &self,
        kind: KeyKind,
        key: &str,
        canonical: String,
        rules: Vec<String>,
    ) -> Result<bool, StyleError> {
        if let Some(existing) = self.state.read().section(kind).get(key) {
            return check_same(key, existing, &canonical).map(|()| false);
        }

        let mut state = self.state.write();
        match state.section_mut(kind).entry(key.to_string()) {
            Entry::Occupied(existing) => check_same(key, existing.get(), &canonical).map(|()| false),
            Entry::Vacant(slot) => {
                tracing::debug!(key, rules = rules.len(), section = ?kind, "inserting style rules");
                slot.insert(RuleGroup { canonical, rules });
                Ok(true)
            }
        }
    }

    /// Returns true if a class or global entry exists for the key.
    pub fn contains(&self, key: &str) -> bool {
        let state = self.state.read();
        state.classes.contains_key(key) || state.globals.contains_key(key)
    }

    /// Number of distinct cached styles (global and class).
    pub fn len(&self) -> usize {
        let state = self.state.read();
        state.globals.len() + state.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of CSS rules the sheet emits.
    pub fn rule_count(&self) -> usize {
        let state = self.state.read();
        state
            .globals
            .values()
            .chain(state.classes.values())
            .map(|group| group.rules.len())
            .sum()
    }

    /// Renders every rule, global rules first, one rule per line.
    pub fn to_css(&self) -> String {
        let state = self.state.read();
        let mut css = String::new();
        for group in state.globals.values().chain(state.classes.values()) {
            for rule in &group.rules {
                css.push_str(rule);
                css.push('\n');
            }
        }
        css
    }

    /// Renders the sheet as an inline `<style>` element.
    pub fn style_tag(&self) -> String {
        format!(
            "<style id=\"{}\">\n{}</style>",
            STYLE_TAG_ID,
            self.to_css().replace("</style", "<\\/style")
        )
    }
}

fn check_same(key: &str, existing: &RuleGroup, canonical: &str) -> Result<(), StyleError> {
    if existing.canonical == canonical {
        tracing::trace!(key, "style cache hit");
        Ok(())
    } else {
        tracing::error!(
            key,
            existing = %existing.canonical,
            incoming = %canonical,
            "cache key collision with divergent rule body"
        );
        Err(StyleError::KeyCollision {
            key: key.to_string(),
        })
    }
}
