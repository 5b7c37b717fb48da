//! Theme struct for building token scales.

use indexmap::IndexMap;

use crate::error::StyleError;
use crate::value::{negate_css, TokenRef, Value};

/// A collection of token scales (`colors`, `space`, `fonts`, …).
///
/// Token values are usually literals but may alias other tokens, which lets a
/// theme layer semantic names over visual ones. Aliases without an explicit
/// scale point into the same scale.
///
/// # Example
///
/// ```rust
/// use stitchwork::{Theme, Value};
///
/// let theme = Theme::new()
///     // Visual layer - concrete values
///     .add("colors", "gray900", "hsl(0, 0%, 9%)")
///     .add("colors", "yellow", "hsl(52, 100%, 49%)")
///     // Semantic layer - aliases
///     .add("colors", "black", Value::token("gray900"))
///     .add("colors", "accent", Value::token("yellow"));
///
/// let resolved = theme.resolve().unwrap();
/// assert_eq!(resolved.get("colors", "black"), Some("hsl(0, 0%, 9%)"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    pub(crate) scales: IndexMap<String, IndexMap<String, Value>>,
}

impl Theme {
    /// Creates an empty theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token to a scale, returning an updated theme for chaining.
    pub fn add<V: Into<Value>>(mut self, scale: &str, name: &str, value: V) -> Self {
        self.scales
            .entry(scale.to_string())
            .or_default()
            .insert(name.to_string(), value.into());
        self
    }

    /// Returns true if the scale declares the token.
    pub fn has(&self, scale: &str, name: &str) -> bool {
        self.scales
            .get(scale)
            .is_some_and(|tokens| tokens.contains_key(name))
    }

    pub fn is_empty(&self) -> bool {
        self.scales.values().all(IndexMap::is_empty)
    }

    /// Validates every alias and produces the frozen, concrete theme.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::UnresolvedAlias`] for aliases to missing tokens and
    /// [`StyleError::CycleDetected`] for alias loops.
    pub fn resolve(&self) -> Result<ResolvedTheme, StyleError> {
        let mut scales = IndexMap::new();
        for (scale, tokens) in &self.scales {
            let mut resolved = IndexMap::new();
            for name in tokens.keys() {
                let mut path = Vec::new();
                let value = self.resolve_token(scale, name, &mut path)?;
                resolved.insert(name.clone(), value);
            }
            scales.insert(scale.clone(), resolved);
        }
        Ok(ResolvedTheme { scales })
    }

    fn resolve_token(
        &self,
        scale: &str,
        name: &str,
        path: &mut Vec<String>,
    ) -> Result<String, StyleError> {
        let id = format!("{}.{}", scale, name);
        if path.contains(&id) {
            path.push(id);
            return Err(StyleError::CycleDetected { path: path.clone() });
        }

        let value = match self.scales.get(scale).and_then(|tokens| tokens.get(name)) {
            Some(value) => value,
            None => {
                let from = path.last().cloned().unwrap_or_else(|| id.clone());
                return Err(StyleError::UnresolvedAlias { from, to: id });
            }
        };

        path.push(id);
        let resolved = self.resolve_value(scale, value, path)?;
        path.pop();
        Ok(resolved)
    }

    fn resolve_value(
        &self,
        scale: &str,
        value: &Value,
        path: &mut Vec<String>,
    ) -> Result<String, StyleError> {
        match value {
            Value::Literal(text) => Ok(text.clone()),
            Value::Token(TokenRef {
                scale: target_scale,
                name,
                negated,
            }) => {
                let target_scale = target_scale.as_deref().unwrap_or(scale);
                let resolved = self.resolve_token(target_scale, name, path)?;
                Ok(if *negated {
                    negate_css(&resolved)
                } else {
                    resolved
                })
            }
            Value::Composite(parts) => {
                let parts = parts
                    .iter()
                    .map(|part| self.resolve_value(scale, part, path))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(parts.concat())
            }
        }
    }
}

/// A theme whose aliases have all been resolved to concrete CSS text.
///
/// Produced once by [`Theme::resolve`]; there is no way to mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedTheme {
    scales: IndexMap<String, IndexMap<String, String>>,
}

impl ResolvedTheme {
    pub fn get(&self, scale: &str, name: &str) -> Option<&str> {
        self.scales
            .get(scale)
            .and_then(|tokens| tokens.get(name))
            .map(String::as_str)
    }

    pub fn has_scale(&self, scale: &str) -> bool {
        self.scales.contains_key(scale)
    }

    /// Iterates scales and their tokens in declaration order.
    pub fn scales(&self) -> impl Iterator<Item = (&str, &IndexMap<String, String>)> {
        self.scales.iter().map(|(k, v)| (k.as_str(), v))
    }
}
