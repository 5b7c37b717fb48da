//! Build requests: chosen variants, responsive choices and overrides.

use indexmap::IndexMap;

use crate::declaration::{Declaration, INITIAL};

/// The value chosen for one variant axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantChoice {
    /// The same value at every width.
    Value(String),
    /// Breakpoint name → value; `initial` applies below the first breakpoint.
    Responsive(IndexMap<String, String>),
}

impl VariantChoice {
    /// Builds a responsive choice from `(breakpoint, value)` pairs.
    ///
    /// Breakpoint names may be written with or without `@`.
    ///
    /// ```rust
    /// use stitchwork::VariantChoice;
    ///
    /// let size = VariantChoice::responsive([("@initial", "4"), ("@bp1", "5")]);
    /// assert_eq!(size.initial(), Some("4"));
    /// ```
    pub fn responsive<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        VariantChoice::Responsive(
            pairs
                .into_iter()
                .map(|(bp, value)| (bp.as_ref().trim_start_matches('@').to_string(), value.into()))
                .collect(),
        )
    }

    /// The unconditional value, if any.
    pub fn initial(&self) -> Option<&str> {
        match self {
            VariantChoice::Value(value) => Some(value.as_str()),
            VariantChoice::Responsive(map) => map.get(INITIAL).map(String::as_str),
        }
    }

    /// Breakpoint-specific values, excluding `initial`.
    pub(crate) fn at_breakpoints(&self) -> impl Iterator<Item = (&str, &str)> {
        let map = match self {
            VariantChoice::Value(_) => None,
            VariantChoice::Responsive(map) => Some(map),
        };
        map.into_iter()
            .flat_map(|m| m.iter())
            .filter(|(bp, _)| bp.as_str() != INITIAL)
            .map(|(bp, value)| (bp.as_str(), value.as_str()))
    }
}

impl From<&str> for VariantChoice {
    fn from(value: &str) -> Self {
        VariantChoice::Value(value.to_string())
    }
}

impl From<String> for VariantChoice {
    fn from(value: String) -> Self {
        VariantChoice::Value(value)
    }
}

/// One `build` request.
///
/// # Example
///
/// ```rust
/// use stitchwork::{Declaration, Selection, Value, VariantChoice};
///
/// let selection = Selection::new()
///     .variant("size", VariantChoice::responsive([("@initial", "4"), ("@bp1", "5")]))
///     .css(Declaration::new().set("mt", Value::token("5")))
///     .class("intro");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub(crate) variants: IndexMap<String, VariantChoice>,
    pub(crate) css: Option<Declaration>,
    pub(crate) classes: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chooses a value for an axis. Later calls for the same axis replace
    /// earlier ones.
    pub fn variant(mut self, axis: &str, choice: impl Into<VariantChoice>) -> Self {
        self.variants.insert(axis.to_string(), choice.into());
        self
    }

    /// Sets the raw declaration override, layered last.
    pub fn css(mut self, css: Declaration) -> Self {
        self.css = Some(css);
        self
    }

    /// Appends an extra class name to the result.
    pub fn class(mut self, name: &str) -> Self {
        self.classes.push(name.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_responsive_strips_at() {
        let choice = VariantChoice::responsive([("@initial", "4"), ("bp1", "5"), ("@bp2", "6")]);
        assert_eq!(choice.initial(), Some("4"));
        assert_eq!(
            choice.at_breakpoints().collect::<Vec<_>>(),
            vec![("bp1", "5"), ("bp2", "6")]
        );
    }

    #[test]
    fn test_responsive_without_initial() {
        let choice = VariantChoice::responsive([("@bp1", "5")]);
        assert_eq!(choice.initial(), None);
    }

    #[test]
    fn test_plain_value_has_no_breakpoints() {
        let choice = VariantChoice::from("2");
        assert_eq!(choice.initial(), Some("2"));
        assert_eq!(choice.at_breakpoints().count(), 0);
    }

    #[test]
    fn test_selection_replaces_axis() {
        let selection = Selection::new().variant("size", "1").variant("size", "2");
        assert_eq!(selection.variants.len(), 1);
        assert_eq!(selection.variants["size"].initial(), Some("2"));
    }
}
