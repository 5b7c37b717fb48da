//! Named responsive breakpoints.

use indexmap::IndexMap;

use crate::error::StyleError;

/// Ordered breakpoint names and their media conditions.
///
/// Order is declaration order and must go from narrowest to widest; rules for
/// a later breakpoint are emitted after earlier ones so they win the cascade.
///
/// # Example
///
/// ```rust
/// use stitchwork::Breakpoints;
///
/// let media = Breakpoints::new()
///     .add("bp1", "(min-width: 520px)")
///     .add("bp2", "(min-width: 900px)");
/// assert_eq!(media.rank("bp2"), Some(1));
/// assert_eq!(media.condition("bp1"), Some("(min-width: 520px)"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakpoints {
    entries: IndexMap<String, String>,
}

impl Breakpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a breakpoint. Names are given without the `@`.
    pub fn add(mut self, name: &str, condition: &str) -> Self {
        self.entries.insert(
            name.trim_start_matches('@').to_string(),
            condition.to_string(),
        );
        self
    }

    pub fn condition(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    /// Position of the breakpoint, narrowest first.
    pub fn rank(&self, name: &str) -> Option<usize> {
        self.entries.get_index_of(name)
    }

    /// Like [`rank`](Self::rank), but an unknown name is an error.
    pub fn require(&self, name: &str) -> Result<usize, StyleError> {
        self.rank(name).ok_or_else(|| StyleError::UnknownBreakpoint {
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
