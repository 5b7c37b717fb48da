//! Registry of defined element kinds.
//!
//! Element kinds are registered once, at startup, and looked up by name from
//! markup code that only knows the kind as a string (templates, config-driven
//! pages). Registration is strict: defining a name twice is a configuration
//! error rather than a silent replacement.

use indexmap::IndexMap;

use super::builder::StyledElement;
use crate::error::StyleError;

/// Named element builders in registration order.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    elements: IndexMap<String, StyledElement>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a builder under its element name.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::DuplicateElement`] if the name is taken.
    pub fn add(&mut self, element: StyledElement) -> Result<(), StyleError> {
        let name = element.name().to_string();
        if self.elements.contains_key(&name) {
            return Err(StyleError::DuplicateElement { name });
        }
        self.elements.insert(name, element);
        Ok(())
    }

    /// Looks up a builder by name.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::ElementNotFound`] if no element has that name.
    pub fn get(&self, name: &str) -> Result<&StyledElement, StyleError> {
        self.elements
            .get(name)
            .ok_or_else(|| StyleError::ElementNotFound {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns registered element names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(|s| s.as_str())
    }
}
