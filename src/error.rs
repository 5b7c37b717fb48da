//! Style engine errors.

use std::path::PathBuf;

/// Error returned when a theme, definition or build request is invalid.
///
/// Every variant except [`StyleError::KeyCollision`] is a configuration error:
/// the input has to be fixed by the application developer. Nothing is
/// registered or inserted into a stylesheet when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    /// A token reference names a token that doesn't exist in its scale.
    #[error("unknown token '${name}' in scale '{scale}' (property '{property}')")]
    UnknownToken {
        property: String,
        scale: String,
        name: String,
    },

    /// A token reference names a scale the theme doesn't declare.
    #[error("unknown theme scale '{scale}' referenced by '${name}'")]
    UnknownScale { scale: String, name: String },

    /// An unscoped token is used on a property with no theme scale.
    #[error("property '{property}' has no theme scale; write '${{scale}}${name}' to pick one")]
    UnmappedToken { property: String, name: String },

    /// A theme alias points at a token that doesn't exist.
    #[error("theme token '{from}' aliases non-existent token '{to}'")]
    UnresolvedAlias { from: String, to: String },

    /// Theme aliases form a cycle.
    #[error("cycle detected in theme aliases: {}", .path.join(" -> "))]
    CycleDetected { path: Vec<String> },

    /// A breakpoint name is not declared in the media config.
    #[error("unknown breakpoint '@{name}'")]
    UnknownBreakpoint { name: String },

    /// The same variant axis is declared twice on one element.
    #[error("element '{element}' declares variant axis '{axis}' more than once")]
    DuplicateAxis { element: String, axis: String },

    /// A default variant names an undeclared axis or value.
    #[error("element '{element}' has default '{axis}: {value}' which is not a declared variant")]
    UnknownDefault {
        element: String,
        axis: String,
        value: String,
    },

    /// An element kind with this name is already registered.
    #[error("element '{name}' is already defined")]
    DuplicateElement { name: String },

    /// No element kind with this name is registered.
    #[error("element not found: \"{name}\"")]
    ElementNotFound { name: String },

    /// A literal value would break out of its CSS rule.
    #[error("invalid value for '{property}': {value:?} ({reason})")]
    InvalidValue {
        property: String,
        value: String,
        reason: String,
    },

    /// A declaration or config document has the wrong shape.
    #[error("malformed style input at '{path}': {message}")]
    Malformed { path: String, message: String },

    /// A config file could not be read.
    #[error("failed to read config \"{}\": {message}", .path.display())]
    ReadError { path: PathBuf, message: String },

    /// Two different rule bodies derived the same cache key.
    #[error("cache key '{key}' already holds a different rule body")]
    KeyCollision { key: String },

    /// The process-wide engine was installed twice.
    #[error("the global style engine is already installed")]
    AlreadyInstalled,
}

impl StyleError {
    pub(crate) fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        StyleError::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}
