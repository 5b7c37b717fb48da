//! Engine configuration: prefix, breakpoints, theme, theme map and utils.
//!
//! A [`Config`] is built in code or loaded from a YAML/JSON document:
//!
//! ```yaml
//! prefix: pd
//! media:
//!   bp1: "(min-width: 520px)"
//!   bp2: "(min-width: 900px)"
//! theme:
//!   colors:
//!     black: "hsl(0, 0%, 0%)"
//!     text: "$black"
//!   space:
//!     "1": 5px
//! themeMap:
//!   mixBlendMode: blends
//! utils:
//!   mx: [marginLeft, marginRight]
//!   bc: backgroundColor
//! ```
//!
//! The engine freezes the config once ([`Config::freeze`]) and never mutates
//! it afterwards.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::StyleError;
use crate::theme::{Breakpoints, ResolvedTheme, Theme};
use crate::value::Value;

/// Style engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub(crate) prefix: String,
    pub(crate) media: Breakpoints,
    pub(crate) theme: Theme,
    pub(crate) theme_map: IndexMap<String, String>,
    pub(crate) utils: IndexMap<String, Vec<String>>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix prepended to every generated class name.
    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }

    pub fn media(mut self, media: Breakpoints) -> Self {
        self.media = media;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Resolves unscoped tokens on `property` against `scale`.
    pub fn theme_map(mut self, property: &str, scale: &str) -> Self {
        self.theme_map
            .insert(property.to_string(), scale.to_string());
        self
    }

    /// Declares a shorthand property expanding to `properties`.
    pub fn util(mut self, name: &str, properties: &[&str]) -> Self {
        self.utils.insert(
            name.to_string(),
            properties.iter().map(|p| p.to_string()).collect(),
        );
        self
    }

    /// Parses a YAML config document.
    pub fn from_yaml_str(source: &str) -> Result<Self, StyleError> {
        let raw: RawConfig = serde_yaml::from_str(source)
            .map_err(|e| StyleError::malformed("<config>", e.to_string()))?;
        raw.into_config()
    }

    /// Parses a JSON config document.
    pub fn from_json_str(source: &str) -> Result<Self, StyleError> {
        let raw: RawConfig = serde_json::from_str(source)
            .map_err(|e| StyleError::malformed("<config>", e.to_string()))?;
        raw.into_config()
    }

    /// Loads a config file, choosing the format by extension.
    ///
    /// `.yaml`/`.yml` are read as YAML and `.json` as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| StyleError::ReadError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&source),
            Some("json") => Self::from_json_str(&source),
            _ => Err(StyleError::ReadError {
                path: path.to_path_buf(),
                message: "unsupported config extension (expected .yaml, .yml or .json)"
                    .to_string(),
            }),
        }
    }

    /// Validates the config and resolves the theme.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid prefix, a util that expands to nothing,
    /// or any theme alias problem.
    pub fn freeze(self) -> Result<ResolvedConfig, StyleError> {
        if !self
            .prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(StyleError::malformed(
                "prefix",
                format!("'{}' is not a valid class name prefix", self.prefix),
            ));
        }
        if let Some((name, _)) = self.utils.iter().find(|(_, props)| props.is_empty()) {
            return Err(StyleError::malformed(
                format!("utils.{}", name),
                "a util must expand to at least one property",
            ));
        }

        let theme = self.theme.resolve()?;
        Ok(ResolvedConfig {
            prefix: self.prefix,
            media: self.media,
            theme,
            theme_map: self.theme_map,
            utils: self.utils,
        })
    }
}

/// A validated config with its theme resolved. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub(crate) prefix: String,
    pub(crate) media: Breakpoints,
    pub(crate) theme: ResolvedTheme,
    pub(crate) theme_map: IndexMap<String, String>,
    pub(crate) utils: IndexMap<String, Vec<String>>,
}

impl ResolvedConfig {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn media(&self) -> &Breakpoints {
        &self.media
    }

    pub fn theme(&self) -> &ResolvedTheme {
        &self.theme
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    prefix: String,
    #[serde(default)]
    media: IndexMap<String, String>,
    #[serde(default)]
    theme: IndexMap<String, IndexMap<String, serde_json::Value>>,
    #[serde(default)]
    theme_map: IndexMap<String, String>,
    #[serde(default)]
    utils: IndexMap<String, UtilSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UtilSpec {
    One(String),
    Many(Vec<String>),
}

impl RawConfig {
    fn into_config(self) -> Result<Config, StyleError> {
        let media = self
            .media
            .iter()
            .fold(Breakpoints::new(), |media, (name, condition)| {
                media.add(name, condition)
            });

        let mut theme = Theme::new();
        for (scale, tokens) in &self.theme {
            for (name, raw) in tokens {
                let value = match raw {
                    serde_json::Value::String(text) => Value::parse(text),
                    serde_json::Value::Number(n) => Value::literal(n.to_string()),
                    other => {
                        return Err(StyleError::malformed(
                            format!("theme.{}.{}", scale, name),
                            format!("expected a string or number, got {}", other),
                        ))
                    }
                };
                theme = theme.add(scale, name, value);
            }
        }

        let utils = self
            .utils
            .into_iter()
            .map(|(name, spec)| {
                let props = match spec {
                    UtilSpec::One(prop) => vec![prop],
                    UtilSpec::Many(props) => props,
                };
                (name, props)
            })
            .collect();

        Ok(Config {
            prefix: self.prefix,
            media,
            theme,
            theme_map: self.theme_map,
            utils,
        })
    }
}
