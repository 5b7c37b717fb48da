//! The portfolio site's styles: theme, reset and element kinds.
//!
//! The theme and the element definitions are embedded YAML documents and go
//! through the same loaders an application config would:
//!
//! ```rust
//! use std::sync::Arc;
//! use stitchwork::site::{ElementKind, SiteStyles};
//! use stitchwork::{Selection, Stylesheet};
//!
//! let site = SiteStyles::with_sheet(Arc::new(Stylesheet::new())).unwrap();
//! let class = site.build(ElementKind::Text, &Selection::new().variant("size", "2")).unwrap();
//! assert!(class.starts_with("pd-c-"));
//! assert!(site.engine().stylesheet().to_css().starts_with("body{"));
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::Config;
use crate::declaration::Declaration;
use crate::engine::Engine;
use crate::error::StyleError;
use crate::global::GlobalStyles;
use crate::sheet::Stylesheet;
use crate::value::Value;
use crate::variant::{ElementDefinition, Selection, StyledElement};

const THEME_YAML: &str = include_str!("theme.yaml");
const ELEMENTS_YAML: &str = include_str!("elements.yaml");

/// The site's element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Box,
    Text,
    Container,
    Link,
    Button,
}

impl ElementKind {
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Box,
        ElementKind::Text,
        ElementKind::Container,
        ElementKind::Link,
        ElementKind::Button,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Box => "box",
            ElementKind::Text => "text",
            ElementKind::Container => "container",
            ElementKind::Link => "link",
            ElementKind::Button => "button",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| StyleError::ElementNotFound {
                name: s.to_string(),
            })
    }
}

/// The site's config: prefix, breakpoints bp1–bp4, theme scales and utils.
pub fn config() -> Result<Config, StyleError> {
    Config::from_yaml_str(THEME_YAML)
}

/// The site's element definitions, in declaration order.
pub fn definitions() -> Result<Vec<ElementDefinition>, StyleError> {
    let doc: serde_json::Value = serde_yaml::from_str(ELEMENTS_YAML)
        .map_err(|e| StyleError::malformed("<elements>", e.to_string()))?;
    let object = doc
        .as_object()
        .ok_or_else(|| StyleError::malformed("<elements>", "expected a map of elements"))?;

    object
        .iter()
        .map(|(name, def)| ElementDefinition::from_json(name, def))
        .collect()
}

/// The global reset.
pub fn global_styles() -> GlobalStyles {
    GlobalStyles::new()
        .rule(
            "body",
            Declaration::new()
                .set("backgroundColor", Value::token("black"))
                .set("color", Value::token("white"))
                .set("fontFamily", Value::token("sans"))
                .set("margin", 0)
                .nest(
                    "&.metaverse",
                    Declaration::new().set(
                        "background",
                        "linear-gradient(120deg, #eefadc, #fce5f3, #cee7fe)",
                    ),
                ),
        )
        .rule("ul", Declaration::new().set("paddingLeft", Value::token("4")))
        .rule("figure", Declaration::new().set("margin", 0))
        .rule(
            "pre, code",
            Declaration::new()
                .set("margin", 0)
                .set("fontFamily", Value::token("mono")),
        )
        .rule(
            "svg",
            Declaration::new()
                .set("display", "inline-block")
                .set("verticalAlign", "middle"),
        )
        .rule(
            "::selection",
            Declaration::new()
                .set("backgroundColor", "hsla(52, 100%, 49%, 0.99)")
                .set("color", Value::token("black")),
        )
}

/// An engine with the site's elements defined and its reset inserted.
#[derive(Debug)]
pub struct SiteStyles {
    engine: Engine,
}

impl SiteStyles {
    /// Sets up the site styles on the process-wide stylesheet.
    pub fn new() -> Result<Self, StyleError> {
        Self::from_engine(Engine::new(config()?)?)
    }

    /// Sets up the site styles on `sheet`.
    pub fn with_sheet(sheet: Arc<Stylesheet>) -> Result<Self, StyleError> {
        Self::from_engine(Engine::with_sheet(config()?, sheet)?)
    }

    fn from_engine(engine: Engine) -> Result<Self, StyleError> {
        for definition in definitions()? {
            engine.define(definition)?;
        }
        engine.global_css(&global_styles())?;
        Ok(Self { engine })
    }

    pub fn element(&self, kind: ElementKind) -> Result<StyledElement, StyleError> {
        self.engine.element(kind.as_str())
    }

    pub fn build(&self, kind: ElementKind, selection: &Selection) -> Result<String, StyleError> {
        self.engine.build(kind.as_str(), selection)
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn into_engine(self) -> Engine {
        self.engine
    }
}
