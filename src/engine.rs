//! The style engine: frozen config, element registry and stylesheet.
//!
//! An [`Engine`] is constructed once from a [`Config`]. Construction resolves
//! the theme and validates the config; from then on the theme is read-only.
//! Elements are registered with [`Engine::define`], which checks every token
//! and breakpoint the definition references before anything is registered.
//!
//! ```rust
//! use std::sync::Arc;
//! use stitchwork::{Config, Declaration, Engine, Selection, Stylesheet, Theme, Value, VariantAxis};
//!
//! let config = Config::new().theme(
//!     Theme::new()
//!         .add("fontSizes", "1", "13px")
//!         .add("fontSizes", "2", "14px"),
//! );
//! let engine = Engine::with_sheet(config, Arc::new(Stylesheet::new())).unwrap();
//! let text = engine
//!     .define_element(
//!         "text",
//!         Declaration::new().set("margin", "0"),
//!         [(
//!             "size",
//!             VariantAxis::new()
//!                 .value("1", Declaration::new().set("fontSize", Value::token("1")))
//!                 .value("2", Declaration::new().set("fontSize", Value::token("2"))),
//!         )],
//!         [("size", "1")],
//!     )
//!     .unwrap();
//!
//! let class = text.build(&Selection::new().variant("size", "2")).unwrap();
//! assert!(engine.stylesheet().to_css().contains("font-size:14px"));
//! # let _ = class;
//! ```
//!
//! # Process-wide engine
//!
//! [`install`] stores an engine for the lifetime of the process so markup
//! code can reach it through [`global`]. It succeeds exactly once.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;

use crate::compile::compile;
use crate::config::{Config, ResolvedConfig};
use crate::declaration::Declaration;
use crate::error::StyleError;
use crate::global::GlobalStyles;
use crate::key::{derive_key, KeyKind};
use crate::resolve::{check_prelude, Resolver};
use crate::sheet::Stylesheet;
use crate::variant::{
    Element, ElementDefinition, ElementRegistry, Selection, StyledElement, VariantAxis,
};

static ENGINE: OnceCell<Engine> = OnceCell::new();

/// State shared by an engine and every builder it hands out.
#[derive(Debug)]
pub(crate) struct EngineContext {
    pub config: ResolvedConfig,
    pub sheet: Arc<Stylesheet>,
}

/// Defines element kinds and builds their classes into a stylesheet.
#[derive(Debug)]
pub struct Engine {
    context: Arc<EngineContext>,
    registry: RwLock<ElementRegistry>,
}

impl Engine {
    /// Creates an engine writing to the process-wide stylesheet.
    ///
    /// # Errors
    ///
    /// Returns the first config error: invalid prefix, empty util, dangling
    /// or cyclic theme alias.
    pub fn new(config: Config) -> Result<Self, StyleError> {
        Self::with_sheet(config, Stylesheet::global())
    }

    /// Creates an engine writing to `sheet`.
    pub fn with_sheet(config: Config, sheet: Arc<Stylesheet>) -> Result<Self, StyleError> {
        let config = config.freeze()?;
        tracing::debug!(
            prefix = %config.prefix,
            breakpoints = config.media.len(),
            utils = config.utils.len(),
            "style engine configured"
        );
        Ok(Self {
            context: Arc::new(EngineContext { config, sheet }),
            registry: RwLock::new(ElementRegistry::new()),
        })
    }

    /// Validates a definition and returns its builder without registering it.
    ///
    /// The base style, every variant value and every compound declaration are
    /// resolved once, so unknown tokens, unmapped properties, unknown
    /// breakpoints and invalid values fail here rather than at build time.
    pub fn prepare(&self, definition: ElementDefinition) -> Result<StyledElement, StyleError> {
        let element = definition.into_element()?;
        self.check_element(&element)?;
        Ok(StyledElement::new(element, Arc::clone(&self.context)))
    }

    /// Validates and registers a definition.
    ///
    /// # Errors
    ///
    /// Any error from [`prepare`](Self::prepare), or
    /// [`StyleError::DuplicateElement`] if the name is already registered.
    pub fn define(&self, definition: ElementDefinition) -> Result<StyledElement, StyleError> {
        let element = self.prepare(definition)?;
        self.registry.write().add(element.clone())?;
        tracing::debug!(element = element.name(), "element defined");
        Ok(element)
    }

    /// Registers an element from its base style, axes and defaults.
    pub fn define_element<'a, A, D>(
        &self,
        name: &str,
        base: Declaration,
        variants: A,
        defaults: D,
    ) -> Result<StyledElement, StyleError>
    where
        A: IntoIterator<Item = (&'a str, VariantAxis)>,
        D: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let definition = variants
            .into_iter()
            .fold(ElementDefinition::new(name).base(base), |def, (axis, values)| {
                def.variant(axis, values)
            });
        let definition = defaults
            .into_iter()
            .fold(definition, |def, (axis, value)| def.default_variant(axis, value));
        self.define(definition)
    }

    /// Returns the builder registered under `name`.
    pub fn element(&self, name: &str) -> Result<StyledElement, StyleError> {
        self.registry.read().get(name).cloned()
    }

    /// Builds `selection` on the element registered under `name`.
    pub fn build(&self, name: &str, selection: &Selection) -> Result<String, StyleError> {
        self.element(name)?.build(selection)
    }

    /// Registered element names, in registration order.
    pub fn element_names(&self) -> Vec<String> {
        self.registry.read().names().map(String::from).collect()
    }

    /// Resolves global rules and inserts them into the global section.
    ///
    /// All rules are resolved before anything is inserted. Inserting the same
    /// set twice is a no-op. Returns the key of the inserted group.
    pub fn global_css(&self, styles: &GlobalStyles) -> Result<String, StyleError> {
        let resolver = Resolver::new(&self.context.config);
        let mut rules = Vec::new();
        for (selector, decl) in styles.iter() {
            check_prelude("", selector)?;
            rules.extend(compile(&resolver.resolve(decl)?, selector));
        }

        let canonical = rules.join("\n");
        let key = derive_key(&self.context.config.prefix, KeyKind::Global, &canonical);
        self.context
            .sheet
            .insert(KeyKind::Global, &key, canonical, rules)?;
        Ok(key)
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.context.config
    }

    pub fn stylesheet(&self) -> &Arc<Stylesheet> {
        &self.context.sheet
    }

    fn check_element(&self, element: &Element) -> Result<(), StyleError> {
        let resolver = Resolver::new(&self.context.config);
        resolver.resolve(&element.base)?;
        for (_, values) in &element.axes {
            for (_, decl) in values.values() {
                resolver.resolve(decl)?;
            }
        }
        for compound in &element.compounds {
            resolver.resolve(&compound.css)?;
        }
        Ok(())
    }
}

/// Installs `engine` as the process-wide engine.
///
/// # Errors
///
/// Returns [`StyleError::AlreadyInstalled`] if an engine is already installed.
pub fn install(engine: Engine) -> Result<&'static Engine, StyleError> {
    ENGINE
        .set(engine)
        .map_err(|_| StyleError::AlreadyInstalled)?;
    ENGINE.get().ok_or(StyleError::AlreadyInstalled)
}

/// Returns the process-wide engine, if one is installed.
pub fn global() -> Option<&'static Engine> {
    ENGINE.get()
}
