//! # Stitchwork - Token-Based Style Variants
//!
//! Stitchwork turns declarative element styles into deduplicated CSS classes.
//! An element kind (box, text, link, ...) has a base style, variant axes with
//! a default value each, and optional compound variants. A build selects
//! variant values, optionally per breakpoint, adds raw overrides, and gets
//! back a class name whose rules are inserted once into a shared stylesheet.
//!
//! ## Core Concepts
//!
//! - [`Theme`]: token scales (`colors`, `space`, `fontSizes`, ...) with aliases
//! - [`Declaration`]: ordered properties, nested selectors and `@bp` blocks
//! - [`Value`] / [`TokenRef`]: literal CSS or a typed theme token reference
//! - [`Config`]: class prefix, breakpoints, theme, theme map and utils
//! - [`Engine`]: validates definitions and builds classes
//! - [`Stylesheet`]: the append-only, concurrency-safe rule cache
//! - [`Renderer`]: minijinja templates with `style()` and `stylesheet()`
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use stitchwork::{
//!     Breakpoints, Config, Declaration, ElementDefinition, Engine, Selection, Stylesheet,
//!     Theme, Value, VariantAxis, VariantChoice,
//! };
//!
//! let config = Config::new()
//!     .prefix("pd")
//!     .media(Breakpoints::new().add("bp1", "(min-width: 520px)"))
//!     .theme(
//!         Theme::new()
//!             .add("fontSizes", "4", "19px")
//!             .add("fontSizes", "5", "25px")
//!             .add("space", "5", "25px"),
//!     )
//!     .util("mt", &["marginTop"]);
//!
//! let engine = Engine::with_sheet(config, Arc::new(Stylesheet::new())).unwrap();
//! let text = engine
//!     .define(
//!         ElementDefinition::new("text")
//!             .base(Declaration::new().set("margin", 0))
//!             .variant(
//!                 "size",
//!                 VariantAxis::new()
//!                     .value("4", Declaration::new().set("fontSize", Value::token("4")))
//!                     .value("5", Declaration::new().set("fontSize", Value::token("5"))),
//!             )
//!             .default_variant("size", "4"),
//!     )
//!     .unwrap();
//!
//! let class = text
//!     .build(
//!         &Selection::new()
//!             .variant("size", VariantChoice::responsive([("@initial", "4"), ("@bp1", "5")]))
//!             .css(Declaration::new().set("mt", Value::token("5"))),
//!     )
//!     .unwrap();
//!
//! let css = engine.stylesheet().to_css();
//! assert!(css.contains(&format!(".{}{{margin:0;font-size:19px;margin-top:25px}}", class)));
//! assert!(css.contains(&format!("@media (min-width: 520px){{.{}{{font-size:25px}}}}", class)));
//! ```
//!
//! ## Token Syntax
//!
//! Inside the engine a token is always a [`TokenRef`]. The text forms exist
//! only where styles come from text (config files, templates, JSON):
//!
//! | Text | Meaning |
//! |------|---------|
//! | `$4` | token `4` in the scale mapped to the property (`padding` → `space`) |
//! | `$colors$gray` | token `gray` in `colors`, whatever the property |
//! | `-$5` | the negated value of token `5` |
//! | `1px solid $gray` | a composite of literals and tokens |
//! | `calc($4 + 1px)` | tokens are found anywhere outside quoted strings |
//!
//! An unknown token is always an error; it is never emitted as text.
//!
//! ## Precedence
//!
//! Lowest first: base, defaults for unselected axes, explicit selections,
//! compound variants, responsive selections by breakpoint order, raw `css`.
//! A raw property wins at every breakpoint, not only below the first one.
//! See [`StyledElement`].

mod compile;
pub mod config;
pub mod declaration;
pub mod engine;
pub mod error;
pub mod global;
mod key;
pub mod render;
mod resolve;
pub mod sheet;
pub mod site;
pub mod theme;
mod util;
pub mod value;
pub mod variant;

pub use config::{Config, ResolvedConfig};
pub use declaration::{Declaration, Entry};
pub use engine::Engine;
pub use error::StyleError;
pub use global::GlobalStyles;
pub use render::{register_functions, Renderer};
pub use sheet::{Stylesheet, STYLE_TAG_ID};
pub use theme::{Breakpoints, ResolvedTheme, Theme};
pub use util::to_kebab_case;
pub use value::{TokenRef, Value};
pub use variant::{
    CompoundVariant, ElementDefinition, ElementRegistry, ResolvedStyle, Selection,
    StyledElement, VariantAxis, VariantChoice,
};
