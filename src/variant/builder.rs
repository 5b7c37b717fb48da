//! Element builders: turning a [`Selection`] into a class name.
//!
//! A build layers declarations in a fixed order, lowest precedence first:
//!
//! 1. the element's base style
//! 2. default values for axes without an explicit selection
//! 3. explicit selections, in axis declaration order
//! 4. compound variants matching the effective selection
//! 5. responsive selections, by breakpoint rank, each wrapped in its `@bp` block
//! 6. the raw `css` override
//!
//! Layers 1 to 5 are merged as declarations and resolved against the theme.
//! The raw override is resolved on its own and laid over the result, dropping
//! the properties it sets from any breakpoint rule that would otherwise be
//! emitted after it. The key is derived from the compiled rules, so it
//! depends only on the result.
//!
//! An explicit selection equal to the axis default is layered as a default.
//! Omitting an axis and selecting its default therefore compose identically.

use std::sync::Arc;

use indexmap::IndexMap;

use super::definition::Element;
use super::selection::Selection;
use crate::compile::{class_selector, compile};
use crate::declaration::Declaration;
use crate::engine::EngineContext;
use crate::error::StyleError;
use crate::key::{derive_key, KeyKind};
use crate::resolve::Resolver;

/// The compiled result of one build, before it is inserted in a stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    key: String,
    canonical: String,
    rules: Vec<String>,
}

impl ResolvedStyle {
    /// The generated class name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The compiled rules, unconditional rules first.
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// The rules joined one per line.
    pub fn css(&self) -> String {
        self.rules.join("\n")
    }
}

/// A reusable style builder bound to one element kind.
///
/// Cloning is cheap; clones share the element and the engine's stylesheet.
#[derive(Debug, Clone)]
pub struct StyledElement {
    element: Arc<Element>,
    context: Arc<EngineContext>,
}

impl StyledElement {
    pub(crate) fn new(element: Element, context: Arc<EngineContext>) -> Self {
        Self {
            element: Arc::new(element),
            context,
        }
    }

    pub fn name(&self) -> &str {
        &self.element.name
    }

    /// Builds a class name for `selection`, inserting its rules if absent.
    ///
    /// Returns the generated class followed by the selection's extra classes,
    /// space-separated.
    ///
    /// # Errors
    ///
    /// Any token, breakpoint or value error from resolution, or
    /// [`StyleError::KeyCollision`] if the sheet holds a different body for
    /// the derived key.
    pub fn build(&self, selection: &Selection) -> Result<String, StyleError> {
        let style = self.resolve(selection)?;
        self.context.sheet.insert(
            KeyKind::Class,
            &style.key,
            style.canonical.clone(),
            style.rules.clone(),
        )?;

        let mut classes = vec![style.key];
        classes.extend(selection.classes.iter().cloned());
        Ok(classes.join(" "))
    }

    /// Resolves and compiles `selection` without touching the stylesheet.
    pub fn resolve(&self, selection: &Selection) -> Result<ResolvedStyle, StyleError> {
        let resolver = Resolver::new(&self.context.config);
        let mut block = resolver.resolve(&self.compose(selection)?)?;
        if let Some(css) = &selection.css {
            block.overlay(resolver.resolve(css)?);
        }

        let canonical = compile(&block, "&").join("\n");
        let key = derive_key(&self.context.config.prefix, KeyKind::Class, &canonical);
        let rules = compile(&block, &class_selector(&key));
        Ok(ResolvedStyle {
            key,
            canonical,
            rules,
        })
    }

    /// Layers the element's declarations for `selection`, up to and
    /// including the responsive selections.
    fn compose(&self, selection: &Selection) -> Result<Declaration, StyleError> {
        let element = &*self.element;

        for axis in selection.variants.keys() {
            if !element.axes.contains_key(axis) {
                tracing::debug!(element = %element.name, axis = %axis, "ignoring unknown variant axis");
            }
        }

        let explicit = self.explicit_choices(selection);
        let mut chosen: IndexMap<String, String> = IndexMap::new();
        let mut merged = element.base.clone();

        for (axis, values) in &element.axes {
            if explicit.contains_key(axis) {
                continue;
            }
            if let Some(value) = element.defaults.get(axis) {
                if let Some(decl) = values.get(value) {
                    merged.merge(decl);
                    chosen.insert(axis.clone(), value.clone());
                }
            }
        }

        for (axis, values) in &element.axes {
            if let Some(value) = explicit.get(axis) {
                if let Some(decl) = values.get(value) {
                    merged.merge(decl);
                    chosen.insert(axis.clone(), value.clone());
                }
            }
        }

        for compound in &element.compounds {
            if compound.matches(&chosen) {
                merged.merge(&compound.css);
            }
        }

        for (breakpoint, decl) in self.responsive_layers(selection)? {
            merged.merge(&Declaration::new().at(breakpoint, decl.clone()));
        }
        Ok(merged)
    }

    /// Valid unconditional selections that differ from the axis default.
    fn explicit_choices(&self, selection: &Selection) -> IndexMap<String, String> {
        let element = &*self.element;
        let mut explicit = IndexMap::new();

        for (axis, values) in &element.axes {
            let Some(value) = selection.variants.get(axis).and_then(|c| c.initial()) else {
                continue;
            };
            if values.get(value).is_none() {
                tracing::debug!(
                    element = %element.name,
                    axis = %axis,
                    value,
                    "unknown variant value, using the default"
                );
                continue;
            }
            if element.defaults.get(axis).map(String::as_str) != Some(value) {
                explicit.insert(axis.clone(), value.to_string());
            }
        }
        explicit
    }

    /// Responsive selections as `(breakpoint, declaration)`, narrowest first.
    ///
    /// Ties keep axis declaration order.
    fn responsive_layers<'s>(
        &'s self,
        selection: &'s Selection,
    ) -> Result<Vec<(&'s str, &'s Declaration)>, StyleError> {
        let element = &*self.element;
        let media = &self.context.config.media;
        let mut layers = Vec::new();

        for (axis, values) in &element.axes {
            let Some(choice) = selection.variants.get(axis) else {
                continue;
            };
            for (breakpoint, value) in choice.at_breakpoints() {
                let rank = media.require(breakpoint)?;
                match values.get(value) {
                    Some(decl) => layers.push((rank, breakpoint, decl)),
                    None => tracing::debug!(
                        element = %element.name,
                        axis = %axis,
                        breakpoint,
                        value,
                        "ignoring unknown responsive variant value"
                    ),
                }
            }
        }

        layers.sort_by_key(|(rank, _, _)| *rank);
        Ok(layers
            .into_iter()
            .map(|(_, breakpoint, decl)| (breakpoint, decl))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::Engine;
    use crate::sheet::Stylesheet;
    use crate::theme::{Breakpoints, Theme};
    use crate::value::Value;
    use crate::variant::{CompoundVariant, ElementDefinition, VariantAxis, VariantChoice};

    fn engine() -> Engine {
        let config = Config::new()
            .prefix("t")
            .media(
                Breakpoints::new()
                    .add("bp1", "(min-width: 520px)")
                    .add("bp2", "(min-width: 900px)"),
            )
            .theme(
                Theme::new()
                    .add("fontSizes", "1", "13px")
                    .add("fontSizes", "2", "14px")
                    .add("fontSizes", "4", "19px")
                    .add("fontSizes", "5", "25px")
                    .add("colors", "gray", "hsl(0, 0%, 50%)"),
            );
        Engine::with_sheet(config, Arc::new(Stylesheet::new())).unwrap()
    }

    fn text(engine: &Engine) -> StyledElement {
        let size = ["1", "2", "4", "5"]
            .iter()
            .fold(VariantAxis::new(), |axis, step| {
                axis.value(step, Declaration::new().set("fontSize", Value::token(*step)))
            });
        engine
            .define(
                ElementDefinition::new("text")
                    .base(Declaration::new().set("margin", "0"))
                    .variant("size", size)
                    .variant(
                        "tone",
                        VariantAxis::new()
                            .value("plain", Declaration::new())
                            .value("muted", Declaration::new().set("color", Value::token("gray"))),
                    )
                    .default_variant("size", "1")
                    .compound(
                        CompoundVariant::new(Declaration::new().set("letterSpacing", "-0.01em"))
                            .when("size", "5")
                            .when("tone", "muted"),
                    ),
            )
            .unwrap()
    }

    #[test]
    fn test_explicit_value_replaces_default() {
        let engine = engine();
        let style = text(&engine).resolve(&Selection::new().variant("size", "2")).unwrap();
        assert_eq!(style.rules().len(), 1);
        assert!(style.rules()[0].contains("font-size:14px"));
        assert!(!style.rules()[0].contains("13px"));
    }

    #[test]
    fn test_unknown_value_falls_back_to_default() {
        let engine = engine();
        let text = text(&engine);
        let fallback = text.resolve(&Selection::new().variant("size", "99")).unwrap();
        let default = text.resolve(&Selection::new()).unwrap();
        assert_eq!(fallback, default);
    }

    #[test]
    fn test_unknown_axis_is_ignored() {
        let engine = engine();
        let text = text(&engine);
        let ignored = text.resolve(&Selection::new().variant("weight", "bold")).unwrap();
        assert_eq!(ignored, text.resolve(&Selection::new()).unwrap());
    }

    #[test]
    fn test_responsive_initial_and_breakpoint() {
        let engine = engine();
        let selection = Selection::new().variant(
            "size",
            VariantChoice::responsive([("@initial", "4"), ("@bp1", "5")]),
        );
        let style = text(&engine).resolve(&selection).unwrap();
        let key = style.key().to_string();
        assert_eq!(
            style.rules(),
            &[
                format!(".{}{{margin:0;font-size:19px}}", key),
                format!("@media (min-width: 520px){{.{}{{font-size:25px}}}}", key),
            ]
        );
    }

    #[test]
    fn test_responsive_unknown_breakpoint_is_error() {
        let engine = engine();
        let selection = Selection::new().variant("size", VariantChoice::responsive([("@bp9", "5")]));
        assert_eq!(
            text(&engine).resolve(&selection),
            Err(StyleError::UnknownBreakpoint {
                name: "bp9".to_string()
            })
        );
    }

    #[test]
    fn test_compound_applies_when_all_match() {
        let engine = engine();
        let text = text(&engine);
        let both = text
            .resolve(&Selection::new().variant("size", "5").variant("tone", "muted"))
            .unwrap();
        assert!(both.css().contains("letter-spacing:-0.01em"));

        let one = text.resolve(&Selection::new().variant("size", "5")).unwrap();
        assert!(!one.css().contains("letter-spacing"));
    }

    #[test]
    fn test_raw_css_wins() {
        let engine = engine();
        let style = text(&engine)
            .resolve(&Selection::new().css(Declaration::new().set("fontSize", "40px")))
            .unwrap();
        assert!(style.css().contains("font-size:40px"));
        assert!(!style.css().contains("13px"));
    }

    #[test]
    fn test_raw_css_wins_over_responsive_selection() {
        let engine = engine();
        let style = text(&engine)
            .resolve(
                &Selection::new()
                    .variant("size", VariantChoice::responsive([("@initial", "4"), ("@bp1", "5")]))
                    .css(Declaration::new().set("fontSize", "40px")),
            )
            .unwrap();
        assert_eq!(
            style.rules(),
            &[format!(".{}{{margin:0;font-size:40px}}", style.key())]
        );
    }

    #[test]
    fn test_raw_breakpoint_wins_over_wider_selection() {
        let engine = engine();
        let style = text(&engine)
            .resolve(
                &Selection::new()
                    .variant("size", VariantChoice::responsive([("@bp1", "4"), ("@bp2", "5")]))
                    .css(Declaration::new().at("bp1", Declaration::new().set("fontSize", "30px"))),
            )
            .unwrap();
        let key = style.key().to_string();
        assert_eq!(
            style.rules(),
            &[
                format!(".{}{{margin:0;font-size:13px}}", key),
                format!("@media (min-width: 520px){{.{}{{font-size:30px}}}}", key),
            ]
        );
    }

    #[test]
    fn test_raw_css_keeps_unrelated_breakpoint_properties() {
        let engine = engine();
        let chip = engine
            .define(
                ElementDefinition::new("chip").base(
                    Declaration::new()
                        .set("color", "red")
                        .at("bp1", Declaration::new().set("color", "blue").set("opacity", "0.5")),
                ),
            )
            .unwrap();
        let style = chip
            .resolve(&Selection::new().css(Declaration::new().set("color", "green")))
            .unwrap();
        let key = style.key().to_string();
        assert_eq!(
            style.rules(),
            &[
                format!(".{}{{color:green}}", key),
                format!("@media (min-width: 520px){{.{}{{opacity:0.5}}}}", key),
            ]
        );
    }

    #[test]
    fn test_build_appends_extra_classes() {
        let engine = engine();
        let classes = text(&engine)
            .build(&Selection::new().class("intro").class("lead"))
            .unwrap();
        let parts: Vec<&str> = classes.split(' ').collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].starts_with("t-c-"));
        assert_eq!(&parts[1..], &["intro", "lead"]);
    }

    #[test]
    fn test_build_is_idempotent() {
        let engine = engine();
        let text = text(&engine);
        let first = text.build(&Selection::new().variant("size", "2")).unwrap();
        let rules = engine.stylesheet().rule_count();
        let second = text.build(&Selection::new().variant("size", "2")).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.stylesheet().rule_count(), rules);
    }

    #[test]
    fn test_unknown_token_in_raw_css_is_error() {
        let engine = engine();
        let result = text(&engine).build(
            &Selection::new().css(Declaration::new().set("color", Value::token("grey"))),
        );
        assert!(matches!(result, Err(StyleError::UnknownToken { .. })));
        assert!(engine.stylesheet().is_empty());
    }
}
