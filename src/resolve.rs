//! Token resolution pass.
//!
//! Turns a merged [`Declaration`] into a [`ResolvedBlock`]: utils are expanded
//! to real properties, every [`TokenRef`] is replaced by its theme value, and
//! breakpoint keys are checked against the configured media. Any reference
//! that can't be resolved is an error; nothing is passed through as text.

use crate::compile::{is_prelude, is_property_name, validate_value};
use crate::config::ResolvedConfig;
use crate::declaration::{classify, join_path, Declaration, Entry, KeyKind};
use crate::error::StyleError;
use crate::theme::map::scale_for;
use crate::value::{negate_css, TokenRef, Value};

/// Where a nested block applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Nesting {
    Selector(String),
    /// Breakpoint rank and media condition.
    Breakpoint(usize, String),
    /// A literal media condition from an `@media …` key.
    Media(String),
}

/// Emission rank of literal `@media` blocks: after every breakpoint.
const MEDIA_RANK: usize = usize::MAX - 1;

impl Nesting {
    /// Emission rank of a block nested here under a parent of rank `parent`.
    ///
    /// `None` is unconditional. Compiled rules are ordered by this rank, so a
    /// higher rank wins the cascade.
    pub fn rank(&self, parent: Option<usize>) -> Option<usize> {
        match self {
            Nesting::Selector(_) => parent,
            Nesting::Breakpoint(rank, _) => Some(parent.map_or(*rank, |p| p.max(*rank))),
            Nesting::Media(_) => Some(MEDIA_RANK),
        }
    }
}

/// A fully concrete style block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResolvedBlock {
    /// `(propertyName, css value)`, each property at most once.
    pub props: Vec<(String, String)>,
    pub children: Vec<(Nesting, ResolvedBlock)>,
}

impl ResolvedBlock {
    fn push_prop(&mut self, property: String, value: String) {
        self.props.retain(|(p, _)| *p != property);
        self.props.push((property, value));
    }

    fn absorb(&mut self, other: ResolvedBlock) {
        for (property, value) in other.props {
            self.push_prop(property, value);
        }
        self.children.extend(other.children);
    }

    /// Layers `top` over this block so that each property `top` sets wins
    /// wherever it applies.
    ///
    /// A property set by `top` is removed from this block's conditional rules
    /// that would be emitted later (wider breakpoints, `@media`), otherwise
    /// those rules would still win the cascade above their breakpoint.
    pub fn overlay(&mut self, top: ResolvedBlock) {
        self.overlay_ranked(top, None);
    }

    fn overlay_ranked(&mut self, top: ResolvedBlock, rank: Option<usize>) {
        let mut shadowed = Vec::new();
        top.conditional_props(rank, &mut shadowed);
        for (property, at) in &shadowed {
            self.shadow(property, *at, rank);
        }

        for (property, value) in top.props {
            self.push_prop(property, value);
        }
        for (nesting, child) in top.children {
            let child_rank = nesting.rank(rank);
            match self.children.iter_mut().find(|(n, _)| *n == nesting) {
                Some((_, existing)) => existing.overlay_ranked(child, child_rank),
                None => self.children.push((nesting, child)),
            }
        }
    }

    /// Properties of this block and its conditional children, with the rank
    /// each applies at. Nested selectors are other elements and are skipped.
    fn conditional_props<'b>(&'b self, rank: Option<usize>, out: &mut Vec<(&'b str, Option<usize>)>) {
        out.extend(self.props.iter().map(|(property, _)| (property.as_str(), rank)));
        for (nesting, child) in &self.children {
            if !matches!(nesting, Nesting::Selector(_)) {
                child.conditional_props(nesting.rank(rank), out);
            }
        }
    }

    /// Drops `property` from conditional descendants ranked above `above`.
    fn shadow(&mut self, property: &str, above: Option<usize>, own: Option<usize>) {
        for (nesting, child) in &mut self.children {
            if matches!(nesting, Nesting::Selector(_)) {
                continue;
            }
            let child_rank = nesting.rank(own);
            if child_rank > above {
                child.props.retain(|(p, _)| p != property);
            }
            child.shadow(property, above, child_rank);
        }
    }
}

pub(crate) struct Resolver<'a> {
    config: &'a ResolvedConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(config: &'a ResolvedConfig) -> Self {
        Self { config }
    }

    pub fn resolve(&self, decl: &Declaration) -> Result<ResolvedBlock, StyleError> {
        self.resolve_at(decl, "")
    }

    fn resolve_at(&self, decl: &Declaration, path: &str) -> Result<ResolvedBlock, StyleError> {
        let mut block = ResolvedBlock::default();

        for (key, entry) in decl.iter() {
            match (classify(key), entry) {
                (KeyKind::Property, Entry::Value(value)) => {
                    for property in self.expand(key) {
                        if !is_property_name(property) {
                            return Err(StyleError::malformed(
                                join_path(path, key),
                                format!("'{}' is not a CSS property name", property),
                            ));
                        }
                        let css = self.resolve_value(property, value)?;
                        validate_value(property, &css)?;
                        block.push_prop(property.to_string(), css);
                    }
                }
                (KeyKind::Initial, Entry::Block(inner)) => {
                    block.absorb(self.resolve_at(inner, &join_path(path, key))?);
                }
                (KeyKind::Selector, Entry::Block(inner)) => {
                    check_prelude(path, key)?;
                    let child = self.resolve_at(inner, &join_path(path, key))?;
                    block.children.push((Nesting::Selector(key.to_string()), child));
                }
                (KeyKind::Breakpoint(name), Entry::Block(inner)) => {
                    let rank = self.config.media.require(name)?;
                    let condition = self
                        .config
                        .media
                        .condition(name)
                        .unwrap_or_default()
                        .to_string();
                    let child = self.resolve_at(inner, &join_path(path, key))?;
                    block
                        .children
                        .push((Nesting::Breakpoint(rank, condition), child));
                }
                (KeyKind::Media(prelude), Entry::Block(inner)) => {
                    check_prelude(path, key)?;
                    let condition = prelude.trim_start_matches("@media").trim().to_string();
                    let child = self.resolve_at(inner, &join_path(path, key))?;
                    block.children.push((Nesting::Media(condition), child));
                }
                (_, Entry::Value(_)) => {
                    return Err(StyleError::malformed(
                        join_path(path, key),
                        "selectors and breakpoints need a nested block",
                    ))
                }
                (KeyKind::Property, Entry::Block(_)) => {
                    return Err(StyleError::malformed(
                        join_path(path, key),
                        "a property needs a value, not a block",
                    ))
                }
            }
        }

        Ok(block)
    }

    /// Expands a util to its target properties.
    fn expand<'k>(&'k self, key: &'k str) -> Vec<&'k str> {
        match self.config.utils.get(key) {
            Some(targets) => targets.iter().map(String::as_str).collect(),
            None => vec![key],
        }
    }

    fn resolve_value(&self, property: &str, value: &Value) -> Result<String, StyleError> {
        match value {
            Value::Literal(text) => Ok(text.clone()),
            Value::Token(token) => self.resolve_token(property, token),
            Value::Composite(parts) => {
                let parts = parts
                    .iter()
                    .map(|part| self.resolve_value(property, part))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(parts.concat())
            }
        }
    }

    fn resolve_token(&self, property: &str, token: &TokenRef) -> Result<String, StyleError> {
        let scale = match &token.scale {
            Some(scale) => scale.as_str(),
            None => scale_for(&self.config.theme_map, property).ok_or_else(|| {
                StyleError::UnmappedToken {
                    property: property.to_string(),
                    name: token.name.clone(),
                }
            })?,
        };

        let theme = &self.config.theme;
        if !theme.has_scale(scale) {
            return Err(StyleError::UnknownScale {
                scale: scale.to_string(),
                name: token.name.clone(),
            });
        }
        let resolved = theme
            .get(scale, &token.name)
            .ok_or_else(|| StyleError::UnknownToken {
                property: property.to_string(),
                scale: scale.to_string(),
                name: token.name.clone(),
            })?;

        Ok(if token.negated {
            negate_css(resolved)
        } else {
            resolved.to_string()
        })
    }
}

/// Rejects selector and media keys that would end their rule prelude.
pub(crate) fn check_prelude(path: &str, key: &str) -> Result<(), StyleError> {
    if is_prelude(key) {
        Ok(())
    } else {
        Err(StyleError::malformed(
            join_path(path, key),
            "selectors and media queries cannot contain '{', '}' or ';'",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::theme::{Breakpoints, Theme};

    fn config() -> ResolvedConfig {
        Config::new()
            .media(
                Breakpoints::new()
                    .add("bp1", "(min-width: 520px)")
                    .add("bp2", "(min-width: 900px)"),
            )
            .theme(
                Theme::new()
                    .add("colors", "white", "#fff")
                    .add("colors", "gray", "#888")
                    .add("space", "4", "20px")
                    .add("space", "5", "25px")
                    .add("fonts", "web3", "'Press Start 2P', monospace"),
            )
            .util("mx", &["marginLeft", "marginRight"])
            .util("bc", &["backgroundColor"])
            .freeze()
            .unwrap()
    }

    #[test]
    fn test_resolves_tokens_through_utils() {
        let config = config();
        let decl = Declaration::new()
            .set("bc", Value::token("white"))
            .set("mx", Value::Token(TokenRef::new("5").negate()));

        let block = Resolver::new(&config).resolve(&decl).unwrap();
        assert_eq!(
            block.props,
            vec![
                ("backgroundColor".to_string(), "#fff".to_string()),
                ("marginLeft".to_string(), "-25px".to_string()),
                ("marginRight".to_string(), "-25px".to_string()),
            ]
        );
    }

    #[test]
    fn test_unknown_token_is_error() {
        let config = config();
        let decl = Declaration::new().set("color", Value::token("blakc"));
        let err = Resolver::new(&config).resolve(&decl).unwrap_err();
        assert_eq!(
            err,
            StyleError::UnknownToken {
                property: "color".to_string(),
                scale: "colors".to_string(),
                name: "blakc".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_scale_is_error() {
        let config = config();
        let decl = Declaration::new().set("borderRadius", Value::token("1"));
        assert!(matches!(
            Resolver::new(&config).resolve(&decl),
            Err(StyleError::UnknownScale { .. })
        ));
    }

    #[test]
    fn test_unmapped_property_needs_scope() {
        let config = config();
        let decl = Declaration::new().set("mixBlendMode", Value::token("gray"));
        assert!(matches!(
            Resolver::new(&config).resolve(&decl),
            Err(StyleError::UnmappedToken { .. })
        ));

        let scoped = Declaration::new().set("mixBlendMode", Value::scoped("colors", "gray"));
        let block = Resolver::new(&config).resolve(&scoped).unwrap();
        assert_eq!(block.props[0].1, "#888");
    }

    #[test]
    fn test_breakpoints_and_selectors_nest() {
        let config = config();
        let decl = Declaration::new()
            .set("padding", Value::token("4"))
            .nest("&:hover", Declaration::new().set("cursor", "pointer"))
            .at("bp2", Declaration::new().set("padding", Value::token("5")));

        let block = Resolver::new(&config).resolve(&decl).unwrap();
        assert_eq!(block.children.len(), 2);
        assert_eq!(block.children[0].0, Nesting::Selector("&:hover".to_string()));
        assert_eq!(
            block.children[1].0,
            Nesting::Breakpoint(1, "(min-width: 900px)".to_string())
        );
    }

    #[test]
    fn test_unknown_breakpoint_is_error() {
        let config = config();
        let decl = Declaration::new().at("bp7", Declaration::new().set("color", "red"));
        assert_eq!(
            Resolver::new(&config).resolve(&decl),
            Err(StyleError::UnknownBreakpoint {
                name: "bp7".to_string()
            })
        );
    }

    #[test]
    fn test_property_key_cannot_break_rule() {
        let config = config();
        let decl = Declaration::new().set("color:red}body{background", "blue");
        assert!(matches!(
            Resolver::new(&config).resolve(&decl),
            Err(StyleError::Malformed { .. })
        ));
    }

    #[test]
    fn test_selector_key_cannot_break_rule() {
        let config = config();
        let decl = Declaration::new().nest("&}body{", Declaration::new().set("color", "red"));
        assert!(matches!(
            Resolver::new(&config).resolve(&decl),
            Err(StyleError::Malformed { .. })
        ));

        let media = Declaration::new().nest(
            "@media (hover: hover){}x",
            Declaration::new().set("color", "red"),
        );
        assert!(matches!(
            Resolver::new(&config).resolve(&media),
            Err(StyleError::Malformed { .. })
        ));
    }

    #[test]
    fn test_unresolved_dollar_text_is_rejected() {
        let config = config();
        let decl = Declaration::new().set("width", "calc($4 + 1px)");
        assert!(matches!(
            Resolver::new(&config).resolve(&decl),
            Err(StyleError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_tokens_inside_functions_resolve() {
        let config = config();
        let decl = Declaration::new()
            .set("marginTop", Value::parse("calc($5 + 1px)"))
            .set("boxShadow", Value::parse("0 0 0 1px $colors$gray, 0 1px  2px $colors$white"));
        let block = Resolver::new(&config).resolve(&decl).unwrap();
        assert_eq!(block.props[0].1, "calc(25px + 1px)");
        assert_eq!(block.props[1].1, "0 0 0 1px #888, 0 1px  2px #fff");

        let typo = Declaration::new().set("marginTop", Value::parse("calc($blakc + 1px)"));
        assert!(matches!(
            Resolver::new(&config).resolve(&typo),
            Err(StyleError::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_overlay_drops_shadowed_breakpoint_properties() {
        let config = config();
        let resolver = Resolver::new(&config);
        let mut block = resolver
            .resolve(
                &Declaration::new()
                    .set("padding", Value::token("4"))
                    .at("bp1", Declaration::new().set("padding", "1px").set("color", "red"))
                    .at("bp2", Declaration::new().set("padding", "2px")),
            )
            .unwrap();
        block.overlay(
            resolver
                .resolve(
                    &Declaration::new()
                        .set("padding", "9px")
                        .at("bp2", Declaration::new().set("color", "blue"))
                        .at("bp1", Declaration::new().set("color", "green")),
                )
                .unwrap(),
        );

        assert_eq!(block.props, vec![("padding".to_string(), "9px".to_string())]);
        assert_eq!(
            block.children[0].1.props,
            vec![("color".to_string(), "green".to_string())]
        );
        assert_eq!(
            block.children[1].1.props,
            vec![("color".to_string(), "blue".to_string())]
        );
    }

    #[test]
    fn test_initial_block_is_unconditional() {
        let config = config();
        let decl = Declaration::new()
            .set("color", "red")
            .nest("@initial", Declaration::new().set("color", "blue"));
        let block = Resolver::new(&config).resolve(&decl).unwrap();
        assert_eq!(block.props, vec![("color".to_string(), "blue".to_string())]);
        assert!(block.children.is_empty());
    }
}
