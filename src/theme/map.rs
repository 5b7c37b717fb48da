//! Property → scale lookup for unscoped tokens.

use std::collections::HashMap;

use once_cell::sync::Lazy;

const SPACE: &[&str] = &[
    "gap",
    "gridGap",
    "columnGap",
    "gridColumnGap",
    "rowGap",
    "gridRowGap",
    "inset",
    "insetBlock",
    "insetBlockEnd",
    "insetBlockStart",
    "insetInline",
    "insetInlineEnd",
    "insetInlineStart",
    "margin",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
    "marginBlock",
    "marginBlockEnd",
    "marginBlockStart",
    "marginInline",
    "marginInlineEnd",
    "marginInlineStart",
    "padding",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "paddingBlock",
    "paddingBlockEnd",
    "paddingBlockStart",
    "paddingInline",
    "paddingInlineEnd",
    "paddingInlineStart",
    "top",
    "right",
    "bottom",
    "left",
    "scrollMargin",
    "scrollPadding",
];

const SIZES: &[&str] = &[
    "width",
    "height",
    "minWidth",
    "maxWidth",
    "minHeight",
    "maxHeight",
    "flexBasis",
    "gridTemplateColumns",
    "gridTemplateRows",
    "blockSize",
    "minBlockSize",
    "maxBlockSize",
    "inlineSize",
    "minInlineSize",
    "maxInlineSize",
];

const COLORS: &[&str] = &[
    "color",
    "background",
    "backgroundColor",
    "backgroundImage",
    "borderColor",
    "borderTopColor",
    "borderRightColor",
    "borderBottomColor",
    "borderLeftColor",
    "caretColor",
    "columnRuleColor",
    "outlineColor",
    "fill",
    "stroke",
    "textDecorationColor",
];

const SINGLES: &[(&str, &str)] = &[
    ("fontFamily", "fonts"),
    ("fontSize", "fontSizes"),
    ("fontWeight", "fontWeights"),
    ("lineHeight", "lineHeights"),
    ("letterSpacing", "letterSpacings"),
    ("borderWidth", "borderWidths"),
    ("borderStyle", "borderStyles"),
    ("borderRadius", "radii"),
    ("borderTopLeftRadius", "radii"),
    ("borderTopRightRadius", "radii"),
    ("borderBottomRightRadius", "radii"),
    ("borderBottomLeftRadius", "radii"),
    ("boxShadow", "shadows"),
    ("textShadow", "shadows"),
    ("zIndex", "zIndices"),
    ("transition", "transitions"),
];

static DEFAULT_THEME_MAP: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.extend(SPACE.iter().map(|p| (*p, "space")));
    map.extend(SIZES.iter().map(|p| (*p, "sizes")));
    map.extend(COLORS.iter().map(|p| (*p, "colors")));
    map.extend(SINGLES.iter().copied());
    map
});

/// Looks up the scale for a property, preferring configured overrides.
pub(crate) fn scale_for<'a>(
    overrides: &'a indexmap::IndexMap<String, String>,
    property: &str,
) -> Option<&'a str> {
    match overrides.get(property) {
        Some(scale) => Some(scale.as_str()),
        None => DEFAULT_THEME_MAP.get(property).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    #[test]
    fn test_default_scales() {
        let none = IndexMap::new();
        assert_eq!(scale_for(&none, "paddingLeft"), Some("space"));
        assert_eq!(scale_for(&none, "backgroundColor"), Some("colors"));
        assert_eq!(scale_for(&none, "fontFamily"), Some("fonts"));
        assert_eq!(scale_for(&none, "maxWidth"), Some("sizes"));
        assert_eq!(scale_for(&none, "mixBlendMode"), None);
    }

    #[test]
    fn test_override_wins() {
        let mut overrides = IndexMap::new();
        overrides.insert("top".to_string(), "sizes".to_string());
        overrides.insert("mixBlendMode".to_string(), "blends".to_string());
        assert_eq!(scale_for(&overrides, "top"), Some("sizes"));
        assert_eq!(scale_for(&overrides, "mixBlendMode"), Some("blends"));
    }
}
