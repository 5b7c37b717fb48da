//! Element definitions: base style, variant axes, defaults and compounds.

use indexmap::IndexMap;

use crate::declaration::{join_path, Declaration};
use crate::error::StyleError;

/// The values of one variant axis, each mapping to a partial declaration.
///
/// # Example
///
/// ```rust
/// use stitchwork::{Declaration, VariantAxis};
///
/// let size = VariantAxis::new()
///     .value("1", Declaration::new().set("fontSize", "13px"))
///     .value("2", Declaration::new().set("fontSize", "14px"));
/// assert!(size.get("2").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantAxis {
    values: IndexMap<String, Declaration>,
}

impl VariantAxis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, name: &str, decl: Declaration) -> Self {
        self.values.insert(name.to_string(), decl);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.values.get(name)
    }

    pub fn values(&self) -> impl Iterator<Item = (&str, &Declaration)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A declaration applied when several axes hold specific values at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundVariant {
    pub(crate) conditions: IndexMap<String, String>,
    pub(crate) css: Declaration,
}

impl CompoundVariant {
    pub fn new(css: Declaration) -> Self {
        Self {
            conditions: IndexMap::new(),
            css,
        }
    }

    /// Adds a condition: `axis` must be `value`.
    pub fn when(mut self, axis: &str, value: &str) -> Self {
        self.conditions.insert(axis.to_string(), value.to_string());
        self
    }

    pub(crate) fn matches(&self, chosen: &IndexMap<String, String>) -> bool {
        self.conditions
            .iter()
            .all(|(axis, value)| chosen.get(axis) == Some(value))
    }
}

/// Describes one element kind before it is registered with an engine.
///
/// Axes are kept in the order they are declared; that order is also the order
/// in which their declarations are layered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDefinition {
    pub(crate) name: String,
    pub(crate) base: Declaration,
    pub(crate) axes: Vec<(String, VariantAxis)>,
    pub(crate) defaults: IndexMap<String, String>,
    pub(crate) compounds: Vec<CompoundVariant>,
}

impl ElementDefinition {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base: Declaration::new(),
            axes: Vec::new(),
            defaults: IndexMap::new(),
            compounds: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base(mut self, decl: Declaration) -> Self {
        self.base = decl;
        self
    }

    pub fn variant(mut self, axis: &str, values: VariantAxis) -> Self {
        self.axes.push((axis.to_string(), values));
        self
    }

    pub fn default_variant(mut self, axis: &str, value: &str) -> Self {
        self.defaults.insert(axis.to_string(), value.to_string());
        self
    }

    pub fn compound(mut self, compound: CompoundVariant) -> Self {
        self.compounds.push(compound);
        self
    }

    /// Checks the structural rules of a definition.
    ///
    /// Axis names must be unique and every default must name a declared axis
    /// and value. Token references are checked separately by the engine.
    pub(crate) fn into_element(self) -> Result<Element, StyleError> {
        let mut axes: IndexMap<String, VariantAxis> = IndexMap::new();
        for (axis, values) in self.axes {
            if axes.contains_key(&axis) {
                return Err(StyleError::DuplicateAxis {
                    element: self.name,
                    axis,
                });
            }
            axes.insert(axis, values);
        }

        for (axis, value) in &self.defaults {
            let declared = axes.get(axis).is_some_and(|values| values.get(value).is_some());
            if !declared {
                return Err(StyleError::UnknownDefault {
                    element: self.name.clone(),
                    axis: axis.clone(),
                    value: value.clone(),
                });
            }
        }

        Ok(Element {
            name: self.name,
            base: self.base,
            axes,
            defaults: self.defaults,
            compounds: self.compounds,
        })
    }

    /// Parses a definition from a JSON-shaped document:
    ///
    /// ```json
    /// {
    ///   "base": { "fontFamily": "$sans" },
    ///   "variants": { "size": { "1": { "fontSize": "$1" } } },
    ///   "defaultVariants": { "size": "1" },
    ///   "compoundVariants": [ { "size": "1", "css": { "lineHeight": "20px" } } ]
    /// }
    /// ```
    pub fn from_json(name: &str, doc: &serde_json::Value) -> Result<Self, StyleError> {
        let object = doc
            .as_object()
            .ok_or_else(|| StyleError::malformed(name, "expected a map"))?;

        let mut def = ElementDefinition::new(name);
        for (key, item) in object {
            let path = join_path(name, key);
            match key.as_str() {
                "base" => def.base = Declaration::from_json_at(item, &path)?,
                "variants" => {
                    let axes = item
                        .as_object()
                        .ok_or_else(|| StyleError::malformed(&path, "expected a map of axes"))?;
                    for (axis, values) in axes {
                        let axis_path = join_path(&path, axis);
                        let values = values.as_object().ok_or_else(|| {
                            StyleError::malformed(&axis_path, "expected a map of values")
                        })?;
                        let mut variant = VariantAxis::new();
                        for (value, css) in values {
                            let css = Declaration::from_json_at(css, &join_path(&axis_path, value))?;
                            variant = variant.value(value, css);
                        }
                        def = def.variant(axis, variant);
                    }
                }
                "defaultVariants" => {
                    let defaults = item
                        .as_object()
                        .ok_or_else(|| StyleError::malformed(&path, "expected a map"))?;
                    for (axis, value) in defaults {
                        def = def.default_variant(axis, &scalar(value, &join_path(&path, axis))?);
                    }
                }
                "compoundVariants" => {
                    let list = item
                        .as_array()
                        .ok_or_else(|| StyleError::malformed(&path, "expected a list"))?;
                    for (i, entry) in list.iter().enumerate() {
                        def = def.compound(compound_from_json(entry, &format!("{}[{}]", path, i))?);
                    }
                }
                _ => return Err(StyleError::malformed(path, "unknown definition field")),
            }
        }
        Ok(def)
    }
}

fn compound_from_json(entry: &serde_json::Value, path: &str) -> Result<CompoundVariant, StyleError> {
    let object = entry
        .as_object()
        .ok_or_else(|| StyleError::malformed(path, "expected a map"))?;
    let css = match object.get("css") {
        Some(css) => Declaration::from_json_at(css, &join_path(path, "css"))?,
        None => return Err(StyleError::malformed(path, "compound variant needs 'css'")),
    };

    let mut compound = CompoundVariant::new(css);
    for (axis, value) in object.iter().filter(|(k, _)| k.as_str() != "css") {
        compound = compound.when(axis, &scalar(value, &join_path(path, axis))?);
    }
    Ok(compound)
}

/// Variant values may be written as strings or numbers (`size: 2`).
fn scalar(value: &serde_json::Value, path: &str) -> Result<String, StyleError> {
    match value {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(StyleError::malformed(
            path,
            format!("expected a variant value, got {}", other),
        )),
    }
}

/// A validated element kind, immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub base: Declaration,
    pub axes: IndexMap<String, VariantAxis>,
    pub defaults: IndexMap<String, String>,
    pub compounds: Vec<CompoundVariant>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn size_axis() -> VariantAxis {
        VariantAxis::new()
            .value("1", Declaration::new().set("fontSize", "13px"))
            .value("2", Declaration::new().set("fontSize", "14px"))
    }

    #[test]
    fn test_duplicate_axis_rejected() {
        let err = ElementDefinition::new("text")
            .variant("size", size_axis())
            .variant("size", size_axis())
            .into_element()
            .unwrap_err();
        assert_eq!(
            err,
            StyleError::DuplicateAxis {
                element: "text".into(),
                axis: "size".into()
            }
        );
    }

    #[test]
    fn test_default_must_be_declared() {
        let err = ElementDefinition::new("text")
            .variant("size", size_axis())
            .default_variant("size", "9")
            .into_element()
            .unwrap_err();
        assert!(matches!(err, StyleError::UnknownDefault { .. }));

        let err = ElementDefinition::new("text")
            .default_variant("tone", "loud")
            .into_element()
            .unwrap_err();
        assert!(matches!(err, StyleError::UnknownDefault { .. }));
    }

    #[test]
    fn test_valid_definition_keeps_axis_order() {
        let element = ElementDefinition::new("link")
            .variant("variant", VariantAxis::new().value("ghost", Declaration::new()))
            .variant("size", size_axis())
            .default_variant("size", "1")
            .into_element()
            .unwrap();
        let axes: Vec<&str> = element.axes.keys().map(String::as_str).collect();
        assert_eq!(axes, vec!["variant", "size"]);
    }

    #[test]
    fn test_compound_matches_all_conditions() {
        let compound = CompoundVariant::new(Declaration::new())
            .when("size", "1")
            .when("variant", "ghost");
        let mut chosen = IndexMap::new();
        chosen.insert("size".to_string(), "1".to_string());
        assert!(!compound.matches(&chosen));
        chosen.insert("variant".to_string(), "ghost".to_string());
        assert!(compound.matches(&chosen));
    }

    #[test]
    fn test_from_json() {
        let def = ElementDefinition::from_json(
            "text",
            &json!({
                "base": { "margin": 0 },
                "variants": { "size": { "1": { "fontSize": "$1" }, "2": { "fontSize": "$2" } } },
                "defaultVariants": { "size": 1 },
                "compoundVariants": [ { "size": "2", "css": { "lineHeight": "20px" } } ]
            }),
        )
        .unwrap();

        assert_eq!(def.axes.len(), 1);
        assert_eq!(def.defaults["size"], "1");
        assert_eq!(def.compounds[0].conditions["size"], "2");
        assert!(def.into_element().is_ok());
    }

    #[test]
    fn test_from_json_unknown_field() {
        let err = ElementDefinition::from_json("box", &json!({ "varients": {} })).unwrap_err();
        assert!(err.to_string().contains("box.varients"));
    }
}
