//! MiniJinja function registration.

use std::ops::Deref;

use minijinja::value::Kwargs;
use minijinja::{Environment, Error, ErrorKind, Value};

use crate::declaration::Declaration;
use crate::engine::Engine;
use crate::error::StyleError;
use crate::variant::{Selection, VariantChoice};

/// Registers `style()` and `stylesheet()` on a minijinja environment.
///
/// ```jinja
/// <h1 class="{{ style('text', size='2', css={'mb': '$5'}) }}">…</h1>
/// <p class="{{ style('text', size={'@initial': '4', '@bp1': '5'}, class='intro') }}">…</p>
/// {{ stylesheet() }}
/// ```
///
/// Every keyword other than `css` and `class` selects a variant axis.
pub fn register_functions<E>(env: &mut Environment<'static>, engine: E)
where
    E: Deref<Target = Engine> + Clone + Send + Sync + 'static,
{
    let styles = engine.clone();
    env.add_function(
        "style",
        move |kind: String, kwargs: Kwargs| -> Result<Value, Error> {
            let selection = selection_from_kwargs(&kwargs)?;
            let classes = styles.build(&kind, &selection).map_err(template_error)?;
            Ok(Value::from(classes))
        },
    );

    env.add_function("stylesheet", move || -> Value {
        Value::from_safe_string(engine.stylesheet().style_tag())
    });
}

fn selection_from_kwargs(kwargs: &Kwargs) -> Result<Selection, Error> {
    let mut selection = Selection::new();
    for key in kwargs.args() {
        let value: Value = kwargs.get(key)?;
        let json = serde_json::to_value(&value)
            .map_err(|e| Error::new(ErrorKind::InvalidOperation, e.to_string()))?;

        selection = match key {
            "css" => selection.css(Declaration::from_json(&json).map_err(template_error)?),
            "class" => class_names(&json)
                .into_iter()
                .fold(selection, |selection, class| selection.class(&class)),
            axis => selection.variant(axis, variant_choice(axis, &json)?),
        };
    }
    Ok(selection)
}

/// `'2'`, `2` or `{'@initial': '4', '@bp1': '5'}`.
fn variant_choice(axis: &str, json: &serde_json::Value) -> Result<VariantChoice, Error> {
    match json {
        serde_json::Value::Object(map) => {
            let pairs = map
                .iter()
                .map(|(bp, value)| scalar(axis, value).map(|value| (bp.clone(), value)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(VariantChoice::responsive(pairs))
        }
        other => scalar(axis, other).map(VariantChoice::from),
    }
}

fn scalar(axis: &str, json: &serde_json::Value) -> Result<String, Error> {
    match json {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::new(
            ErrorKind::InvalidOperation,
            format!("variant '{}' expects a value or a breakpoint map, got {}", axis, other),
        )),
    }
}

/// `class='a b'` or `class=['a', 'b']`.
fn class_names(json: &serde_json::Value) -> Vec<String> {
    match json {
        serde_json::Value::String(s) => s.split_whitespace().map(String::from).collect(),
        serde_json::Value::Array(items) => items.iter().flat_map(class_names).collect(),
        _ => Vec::new(),
    }
}

fn template_error(err: StyleError) -> Error {
    Error::new(ErrorKind::InvalidOperation, err.to_string()).with_source(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sheet::Stylesheet;
    use crate::theme::{Breakpoints, Theme};
    use crate::value::Value as StyleValue;
    use crate::variant::{ElementDefinition, VariantAxis};
    use minijinja::context;
    use std::sync::Arc;

    fn env() -> (Environment<'static>, Arc<Engine>) {
        let config = Config::new()
            .prefix("t")
            .media(Breakpoints::new().add("bp1", "(min-width: 520px)"))
            .theme(
                Theme::new()
                    .add("space", "5", "25px")
                    .add("fontSizes", "1", "13px")
                    .add("fontSizes", "2", "14px"),
            )
            .util("mb", &["marginBottom"]);
        let engine = Arc::new(Engine::with_sheet(config, Arc::new(Stylesheet::new())).unwrap());
        engine
            .define(
                ElementDefinition::new("text")
                    .variant(
                        "size",
                        VariantAxis::new()
                            .value("1", Declaration::new().set("fontSize", StyleValue::token("1")))
                            .value("2", Declaration::new().set("fontSize", StyleValue::token("2"))),
                    )
                    .default_variant("size", "1"),
            )
            .unwrap();

        let mut env = Environment::new();
        register_functions(&mut env, Arc::clone(&engine));
        (env, engine)
    }

    #[test]
    fn test_style_function_builds_class() {
        let (env, engine) = env();
        let out = env
            .render_str(r#"{{ style("text", size="2", class="intro") }}"#, context! {})
            .unwrap();
        let expected = engine
            .build("text", &Selection::new().variant("size", "2").class("intro"))
            .unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn test_style_function_numbers_and_css() {
        let (env, engine) = env();
        let out = env
            .render_str(r#"{{ style("text", size=2, css={"mb": "$5"}) }}"#, context! {})
            .unwrap();
        let class = out.split(' ').next().unwrap().to_string();
        assert!(engine.stylesheet().to_css().contains(&format!(
            ".{}{{font-size:14px;margin-bottom:25px}}",
            class
        )));
    }

    #[test]
    fn test_style_function_responsive_map() {
        let (env, engine) = env();
        env.render_str(
            r#"{{ style("text", size={"@initial": "1", "@bp1": "2"}) }}"#,
            context! {},
        )
        .unwrap();
        assert!(engine
            .stylesheet()
            .to_css()
            .contains("@media (min-width: 520px){"));
    }

    #[test]
    fn test_style_function_reports_style_errors() {
        let (env, _) = env();
        let err = env
            .render_str(r#"{{ style("text", css={"color": "$nope"}) }}"#, context! {})
            .unwrap_err();
        assert!(err.to_string().contains("$nope"));

        let err = env
            .render_str(r#"{{ style("card") }}"#, context! {})
            .unwrap_err();
        assert!(err.to_string().contains("card"));
    }

    #[test]
    fn test_stylesheet_function_is_safe() {
        let (mut env, _) = env();
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::Html);
        let out = env
            .render_str(r#"{{ style("text") }}{{ stylesheet() }}"#, context! {})
            .unwrap();
        assert!(out.contains("<style id=\"stitchwork\">"));
        assert!(out.contains("font-size:13px"));
    }

    #[test]
    fn test_class_names_forms() {
        assert_eq!(
            class_names(&serde_json::json!("a  b")),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(
            class_names(&serde_json::json!(["a", ["b"]])),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
