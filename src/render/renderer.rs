//! Pre-compiled template renderer.

use std::ops::Deref;

use minijinja::{Environment, Error};
use serde::Serialize;

use super::functions::register_functions;
use crate::engine::Engine;

/// A renderer with pre-registered templates and the style functions.
///
/// Use this when pages are rendered repeatedly. Templates are compiled once
/// and reused; every render shares the engine's stylesheet.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use stitchwork::site::SiteStyles;
/// use stitchwork::{Renderer, Stylesheet};
/// use serde::Serialize;
///
/// let site = SiteStyles::with_sheet(Arc::new(Stylesheet::new())).unwrap();
/// let mut renderer = Renderer::new(Arc::new(site.into_engine()));
/// renderer
///     .add_template("title", r#"<h1 class="{{ style('text', size='2') }}">{{ title }}</h1>"#)
///     .unwrap();
///
/// #[derive(Serialize)]
/// struct Page { title: String }
///
/// let html = renderer.render("title", &Page { title: "Writing".into() }).unwrap();
/// assert!(html.starts_with("<h1 class=\"pd-c-"));
/// ```
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Creates a renderer whose `style()` calls build on `engine`.
    ///
    /// `engine` is anything that derefs to an [`Engine`]: an `Arc<Engine>`,
    /// or the `&'static Engine` returned by [`install`](crate::engine::install).
    pub fn new<E>(engine: E) -> Self
    where
        E: Deref<Target = Engine> + Clone + Send + Sync + 'static,
    {
        let mut env = Environment::new();
        register_functions(&mut env, engine);
        Self { env }
    }

    /// Registers a named template.
    ///
    /// The template is compiled immediately; errors are returned if syntax is invalid.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), Error> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
    }

    /// Renders a registered template with the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is not found, rendering fails, or
    /// a `style()` call hits a style error.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, Error> {
        let tmpl = self.env.get_template(name)?;
        tmpl.render(data)
    }
}
