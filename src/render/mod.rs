//! Template integration.
//!
//! Pages are rendered with minijinja; the engine is exposed to templates as
//! two functions:
//!
//! - `style(kind, **kwargs)` builds a class for an element kind
//! - `stylesheet()` returns the accumulated `<style>` element, marked safe
//!
//! Templates call `stylesheet()` after the markup that uses `style()`, so the
//! tag contains every rule the page needed.

mod functions;
mod renderer;

pub use functions::register_functions;
pub use renderer::Renderer;
