//! Element kinds with variant axes.
//!
//! An [`ElementDefinition`] describes a kind (base style, axes, defaults,
//! compounds). Registering it with an [`Engine`](crate::Engine) validates it
//! and returns a [`StyledElement`], which turns a [`Selection`] into a class
//! name.

mod builder;
mod definition;
mod registry;
mod selection;

pub use builder::{ResolvedStyle, StyledElement};
pub(crate) use definition::Element;
pub use definition::{CompoundVariant, ElementDefinition, VariantAxis};
pub use registry::ElementRegistry;
pub use selection::{Selection, VariantChoice};
