//! Theme system: token scales, breakpoints and the property → scale map.
//!
//! This module provides:
//!
//! - [`Theme`]: token scales with a fluent builder API and alias support
//! - [`ResolvedTheme`]: the frozen, alias-free theme used at build time
//! - [`Breakpoints`]: ordered named media conditions
//!
//! Themes are resolved once when an engine is created and never change
//! afterwards.

pub(crate) mod map;
mod media;
#[allow(clippy::module_inception)]
mod theme;

pub use media::Breakpoints;
pub use theme::{ResolvedTheme, Theme};
