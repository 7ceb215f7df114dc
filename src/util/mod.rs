//! Browser-side helpers shared by the runtime and components.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pure helpers (attribute vocabulary, token parsing, config loading, outcome
//! handling) compile everywhere and are unit-tested natively. Modules that
//! implement the coordination seams over `web-sys` only exist with the
//! `hydrate` feature.

pub mod config_blob;
pub mod csrf;
pub mod dom;
pub mod outcome;
pub mod sortable;

#[cfg(feature = "hydrate")]
pub mod browser;
#[cfg(feature = "hydrate")]
pub mod containers;
#[cfg(feature = "hydrate")]
pub mod favorites_dom;
#[cfg(feature = "hydrate")]
pub mod js;
#[cfg(feature = "hydrate")]
pub mod overlay_host;
