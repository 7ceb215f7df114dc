//! # corkboard
//!
//! Leptos + WASM client for the server-rendered kanban board. The server
//! renders boards, columns, and card details; this crate coordinates the
//! card overlay, URL state, optimistic drag-and-drop and favorite toggles,
//! the card action dock, and search-as-you-type.
//!
//! Coordination logic lives in the `coord` crate, which is plain Rust and
//! tested natively. This crate implements its seams over `web-sys` and wires
//! page events into it.

pub mod components;
pub mod error;
pub mod net;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
pub mod boot;
#[cfg(feature = "hydrate")]
pub mod runtime;

/// WASM entry point.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    boot::init_logging();
    if let Err(err) = boot::start() {
        log::error!("corkboard client not started: {err}");
    }
}
