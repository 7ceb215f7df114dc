//! Leptos components mounted into server-rendered pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! The board itself is server markup. Components only own islands the server
//! leaves empty, and read coordination state handed in as props.

pub mod search_panel;
