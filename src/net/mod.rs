//! HTTP calls that confirm mutations and run searches.
//!
//! SYSTEM CONTEXT
//! ==============
//! Board markup itself is fetched by the page's swap library; `api` only
//! covers the JSON and status-only requests the client issues directly.

pub mod api;
