//! Coordination core for the card board's browser layer.
//!
//! This crate owns every piece of client logic that has ordering or
//! failure-recovery hazards: the overlay lifecycle, its request gate, URL
//! synchronization, optimistic mutations with rollback, drag-drop intents,
//! and stale-safe search. It has no browser dependency. The host crate
//! implements the small traits at each seam (clock, address bar, overlay DOM,
//! container DOM) with `web-sys` and drives the pipelines from DOM events.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`gate`] | Named, self-expiring blocks that decide whether the overlay may open |
//! | [`history`] | Reads and writes the active entity id in the address bar |
//! | [`overlay`] | Overlay open/closed state machine and swap reactions |
//! | [`mutation`] | Optimistic mutation executor and the commit-policy table |
//! | [`drag`] | Drag zone configuration, drop intents, and rollback placements |
//! | [`search`] | Debounce decisions and sequence-numbered response filtering |
//! | [`dock`] | Action dock menu state and action URL resolution |
//! | [`favorites`] | Optimistic board favorite toggling |
//! | [`payload`] | JSON request and reply bodies for the mutation endpoints |
//! | [`binding`] | Once-per-element widget binding registry |
//! | [`coordinator`] | Process-wide context bundle with `init`/`reset` |
//! | [`config`] | Runtime configuration with defaults |
//! | [`consts`] | Default timings and names |

pub mod binding;
pub mod clock;
pub mod config;
pub mod consts;
pub mod coordinator;
pub mod dock;
pub mod drag;
pub mod entity;
pub mod error;
pub mod favorites;
pub mod gate;
pub mod history;
pub mod mutation;
pub mod overlay;
pub mod payload;
pub mod search;

#[cfg(test)]
mod test_support;

pub use coordinator::Coordinator;
pub use entity::EntityId;
