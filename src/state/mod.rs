//! View-state projections rendered by the mounted components.

pub mod search;
