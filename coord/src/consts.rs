//! Default timings and names shared across the coordination core.

/// Query parameter that carries the open card's id.
pub const ENTITY_PARAM: &str = "card";

/// How long a mutating action keeps the overlay from re-opening, in milliseconds.
pub const MUTATION_BLOCK_MS: f64 = 4000.0;

/// Quiet interval after the last keystroke before a search request fires.
pub const SEARCH_DEBOUNCE_MS: u32 = 250;

/// Minimum press duration before a touch drag activates.
pub const TOUCH_DRAG_DELAY_MS: u32 = 200;

/// Glyph shown for a favorited board.
pub const STAR_FILLED: &str = "\u{2605}";

/// Glyph shown for a board that is not a favorite.
pub const STAR_EMPTY: &str = "\u{2606}";
