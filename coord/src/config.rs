//! Runtime configuration.
//!
//! The server embeds a JSON object in the page; every field is optional and
//! falls back to the defaults below so an absent blob still yields a working
//! client.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::{ENTITY_PARAM, MUTATION_BLOCK_MS, SEARCH_DEBOUNCE_MS, TOUCH_DRAG_DELAY_MS};
use crate::entity::{EntityId, expand_template};
use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoordConfig {
    /// Query parameter holding the open card id.
    pub entity_param: String,
    /// Element id of the overlay container toggled visible/hidden.
    pub overlay_root: String,
    /// Element id of the swap target inside the overlay.
    pub overlay_region: String,
    /// Element ids of other swap targets whose widgets the core re-binds.
    pub owned_regions: Vec<String>,
    pub card_detail_url: String,
    pub card_move_url: String,
    pub card_duplicate_url: String,
    pub group_add_url: String,
    pub group_remove_url: String,
    pub favorite_url: String,
    pub board_url: String,
    pub search_url: String,
    pub mutation_block_ms: f64,
    pub search_debounce_ms: u32,
    pub search_min_chars: usize,
    pub touch_drag_delay_ms: u32,
    pub csrf_cookie: String,
    pub csrf_field: String,
    pub csrf_header: String,
    pub log_level: String,
}

impl Default for CoordConfig {
    fn default() -> Self {
        Self {
            entity_param: ENTITY_PARAM.to_owned(),
            overlay_root: "card-modal".to_owned(),
            overlay_region: "card-modal-body".to_owned(),
            owned_regions: vec![
                "checklist-items".to_owned(),
                "group-items".to_owned(),
                "search-results".to_owned(),
            ],
            card_detail_url: "/cards/{id}/".to_owned(),
            card_move_url: "/cards/{id}/move/".to_owned(),
            card_duplicate_url: "/cards/{id}/duplicate/".to_owned(),
            group_add_url: "/groups/{id}/boards/add/".to_owned(),
            group_remove_url: "/groups/{id}/boards/remove/".to_owned(),
            favorite_url: "/boards/{id}/favorite/".to_owned(),
            board_url: "/boards/{id}/".to_owned(),
            search_url: "/search/".to_owned(),
            mutation_block_ms: MUTATION_BLOCK_MS,
            search_debounce_ms: SEARCH_DEBOUNCE_MS,
            search_min_chars: 1,
            touch_drag_delay_ms: TOUCH_DRAG_DELAY_MS,
            csrf_cookie: "csrftoken".to_owned(),
            csrf_field: "csrfmiddlewaretoken".to_owned(),
            csrf_header: "X-CSRFToken".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl CoordConfig {
    /// Parse the embedded JSON blob.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the blob is not a JSON object
    /// matching the config shape.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Whether a swapped region id is one the core re-binds widgets for.
    #[must_use]
    pub fn owns_region(&self, region: &str) -> bool {
        self.owned_regions.iter().any(|r| r == region)
    }

    #[must_use]
    pub fn card_detail_url(&self, id: EntityId) -> String {
        expand_template(&self.card_detail_url, id)
    }

    #[must_use]
    pub fn card_move_url(&self, id: EntityId) -> String {
        expand_template(&self.card_move_url, id)
    }

    #[must_use]
    pub fn card_duplicate_url(&self, id: EntityId) -> String {
        expand_template(&self.card_duplicate_url, id)
    }

    #[must_use]
    pub fn group_add_url(&self, group: EntityId) -> String {
        expand_template(&self.group_add_url, group)
    }

    #[must_use]
    pub fn group_remove_url(&self, group: EntityId) -> String {
        expand_template(&self.group_remove_url, group)
    }

    #[must_use]
    pub fn favorite_url(&self, board: EntityId) -> String {
        expand_template(&self.favorite_url, board)
    }

    #[must_use]
    pub fn board_url(&self, board: EntityId) -> String {
        expand_template(&self.board_url, board)
    }

    /// Map `log_level` onto a `log` filter, defaulting to `Info`.
    #[must_use]
    pub fn log_level(&self) -> log::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "error" => log::Level::Error,
            "warn" => log::Level::Warn,
            "debug" => log::Level::Debug,
            "trace" => log::Level::Trace,
            _ => log::Level::Info,
        }
    }
}
