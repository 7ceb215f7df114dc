//! Search-as-you-type coordination.
//!
//! SYSTEM CONTEXT
//! ==============
//! Keystrokes are debounced, then each fired request takes the next sequence
//! number. Responses may arrive in any order; only the one whose sequence is
//! still the latest issued is rendered, so a slow response for an older query
//! can never overwrite newer results. Clearing the input bumps the sequence
//! too, which discards anything still in flight.
//!
//! Debounce cancellation is modeled with tickets: every keystroke supersedes
//! the previous ticket, and a timer firing with a stale ticket issues nothing.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use std::cell::{Cell, RefCell};

use serde::Deserialize;

use crate::config::CoordConfig;
use crate::entity::EntityId;
use crate::error::SearchError;
use crate::history::path_with_entity;

/// A fired search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub sequence: u64,
    pub query: String,
}

/// What the host should do after an input change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Query is blank (or too short): the view was reset, cancel any timer.
    Reset,
    /// Start (or restart) the quiet-interval timer; pass `ticket` back to
    /// [`SearchCoordinator::fire`].
    Debounce { ticket: u64, delay_ms: u32 },
}

/// Where in a card the query matched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchLocation {
    #[default]
    Title,
    Description,
    Checklist,
    Comment,
    #[serde(other)]
    Other,
}

impl MatchLocation {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Checklist => "checklist",
            Self::Comment => "comment",
            Self::Other => "match",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CardHit {
    pub id: EntityId,
    pub board_id: EntityId,
    pub title: String,
    #[serde(default)]
    pub board_name: String,
    #[serde(default)]
    pub column_name: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default, rename = "match")]
    pub match_in: MatchLocation,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct BoardHit {
    pub id: EntityId,
    #[serde(alias = "title")]
    pub name: String,
}

/// Decoded search response body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub cards: Vec<CardHit>,
    #[serde(default)]
    pub boards: Vec<BoardHit>,
}

impl SearchResults {
    /// Parse a response body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Decode`] when the body is not the expected JSON.
    pub fn from_json(raw: &str) -> Result<Self, SearchError> {
        serde_json::from_str(raw).map_err(|e| SearchError::Decode(e.to_string()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.boards.is_empty()
    }

    /// Total selectable rows: cards first, then boards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len() + self.boards.len()
    }

    /// Navigation target for the row at `index` in display order.
    #[must_use]
    pub fn href_at(&self, index: usize, config: &CoordConfig) -> Option<String> {
        if let Some(card) = self.cards.get(index) {
            return Some(card_href(card, config));
        }
        self.boards.get(index - self.cards.len()).map(|board| board_href(board, config))
    }
}

/// Result panel contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchView {
    #[default]
    Idle,
    Loading { query: String },
    Results { query: String, results: SearchResults },
    Error(String),
}

pub struct SearchCoordinator {
    debounce_ms: u32,
    min_chars: usize,
    latest_ticket: Cell<u64>,
    latest_sequence: Cell<u64>,
    in_flight_query: RefCell<String>,
    view: RefCell<SearchView>,
    highlight: Cell<Option<usize>>,
}

impl SearchCoordinator {
    #[must_use]
    pub fn new(debounce_ms: u32, min_chars: usize) -> Self {
        Self {
            debounce_ms,
            min_chars: min_chars.max(1),
            latest_ticket: Cell::new(0),
            latest_sequence: Cell::new(0),
            in_flight_query: RefCell::new(String::new()),
            view: RefCell::new(SearchView::Idle),
            highlight: Cell::new(None),
        }
    }

    #[must_use]
    pub fn from_config(config: &CoordConfig) -> Self {
        Self::new(config.search_debounce_ms, config.search_min_chars)
    }

    /// React to the input's value changing.
    pub fn on_input(&self, raw: &str) -> InputAction {
        let ticket = self.latest_ticket.get() + 1;
        self.latest_ticket.set(ticket);
        if raw.trim().chars().count() < self.min_chars {
            self.reset_view();
            return InputAction::Reset;
        }
        InputAction::Debounce { ticket, delay_ms: self.debounce_ms }
    }

    /// The quiet interval for `ticket` elapsed; issue a request if it is
    /// still the latest keystroke and the query is searchable.
    pub fn fire(&self, ticket: u64, raw: &str) -> Option<SearchRequest> {
        if ticket != self.latest_ticket.get() {
            return None;
        }
        let query = raw.trim();
        if query.chars().count() < self.min_chars {
            return None;
        }
        let sequence = self.latest_sequence.get() + 1;
        self.latest_sequence.set(sequence);
        query.clone_into(&mut self.in_flight_query.borrow_mut());
        *self.view.borrow_mut() = SearchView::Loading { query: query.to_owned() };
        self.highlight.set(None);
        Some(SearchRequest { sequence, query: query.to_owned() })
    }

    /// Whether a response for `sequence` would be rendered.
    #[must_use]
    pub fn is_current(&self, sequence: u64) -> bool {
        sequence == self.latest_sequence.get()
    }

    /// Deliver a response. Returns whether it was rendered; stale responses
    /// are dropped silently.
    pub fn on_response(&self, sequence: u64, result: Result<SearchResults, SearchError>) -> bool {
        if !self.is_current(sequence) {
            log::debug!("search: dropped stale response {sequence} (latest {})", self.latest_sequence.get());
            return false;
        }
        let query = self.in_flight_query.borrow().clone();
        let next = match result {
            Ok(results) => SearchView::Results { query, results },
            Err(err) => {
                log::warn!("search: {err}");
                SearchView::Error("Search failed. Try again.".to_owned())
            }
        };
        *self.view.borrow_mut() = next;
        self.highlight.set(None);
        true
    }

    #[must_use]
    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    #[must_use]
    pub fn highlight(&self) -> Option<usize> {
        self.highlight.get()
    }

    /// Move the keyboard highlight by `delta` rows, clamped to the results.
    pub fn move_highlight(&self, delta: isize) -> Option<usize> {
        let len = match &*self.view.borrow() {
            SearchView::Results { results, .. } => results.len(),
            _ => 0,
        };
        if len == 0 {
            self.highlight.set(None);
            return None;
        }
        let next = match self.highlight.get() {
            None if delta >= 0 => 0,
            None => len - 1,
            Some(current) => current.saturating_add_signed(delta).min(len - 1),
        };
        self.highlight.set(Some(next));
        Some(next)
    }

    /// Navigation target for the highlighted row.
    #[must_use]
    pub fn highlighted_href(&self, config: &CoordConfig) -> Option<String> {
        let index = self.highlight.get()?;
        match &*self.view.borrow() {
            SearchView::Results { results, .. } => results.href_at(index, config),
            _ => None,
        }
    }

    /// Clear the view and invalidate every in-flight request and timer.
    pub fn reset(&self) {
        self.latest_ticket.set(self.latest_ticket.get() + 1);
        self.reset_view();
    }

    fn reset_view(&self) {
        self.latest_sequence.set(self.latest_sequence.get() + 1);
        *self.view.borrow_mut() = SearchView::Idle;
        self.highlight.set(None);
    }
}

/// Open the card's board with the card id attached.
#[must_use]
pub fn card_href(hit: &CardHit, config: &CoordConfig) -> String {
    path_with_entity(&config.board_url(hit.board_id), &config.entity_param, hit.id)
}

#[must_use]
pub fn board_href(hit: &BoardHit, config: &CoordConfig) -> String {
    config.board_url(hit.id)
}
