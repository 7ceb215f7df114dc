//! Search panel display rows.
//!
//! DESIGN
//! ======
//! The search coordinator owns ordering and staleness; this module only
//! projects its current view into flat rows the panel renders, so the
//! markup stays a dumb loop over `SearchRow`.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use coord::config::CoordConfig;
use coord::search::{SearchView, board_href, card_href};

/// Which kind of hit a row shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Card,
    Board,
}

impl RowKind {
    pub fn css_modifier(self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::Board => "board",
        }
    }
}

/// One rendered result row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRow {
    pub key: String,
    pub kind: RowKind,
    pub title: String,
    /// "Board / Column" for cards, empty for boards.
    pub context: String,
    pub excerpt: Option<String>,
    /// Where the query matched, shown as a badge on card rows.
    pub badge: Option<&'static str>,
    pub href: String,
    pub highlighted: bool,
}

/// Rows for `view`, cards first, in keyboard order.
pub fn rows(view: &SearchView, highlight: Option<usize>, config: &CoordConfig) -> Vec<SearchRow> {
    let SearchView::Results { results, .. } = view else {
        return Vec::new();
    };
    let cards = results.cards.iter().map(|hit| SearchRow {
        key: format!("card-{}", hit.id),
        kind: RowKind::Card,
        title: hit.title.clone(),
        context: card_context(&hit.board_name, &hit.column_name),
        excerpt: hit.excerpt.clone().filter(|e| !e.trim().is_empty()),
        badge: Some(hit.match_in.label()),
        href: card_href(hit, config),
        highlighted: false,
    });
    let boards = results.boards.iter().map(|hit| SearchRow {
        key: format!("board-{}", hit.id),
        kind: RowKind::Board,
        title: hit.name.clone(),
        context: String::new(),
        excerpt: None,
        badge: None,
        href: board_href(hit, config),
        highlighted: false,
    });
    cards
        .chain(boards)
        .enumerate()
        .map(|(i, row)| SearchRow { highlighted: highlight == Some(i), ..row })
        .collect()
}

fn card_context(board: &str, column: &str) -> String {
    match (board.is_empty(), column.is_empty()) {
        (false, false) => format!("{board} / {column}"),
        (false, true) => board.to_owned(),
        (true, false) => column.to_owned(),
        (true, true) => String::new(),
    }
}

/// Status line under the input, if any.
pub fn status_line(view: &SearchView) -> Option<String> {
    match view {
        SearchView::Idle => None,
        SearchView::Loading { .. } => Some("Searching\u{2026}".to_owned()),
        SearchView::Results { query, results } if results.is_empty() => Some(format!("No results for \u{201c}{query}\u{201d}")),
        SearchView::Results { .. } => None,
        SearchView::Error(message) => Some(message.clone()),
    }
}
