//! Board favorites: the star toggle and the sidebar favorites list.
//!
//! A toggle flips the star and list membership at once, then asks the
//! server. The server's `favorited` flag is authoritative: when it disagrees
//! with the optimistic state the local state follows it.

#[cfg(test)]
#[path = "favorites_test.rs"]
mod favorites_test;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use crate::consts::{STAR_EMPTY, STAR_FILLED};
use crate::entity::EntityId;
use crate::error::{DomInconsistency, MutationError};
use crate::mutation::{DomMutation, MutationExecutor, MutationKind, MutationOutcome};
use crate::payload::FavoriteReply;

/// Star glyph for a board.
#[must_use]
pub fn glyph(favorited: bool) -> &'static str {
    if favorited { STAR_FILLED } else { STAR_EMPTY }
}

/// Ordered favorite board ids.
#[derive(Debug, Default)]
pub struct FavoritesState {
    ids: RefCell<Vec<EntityId>>,
}

impl FavoritesState {
    #[must_use]
    pub fn new(ids: Vec<EntityId>) -> Self {
        let mut unique = Vec::with_capacity(ids.len());
        for id in ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }
        Self { ids: RefCell::new(unique) }
    }

    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        self.ids.borrow().clone()
    }

    #[must_use]
    pub fn contains(&self, board: EntityId) -> bool {
        self.ids.borrow().contains(&board)
    }

    #[must_use]
    pub fn glyph(&self, board: EntityId) -> &'static str {
        glyph(self.contains(board))
    }

    fn position(&self, board: EntityId) -> Option<usize> {
        self.ids.borrow().iter().position(|id| *id == board)
    }

    /// Add or remove `board`. New favorites go to the end, or to `at` when
    /// given. Returns whether membership changed.
    fn set(&self, board: EntityId, favorited: bool, at: Option<usize>) -> bool {
        let mut ids = self.ids.borrow_mut();
        match (ids.iter().position(|id| *id == board), favorited) {
            (Some(pos), false) => {
                ids.remove(pos);
                true
            }
            (None, true) => {
                let index = at.map_or(ids.len(), |i| i.min(ids.len()));
                ids.insert(index, board);
                true
            }
            _ => false,
        }
    }
}

/// DOM mirror of the favorites state: the star button and sidebar entry.
pub trait FavoritesView {
    /// Render `board` as favorited or not, with its list entry at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`DomInconsistency`] when the star or list element is missing.
    fn render(&self, board: EntityId, favorited: bool, index: Option<usize>) -> Result<(), DomInconsistency>;
}

/// One optimistic toggle; revert restores the prior position in the list.
struct FavoriteFlip {
    state: Rc<FavoritesState>,
    view: Rc<dyn FavoritesView>,
    board: EntityId,
    previous: Option<usize>,
}

impl DomMutation for FavoriteFlip {
    fn apply(&mut self) -> Result<(), DomInconsistency> {
        let favorited = self.previous.is_none();
        self.state.set(self.board, favorited, None);
        self.view.render(self.board, favorited, self.state.position(self.board))
    }

    fn revert(&mut self) -> Result<(), DomInconsistency> {
        let favorited = self.previous.is_some();
        self.state.set(self.board, favorited, self.previous);
        self.view.render(self.board, favorited, self.previous)
    }
}

/// Server reply to a toggle: status plus the decoded body.
pub type FavoriteConfirmation = Result<(u16, FavoriteReply), MutationError>;

pub struct Favorites {
    state: Rc<FavoritesState>,
    view: Rc<dyn FavoritesView>,
    executor: Rc<MutationExecutor>,
}

impl Favorites {
    pub fn new(state: Rc<FavoritesState>, view: Rc<dyn FavoritesView>, executor: Rc<MutationExecutor>) -> Self {
        Self { state, view, executor }
    }

    #[must_use]
    pub fn state(&self) -> &Rc<FavoritesState> {
        &self.state
    }

    /// Toggle `board` and reconcile with the server's answer.
    pub async fn toggle<F>(&self, board: EntityId, request: F) -> MutationOutcome
    where
        F: Future<Output = FavoriteConfirmation>,
    {
        let flip = FavoriteFlip {
            state: Rc::clone(&self.state),
            view: Rc::clone(&self.view),
            board,
            previous: self.state.position(board),
        };
        let in_flight = match self.executor.begin(MutationKind::FavoriteToggle, flip) {
            Ok(in_flight) => in_flight,
            Err(outcome) => return outcome,
        };
        let (confirmation, reply) = match request.await {
            Ok((status, reply)) => (Ok(status), reply),
            Err(err) => (Err(err), FavoriteReply::default()),
        };
        let outcome = self.executor.settle(in_flight, confirmation);
        if outcome == MutationOutcome::CommittedLocally
            && let Some(favorited) = reply.favorited
        {
            return self.reconcile(board, favorited);
        }
        outcome
    }

    /// Make local state match the server's flag.
    fn reconcile(&self, board: EntityId, favorited: bool) -> MutationOutcome {
        if !self.state.set(board, favorited, None) {
            return MutationOutcome::CommittedLocally;
        }
        log::info!("favorite: server says board {board} favorited={favorited}");
        match self.view.render(board, favorited, self.state.position(board)) {
            Ok(()) => MutationOutcome::CommittedLocally,
            Err(err) => {
                log::warn!("favorite: reconcile render failed, reloading: {err}");
                MutationOutcome::RequiresFullReload
            }
        }
    }
}
