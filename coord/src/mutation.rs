//! Optimistic mutation executor.
//!
//! Every mutating gesture (drag relocation, group membership, duplication,
//! dock move, favorite toggle) runs the same ordered pipeline:
//!
//! 1. **Block** the gate under the kind's reason so a server-triggered swap
//!    cannot re-open the overlay mid-transition. Kinds that do not touch card
//!    markup (favorite toggles) skip the block.
//! 2. **Apply** the local DOM change so the UI shows the intended end state.
//! 3. **Request** confirmation from the server (the only await point).
//! 4. **Settle**: on success keep the change (or ask for a reload, per the
//!    commit-policy table); on transport failure or non-2xx, revert it. A
//!    revert that cannot find its DOM context asks for a reload. Card and
//!    group kinds then close the overlay and drop the id from the URL.
//!
//! The executor never reloads the page itself. It returns a
//! [`MutationOutcome`] and the caller owns navigation. Failed mutations are
//! never retried; the user repeats the gesture.

#[cfg(test)]
#[path = "mutation_test.rs"]
mod mutation_test;

use std::future::Future;
use std::rc::Rc;

use uuid::Uuid;

use crate::error::{DomInconsistency, MutationError, is_success};
use crate::gate::Gate;
use crate::overlay::OverlayController;

/// What the server reported for a confirming request: an HTTP status, or a
/// transport failure before any status arrived.
pub type Confirmation = Result<u16, MutationError>;

/// Mutating actions, each with its gate reason, overlay policy, and commit
/// policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// Card dragged to another column or position.
    CardMove,
    /// Card moved from the action dock's move panel.
    CardMoveViaDock,
    CardDuplicate,
    /// Board dropped into a board group.
    GroupAdd,
    /// Board removed from a board group.
    GroupRemove,
    FavoriteToggle,
}

/// How much to trust the optimistic DOM once the server confirms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommitPolicy {
    /// The local change is exactly what the server would render.
    TrustLocal,
    /// The local change is an approximation; reload to get server markup.
    ReloadOnCommit,
}

impl MutationKind {
    pub const ALL: [Self; 6] = [
        Self::CardMove,
        Self::CardMoveViaDock,
        Self::CardDuplicate,
        Self::GroupAdd,
        Self::GroupRemove,
        Self::FavoriteToggle,
    ];

    /// Gate reason installed while this kind is in flight; `None` leaves the
    /// gate alone.
    #[must_use]
    pub fn block_reason(self) -> Option<&'static str> {
        match self {
            Self::CardMove | Self::CardMoveViaDock => Some("move-card"),
            Self::CardDuplicate => Some("duplicate-card"),
            Self::GroupAdd | Self::GroupRemove => Some("board-group"),
            Self::FavoriteToggle => None,
        }
    }

    /// Whether settling closes the overlay and clears the URL id.
    ///
    /// Sidebar stars never change what an open card shows.
    #[must_use]
    pub fn closes_overlay(self) -> bool {
        !matches!(self, Self::FavoriteToggle)
    }

    /// The single table deciding whether a confirmed change is kept as-is.
    ///
    /// Dock moves and duplicates cannot build the destination markup locally
    /// (the duplicate has no server id yet), and group additions show
    /// server-rendered board previews, so those reload.
    #[must_use]
    pub fn commit_policy(self) -> CommitPolicy {
        match self {
            Self::CardMove | Self::GroupRemove | Self::FavoriteToggle => CommitPolicy::TrustLocal,
            Self::CardMoveViaDock | Self::CardDuplicate | Self::GroupAdd => CommitPolicy::ReloadOnCommit,
        }
    }
}

/// A local DOM change that can be undone.
pub trait DomMutation {
    /// Bring the DOM to the intended end state.
    ///
    /// # Errors
    ///
    /// Returns [`DomInconsistency`] when an expected element or container is missing.
    fn apply(&mut self) -> Result<(), DomInconsistency>;

    /// Restore the DOM to exactly its pre-apply state.
    ///
    /// # Errors
    ///
    /// Returns [`DomInconsistency`] when the original context is gone.
    fn revert(&mut self) -> Result<(), DomInconsistency>;
}

/// For actions with nothing to show before the server answers.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDomChange;

impl DomMutation for NoDomChange {
    fn apply(&mut self) -> Result<(), DomInconsistency> {
        Ok(())
    }

    fn revert(&mut self) -> Result<(), DomInconsistency> {
        Ok(())
    }
}

/// How a mutation ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Confirmed; the optimistic DOM is authoritative.
    CommittedLocally,
    /// The DOM cannot be trusted; the caller should reload the page.
    RequiresFullReload,
    /// The server did not confirm and the local change was undone.
    RolledBack(MutationError),
}

/// A mutation applied locally and awaiting confirmation.
#[derive(Debug)]
pub struct InFlight<M> {
    id: Uuid,
    kind: MutationKind,
    mutation: M,
}

pub struct MutationExecutor {
    gate: Rc<Gate>,
    overlay: Rc<OverlayController>,
    block_ms: f64,
}

impl MutationExecutor {
    pub fn new(gate: Rc<Gate>, overlay: Rc<OverlayController>, block_ms: f64) -> Self {
        Self { gate, overlay, block_ms }
    }

    /// Block the gate and apply the local change.
    ///
    /// # Errors
    ///
    /// Returns [`MutationOutcome::RequiresFullReload`] when the change could
    /// not be applied; no request should be sent in that case.
    pub fn begin<M: DomMutation>(&self, kind: MutationKind, mut mutation: M) -> Result<InFlight<M>, MutationOutcome> {
        if let Some(reason) = kind.block_reason() {
            self.gate.block(self.block_ms, reason);
        }
        let id = Uuid::new_v4();
        if let Err(err) = mutation.apply() {
            log::warn!("mutation {kind:?} {id}: apply failed, reloading: {err}");
            return Err(MutationOutcome::RequiresFullReload);
        }
        log::debug!("mutation {kind:?} {id}: applied locally");
        Ok(InFlight { id, kind, mutation })
    }

    /// Commit or roll back once the server has answered.
    pub fn settle<M: DomMutation>(&self, in_flight: InFlight<M>, confirmation: Confirmation) -> MutationOutcome {
        let InFlight { id, kind, mut mutation } = in_flight;
        let failure = match confirmation {
            Ok(status) if is_success(status) => None,
            Ok(status) => Some(MutationError::Rejected { status }),
            Err(err) => Some(err),
        };

        if kind.closes_overlay() {
            self.overlay.close_after_mutation();
        }

        let Some(error) = failure else {
            log::debug!("mutation {kind:?} {id}: confirmed");
            return match kind.commit_policy() {
                CommitPolicy::TrustLocal => MutationOutcome::CommittedLocally,
                CommitPolicy::ReloadOnCommit => MutationOutcome::RequiresFullReload,
            };
        };

        log::warn!("mutation {kind:?} {id}: {error} (status {:?}), rolling back", error.status());
        if let Err(err) = mutation.revert() {
            log::warn!("mutation {kind:?} {id}: rollback failed, reloading: {err}");
            return MutationOutcome::RequiresFullReload;
        }
        MutationOutcome::RolledBack(error)
    }

    /// Run the whole pipeline: block, apply, await `request`, settle.
    ///
    /// `request` is not polled when the local apply fails.
    pub async fn run<M, F>(&self, kind: MutationKind, mutation: M, request: F) -> MutationOutcome
    where
        M: DomMutation,
        F: Future<Output = Confirmation>,
    {
        let in_flight = match self.begin(kind, mutation) {
            Ok(in_flight) => in_flight,
            Err(outcome) => return outcome,
        };
        let confirmation = request.await;
        self.settle(in_flight, confirmation)
    }
}
