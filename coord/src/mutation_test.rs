use std::cell::{Cell, RefCell};

use futures::executor::block_on;

use super::*;
use crate::EntityId;
use crate::test_support::{HostCall, Harness};

// =============================================================
// Helpers
// =============================================================

#[derive(Default)]
struct Tally {
    applied: Cell<u32>,
    reverted: Cell<u32>,
    fail_apply: bool,
    fail_revert: bool,
}

struct FakeMutation(Rc<Tally>);

impl DomMutation for FakeMutation {
    fn apply(&mut self) -> Result<(), DomInconsistency> {
        if self.0.fail_apply {
            return Err(DomInconsistency::new("column gone"));
        }
        self.0.applied.set(self.0.applied.get() + 1);
        Ok(())
    }

    fn revert(&mut self) -> Result<(), DomInconsistency> {
        if self.0.fail_revert {
            return Err(DomInconsistency::new("origin gone"));
        }
        self.0.reverted.set(self.0.reverted.get() + 1);
        Ok(())
    }
}

fn tally() -> Rc<Tally> {
    Rc::new(Tally::default())
}

async fn status(code: u16) -> Confirmation {
    Ok(code)
}

async fn offline() -> Confirmation {
    Err(MutationError::Transport("network unreachable".to_owned()))
}

// =============================================================
// Policy table
// =============================================================

#[test]
fn commit_policy_table() {
    assert_eq!(MutationKind::CardMove.commit_policy(), CommitPolicy::TrustLocal);
    assert_eq!(MutationKind::GroupRemove.commit_policy(), CommitPolicy::TrustLocal);
    assert_eq!(MutationKind::FavoriteToggle.commit_policy(), CommitPolicy::TrustLocal);
    assert_eq!(MutationKind::CardMoveViaDock.commit_policy(), CommitPolicy::ReloadOnCommit);
    assert_eq!(MutationKind::CardDuplicate.commit_policy(), CommitPolicy::ReloadOnCommit);
    assert_eq!(MutationKind::GroupAdd.commit_policy(), CommitPolicy::ReloadOnCommit);
}

#[test]
fn card_and_group_kinds_block_and_close_the_overlay() {
    for kind in MutationKind::ALL {
        let touches_cards = kind != MutationKind::FavoriteToggle;
        assert_eq!(kind.block_reason().is_some(), touches_cards, "{kind:?}");
        assert_eq!(kind.closes_overlay(), touches_cards, "{kind:?}");
    }
    assert_eq!(MutationKind::CardMove.block_reason(), Some("move-card"));
    assert_eq!(MutationKind::GroupAdd.block_reason(), Some("board-group"));
}

// =============================================================
// Pipeline
// =============================================================

#[test]
fn begin_blocks_gate_and_applies() {
    let h = Harness::new();
    let p = tally();
    let in_flight = h.coord.mutations().begin(MutationKind::CardMove, FakeMutation(p.clone()));
    assert!(in_flight.is_ok());
    assert_eq!(p.applied.get(), 1);
    assert_eq!(h.coord.gate().active_reasons(), vec!["move-card".to_owned()]);
}

#[test]
fn success_with_trust_local_commits_locally() {
    let h = Harness::new();
    let p = tally();
    let outcome = block_on(h.coord.mutations().run(MutationKind::CardMove, FakeMutation(p.clone()), status(200)));
    assert_eq!(outcome, MutationOutcome::CommittedLocally);
    assert_eq!(p.reverted.get(), 0);
}

#[test]
fn success_with_reload_policy_requests_reload() {
    let h = Harness::new();
    let outcome = block_on(h.coord.mutations().run(MutationKind::GroupAdd, FakeMutation(tally()), status(201)));
    assert_eq!(outcome, MutationOutcome::RequiresFullReload);
}

#[test]
fn rejection_rolls_back() {
    let h = Harness::new();
    let p = tally();
    let outcome = block_on(h.coord.mutations().run(MutationKind::CardMove, FakeMutation(p.clone()), status(403)));
    assert_eq!(outcome, MutationOutcome::RolledBack(MutationError::Rejected { status: 403 }));
    assert_eq!(p.reverted.get(), 1);
}

#[test]
fn transport_failure_is_handled_like_rejection() {
    let h = Harness::new();
    let p = tally();
    let outcome = block_on(h.coord.mutations().run(MutationKind::CardMove, FakeMutation(p.clone()), offline()));
    assert!(matches!(outcome, MutationOutcome::RolledBack(MutationError::Transport(_))));
    assert_eq!(p.reverted.get(), 1);
}

#[test]
fn failed_rollback_requires_reload() {
    let h = Harness::new();
    let p = Rc::new(Tally { fail_revert: true, ..Default::default() });
    let outcome = block_on(h.coord.mutations().run(MutationKind::CardMove, FakeMutation(p), status(500)));
    assert_eq!(outcome, MutationOutcome::RequiresFullReload);
}

#[test]
fn failed_apply_skips_request_and_requires_reload() {
    let h = Harness::new();
    let p = Rc::new(Tally { fail_apply: true, ..Default::default() });
    let sent = Rc::new(RefCell::new(false));
    let sent_in_request = sent.clone();
    let request = async move {
        *sent_in_request.borrow_mut() = true;
        Ok(200)
    };
    let outcome = block_on(h.coord.mutations().run(MutationKind::CardMove, FakeMutation(p), request));
    assert_eq!(outcome, MutationOutcome::RequiresFullReload);
    assert!(!*sent.borrow());
}

#[test]
fn success_closes_open_overlay_and_clears_url() {
    let h = Harness::new();
    h.open(EntityId(12));
    assert_eq!(h.bar.href.borrow().as_str(), "https://board.test/boards/1/?card=12");
    let outcome = block_on(h.coord.mutations().run(MutationKind::CardDuplicate, NoDomChange, status(200)));
    assert_eq!(outcome, MutationOutcome::RequiresFullReload);
    assert!(!h.coord.overlay().is_open());
    assert_eq!(h.bar.href.borrow().as_str(), "https://board.test/boards/1/");
    assert!(h.host.take().contains(&HostCall::Hide));
}

#[test]
fn failure_also_closes_overlay() {
    let h = Harness::new();
    h.open(EntityId(12));
    block_on(h.coord.mutations().run(MutationKind::CardMoveViaDock, NoDomChange, status(500)));
    assert!(!h.coord.overlay().is_open());
}

#[test]
fn favorite_toggle_leaves_open_overlay_and_gate_alone() {
    let h = Harness::new();
    h.open(EntityId(42));
    let outcome = block_on(h.coord.mutations().run(MutationKind::FavoriteToggle, NoDomChange, status(200)));
    assert_eq!(outcome, MutationOutcome::CommittedLocally);
    assert!(h.coord.overlay().is_open());
    assert_eq!(h.bar.href.borrow().as_str(), "https://board.test/boards/1/?card=42");
    assert!(h.coord.gate().active_reasons().is_empty());
    assert!(h.host.take().is_empty());

    h.clock.advance(1000.0);
    assert_eq!(
        h.coord.overlay().open_card(EntityId(7), crate::history::HistoryMode::Push),
        crate::overlay::OpenOutcome::Requested
    );
}

#[test]
fn failed_favorite_toggle_keeps_overlay_open() {
    let h = Harness::new();
    h.open(EntityId(42));
    block_on(h.coord.mutations().run(MutationKind::FavoriteToggle, NoDomChange, status(500)));
    assert!(h.coord.overlay().is_open());
    assert_eq!(h.coord.overlay().state().current_entity_id(), Some(EntityId(42)));
}

#[test]
fn block_outlives_the_request() {
    let h = Harness::new();
    block_on(h.coord.mutations().run(MutationKind::CardMove, NoDomChange, status(200)));
    assert!(h.coord.gate().is_blocked());
    h.clock.advance(4000.0);
    assert!(h.coord.gate().can_open());
}

#[test]
fn split_begin_settle_matches_run() {
    let h = Harness::new();
    let p = tally();
    let in_flight = h.coord.mutations().begin(MutationKind::FavoriteToggle, FakeMutation(p.clone())).unwrap();
    let outcome = h.coord.mutations().settle(in_flight, Ok(204));
    assert_eq!(outcome, MutationOutcome::CommittedLocally);
    assert_eq!(p.applied.get(), 1);
}
