//! Turning mutation outcomes into page navigation.
//!
//! The coordination core never reloads the page itself; every caller that
//! awaited a mutation hands its outcome here.

#[cfg(test)]
#[path = "outcome_test.rs"]
mod outcome_test;

use coord::drag::DropOutcome;
use coord::mutation::{MutationKind, MutationOutcome};

/// Log `outcome` and reload when the DOM can no longer be trusted.
pub fn finish(kind: MutationKind, outcome: &MutationOutcome) {
    match outcome {
        MutationOutcome::CommittedLocally => log::debug!("{kind:?}: committed"),
        MutationOutcome::RolledBack(err) => log::info!("{kind:?}: rolled back ({err})"),
        MutationOutcome::RequiresFullReload => {
            log::warn!("{kind:?}: reloading page");
            reload();
        }
    }
}

/// Same as [`finish`] for a drop gesture. Returns whether a request was
/// settled.
pub fn finish_drop(kind: MutationKind, outcome: &DropOutcome) -> bool {
    match outcome {
        DropOutcome::Unchanged => {
            log::debug!("{kind:?}: dropped in place");
            false
        }
        DropOutcome::RejectedDuplicate => {
            log::info!("{kind:?}: target already holds the item");
            false
        }
        DropOutcome::Settled(outcome) => {
            finish(kind, outcome);
            true
        }
    }
}

fn reload() {
    #[cfg(feature = "hydrate")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(err) = window.location().reload() {
                log::warn!("reload failed: {err:?}");
            }
        }
    }
}
