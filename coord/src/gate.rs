//! Request gate: named, self-expiring blocks on opening the overlay.
//!
//! A mutating action installs a short block so that a content swap the server
//! triggers mid-navigation cannot re-open the overlay underneath it. Each
//! block is keyed by a reason; reasons expire independently and removing one
//! never affects another. Expired entries are purged lazily on every query.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::clock::Clock;

/// Registry of active block reasons and their absolute expiry times.
pub struct Gate {
    clock: Rc<dyn Clock>,
    blocks: RefCell<HashMap<String, f64>>,
}

impl Gate {
    #[must_use]
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self { clock, blocks: RefCell::new(HashMap::new()) }
    }

    /// Block opening for `duration_ms` under `reason`, replacing any earlier
    /// expiry for the same reason. Non-positive durations are ignored.
    pub fn block(&self, duration_ms: f64, reason: &str) {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return;
        }
        let expires_at = self.clock.now_ms() + duration_ms;
        log::debug!("gate: block {reason} for {duration_ms}ms");
        self.blocks.borrow_mut().insert(reason.to_owned(), expires_at);
    }

    /// Remove the block for `reason`, if any.
    pub fn unblock(&self, reason: &str) {
        if self.blocks.borrow_mut().remove(reason).is_some() {
            log::debug!("gate: unblock {reason}");
        }
    }

    /// Whether any reason is still in effect.
    pub fn is_blocked(&self) -> bool {
        self.purge_expired();
        !self.blocks.borrow().is_empty()
    }

    pub fn can_open(&self) -> bool {
        !self.is_blocked()
    }

    /// Active reasons, sorted, for diagnostics.
    pub fn active_reasons(&self) -> Vec<String> {
        self.purge_expired();
        let mut reasons: Vec<String> = self.blocks.borrow().keys().cloned().collect();
        reasons.sort();
        reasons
    }

    /// Drop every block.
    pub fn reset(&self) {
        self.blocks.borrow_mut().clear();
    }

    fn purge_expired(&self) {
        let now = self.clock.now_ms();
        self.blocks.borrow_mut().retain(|_, expires_at| *expires_at > now);
    }
}
