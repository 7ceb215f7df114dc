//! Action dock: the card overlay's contextual menu.
//!
//! The dock markup is moved out of the overlay body so content swaps do not
//! destroy it, which means its state must be tied to the overlay's lifetime
//! explicitly. [`ActionDock::sync`] creates a fresh instance when the overlay
//! opens and drops it when the overlay closes. Attaching twice to the same
//! overlay lifetime is a no-op.
//!
//! Move and duplicate go through the mutation executor like every other
//! mutation. Clicks that arrive while the gate is blocked are dropped.

#[cfg(test)]
#[path = "dock_test.rs"]
mod dock_test;

use std::cell::Cell;
use std::future::Future;
use std::rc::Rc;

use crate::config::CoordConfig;
use crate::entity::EntityId;
use crate::gate::Gate;
use crate::history::HistorySync;
use crate::mutation::{Confirmation, MutationExecutor, MutationKind, MutationOutcome, NoDomChange};
use crate::overlay::OverlayController;

/// Menu and move panel visibility. Both may be open at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DockMenuState {
    pub menu_open: bool,
    pub panel_open: bool,
}

impl DockMenuState {
    /// A click landed outside the dock's bounds.
    pub fn close_all(&mut self) {
        self.menu_open = false;
        self.panel_open = false;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DockAction {
    Move,
    Duplicate,
    CopyLink,
}

impl DockAction {
    /// Parse a button's `data-action` value.
    #[must_use]
    pub fn from_attr(raw: &str) -> Option<Self> {
        match raw.trim() {
            "move" => Some(Self::Move),
            "duplicate" => Some(Self::Duplicate),
            "copy-link" => Some(Self::CopyLink),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Duplicate => "duplicate",
            Self::CopyLink => "copy-link",
        }
    }

    /// Mutation kind for actions that hit the server.
    #[must_use]
    pub fn mutation_kind(self) -> Option<MutationKind> {
        match self {
            Self::Move => Some(MutationKind::CardMoveViaDock),
            Self::Duplicate => Some(MutationKind::CardDuplicate),
            Self::CopyLink => None,
        }
    }
}

/// Endpoint for `action` on card `id`: the button's `data-url` when present,
/// otherwise the configured template.
#[must_use]
pub fn resolve_action_url(action: DockAction, data_url: Option<&str>, id: EntityId, config: &CoordConfig) -> Option<String> {
    let kind = action.mutation_kind()?;
    if let Some(url) = data_url.map(str::trim).filter(|u| !u.is_empty()) {
        return Some(url.to_owned());
    }
    Some(match kind {
        MutationKind::CardDuplicate => config.card_duplicate_url(id),
        _ => config.card_move_url(id),
    })
}

/// Browser clipboard seam.
pub trait Clipboard {
    /// Write `text`; `false` when the clipboard API is unavailable.
    fn write_text(&self, text: &str) -> bool;
    /// Show `text` selected so the user can copy it by hand.
    fn select_for_manual_copy(&self, text: &str);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyOutcome {
    Clipboard,
    ManualSelection,
}

/// What a dock click should do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DockPlan {
    /// Send a mutation request to `url`.
    Request { kind: MutationKind, card: EntityId, url: String },
    CopyLink { card: EntityId },
    /// The gate is blocking; the click is dropped.
    Blocked,
    /// No card is open, so there is nothing to act on.
    NoCard,
}

pub struct ActionDock {
    gate: Rc<Gate>,
    history: Rc<HistorySync>,
    overlay: Rc<OverlayController>,
    executor: Rc<MutationExecutor>,
    config: Rc<CoordConfig>,
    /// `None` when no overlay is open.
    instance: Cell<Option<DockMenuState>>,
}

impl ActionDock {
    pub fn new(
        gate: Rc<Gate>,
        history: Rc<HistorySync>,
        overlay: Rc<OverlayController>,
        executor: Rc<MutationExecutor>,
        config: Rc<CoordConfig>,
    ) -> Self {
        Self { gate, history, overlay, executor, config, instance: Cell::new(None) }
    }

    /// Follow the overlay: attach on open, drop on close. Returns `true`
    /// when a new instance was attached.
    pub fn sync(&self) -> bool {
        match (self.overlay.is_open(), self.instance.get()) {
            (true, None) => {
                self.instance.set(Some(DockMenuState::default()));
                log::debug!("dock: attached");
                true
            }
            (false, Some(_)) => {
                self.instance.set(None);
                log::debug!("dock: detached");
                false
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.instance.get().is_some()
    }

    #[must_use]
    pub fn menu(&self) -> Option<DockMenuState> {
        self.instance.get()
    }

    pub fn toggle_menu(&self) {
        self.update(|m| m.menu_open = !m.menu_open);
    }

    pub fn toggle_panel(&self) {
        self.update(|m| m.panel_open = !m.panel_open);
    }

    /// A document click; `inside` is whether it hit the dock's bounds.
    pub fn on_document_click(&self, inside: bool) {
        if !inside {
            self.update(DockMenuState::close_all);
        }
    }

    fn update(&self, f: impl FnOnce(&mut DockMenuState)) {
        if let Some(mut menu) = self.instance.get() {
            f(&mut menu);
            self.instance.set(Some(menu));
        }
    }

    /// Decide what clicking `action` does right now.
    #[must_use]
    pub fn plan(&self, action: DockAction, data_url: Option<&str>) -> DockPlan {
        let Some(card) = self.overlay.state().current_entity_id() else {
            return DockPlan::NoCard;
        };
        let (Some(kind), Some(url)) = (action.mutation_kind(), resolve_action_url(action, data_url, card, &self.config))
        else {
            return DockPlan::CopyLink { card };
        };
        if self.gate.is_blocked() {
            log::info!("dock: {} dropped, gate {:?}", action.as_str(), self.gate.active_reasons());
            return DockPlan::Blocked;
        }
        DockPlan::Request { kind, card, url }
    }

    /// Run a planned request through the executor, then follow the overlay.
    pub async fn run<F>(&self, kind: MutationKind, request: F) -> MutationOutcome
    where
        F: Future<Output = Confirmation>,
    {
        self.update(DockMenuState::close_all);
        let outcome = self.executor.run(kind, NoDomChange, request).await;
        self.sync();
        outcome
    }

    /// Copy an absolute link to `card`, falling back to manual selection.
    pub fn copy_link(&self, card: EntityId, clipboard: &dyn Clipboard) -> Option<CopyOutcome> {
        let link = self.history.link_for(card)?;
        self.update(DockMenuState::close_all);
        if clipboard.write_text(&link) {
            return Some(CopyOutcome::Clipboard);
        }
        clipboard.select_for_manual_copy(&link);
        Some(CopyOutcome::ManualSelection)
    }
}
