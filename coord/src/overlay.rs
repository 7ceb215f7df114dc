//! Card overlay lifecycle.
//!
//! SYSTEM CONTEXT
//! ==============
//! The overlay's body is filled by the fragment-swap collaborator: opening a
//! card only records the id, updates the URL, and asks for a swap. The
//! transition to `Open` happens when the swap-completed notification for the
//! overlay body arrives, and at that moment the controller re-reads the gate
//! and its own live state. A swap that lands after a block was installed, or
//! after the user closed the overlay, is discarded instead of opening it.
//!
//! Every transition runs to completion synchronously; nothing here awaits.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::config::CoordConfig;
use crate::entity::EntityId;
use crate::gate::Gate;
use crate::history::{HistoryMode, HistorySync, PopAction, StartupAction};

/// Open/closed flag plus the entity the overlay shows.
///
/// `current_entity_id` is always set while `is_open` is true; closing clears
/// both.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverlayState {
    is_open: bool,
    current_entity_id: Option<EntityId>,
}

impl OverlayState {
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    #[must_use]
    pub fn current_entity_id(&self) -> Option<EntityId> {
        self.current_entity_id
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapMethod {
    Get,
    Post,
}

impl SwapMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A request handed to the fragment-swap collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapRequest {
    pub method: SwapMethod,
    /// Element id of the region to replace.
    pub target: String,
    pub url: String,
}

/// DOM side of the overlay.
pub trait OverlayHost {
    /// Make the overlay container visible.
    fn show(&self);
    /// Hide the overlay container.
    fn hide(&self);
    /// Empty the overlay body.
    fn clear_content(&self);
    /// Ask the swap collaborator to fetch `request.url` into `request.target`.
    fn request_swap(&self, request: &SwapRequest);
    /// Initialize widgets inside `region`; must be idempotent per element.
    fn init_widgets(&self, region: &str);
}

/// Result of asking to open a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    /// URL updated and a swap was requested.
    Requested,
    /// The gate is blocking; nothing happened.
    Denied,
}

/// How the controller reacted to a swap-completed notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapReaction {
    /// `Closed -> Open`.
    Opened,
    /// Already open; widgets re-bound on the new content.
    Refreshed,
    /// The gate blocked the transition and the overlay was forced closed.
    Suppressed,
    /// No card is pending (closed while the swap was in flight).
    Discarded,
    /// An owned region other than the overlay body; widgets re-bound.
    Rebound,
    /// A region the core does not own.
    Ignored,
}

pub struct OverlayController {
    gate: Rc<Gate>,
    history: Rc<HistorySync>,
    host: Rc<dyn OverlayHost>,
    config: Rc<CoordConfig>,
    state: Cell<OverlayState>,
}

impl OverlayController {
    pub fn new(gate: Rc<Gate>, history: Rc<HistorySync>, host: Rc<dyn OverlayHost>, config: Rc<CoordConfig>) -> Self {
        Self { gate, history, host, config, state: Cell::new(OverlayState::default()) }
    }

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state.get()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.get().is_open
    }

    /// Open card `id`: record it, write the URL, and request its detail swap.
    pub fn open_card(&self, id: EntityId, mode: HistoryMode) -> OpenOutcome {
        if !self.gate.can_open() {
            log::debug!("overlay: open {id} denied by gate {:?}", self.gate.active_reasons());
            return OpenOutcome::Denied;
        }
        self.history.set(id, mode);
        self.request_detail(id);
        OpenOutcome::Requested
    }

    /// Record `id` as pending and ask for its detail fragment.
    fn request_detail(&self, id: EntityId) {
        self.state.set(OverlayState { current_entity_id: Some(id), ..self.state.get() });
        self.host.request_swap(&SwapRequest {
            method: SwapMethod::Get,
            target: self.config.overlay_region.clone(),
            url: self.config.card_detail_url(id),
        });
    }

    /// React to the swap collaborator finishing a replacement of `region`.
    pub fn on_content_swapped(&self, region: &str) -> SwapReaction {
        if region != self.config.overlay_region {
            if self.config.owns_region(region) {
                self.host.init_widgets(region);
                return SwapReaction::Rebound;
            }
            return SwapReaction::Ignored;
        }

        if self.gate.is_blocked() {
            log::info!("overlay: swap suppressed by gate {:?}", self.gate.active_reasons());
            self.force_close();
            return SwapReaction::Suppressed;
        }

        let state = self.state.get();
        if state.current_entity_id.is_none() {
            log::debug!("overlay: swap discarded, no card pending");
            self.force_close();
            return SwapReaction::Discarded;
        }

        self.host.init_widgets(region);
        if state.is_open {
            return SwapReaction::Refreshed;
        }
        self.state.set(OverlayState { is_open: true, ..state });
        self.host.show();
        log::debug!("overlay: opened {:?}", state.current_entity_id);
        SwapReaction::Opened
    }

    /// `Open -> Closed` without touching the URL.
    pub fn close(&self) {
        let was = self.state.replace(OverlayState::default());
        self.host.hide();
        self.host.clear_content();
        if was.is_open {
            log::debug!("overlay: closed {:?}", was.current_entity_id);
        }
    }

    /// User-initiated close: also drop the id from the URL as a new entry.
    pub fn dismiss(&self) {
        self.close();
        self.history.clear(HistoryMode::Push);
    }

    /// Close and remove any stale id from the URL without a new entry.
    pub fn force_close(&self) {
        self.close();
        self.history.clear(HistoryMode::Replace);
    }

    /// Settle overlay and URL after a mutation finished either way: close the
    /// overlay if it is open or a card is pending, and drop the id from the URL.
    pub fn close_after_mutation(&self) {
        let state = self.state.get();
        if state.is_open || state.current_entity_id.is_some() {
            self.close();
        }
        self.history.clear(HistoryMode::Replace);
    }

    /// Handle the id present at page load.
    pub fn startup(&self) -> StartupAction {
        let action = self.history.on_startup(&self.gate);
        if let StartupAction::Open(id) = action {
            self.open_card(id, HistoryMode::Replace);
        }
        action
    }

    /// Handle a back/forward navigation. The URL already names the target,
    /// so a retarget fetches the detail without writing history.
    pub fn on_pop_state(&self) -> PopAction {
        let action = self.history.on_pop_state(&self.gate, self.is_open());
        match action {
            PopAction::Retarget(id) => self.request_detail(id),
            PopAction::Close => self.close(),
            PopAction::Ignore => {}
        }
        action
    }

    /// Return to the startup state without touching the DOM.
    pub fn reset(&self) {
        self.state.set(OverlayState::default());
    }
}
