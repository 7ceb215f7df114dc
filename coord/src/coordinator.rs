//! Process-wide coordination context.
//!
//! DESIGN
//! ======
//! The gate and overlay state are the only shared mutable state. Instead of
//! module-level globals they live in one context built at startup with
//! [`Coordinator::init`] and handed to every component, and
//! [`Coordinator::reset`] returns them to their startup state.

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod coordinator_test;

use std::rc::Rc;

use crate::clock::Clock;
use crate::config::CoordConfig;
use crate::drag::{ContainerDom, DragAdapter};
use crate::gate::Gate;
use crate::history::{AddressBar, HistorySync};
use crate::mutation::MutationExecutor;
use crate::overlay::{OverlayController, OverlayHost};
use crate::search::SearchCoordinator;

pub struct Coordinator {
    config: Rc<CoordConfig>,
    gate: Rc<Gate>,
    history: Rc<HistorySync>,
    overlay: Rc<OverlayController>,
    mutations: Rc<MutationExecutor>,
    search: Rc<SearchCoordinator>,
}

impl Coordinator {
    /// Build the context from configuration and host seams.
    pub fn init(
        config: CoordConfig,
        clock: Rc<dyn Clock>,
        bar: Rc<dyn AddressBar>,
        host: Rc<dyn OverlayHost>,
    ) -> Self {
        let config = Rc::new(config);
        let gate = Rc::new(Gate::new(clock));
        let history = Rc::new(HistorySync::new(bar, config.entity_param.clone()));
        let overlay = Rc::new(OverlayController::new(
            Rc::clone(&gate),
            Rc::clone(&history),
            host,
            Rc::clone(&config),
        ));
        let mutations = Rc::new(MutationExecutor::new(
            Rc::clone(&gate),
            Rc::clone(&overlay),
            config.mutation_block_ms,
        ));
        let search = Rc::new(SearchCoordinator::from_config(&config));
        Self { config, gate, history, overlay, mutations, search }
    }

    #[must_use]
    pub fn config(&self) -> &Rc<CoordConfig> {
        &self.config
    }

    #[must_use]
    pub fn gate(&self) -> &Rc<Gate> {
        &self.gate
    }

    #[must_use]
    pub fn history(&self) -> &Rc<HistorySync> {
        &self.history
    }

    #[must_use]
    pub fn overlay(&self) -> &Rc<OverlayController> {
        &self.overlay
    }

    #[must_use]
    pub fn mutations(&self) -> &Rc<MutationExecutor> {
        &self.mutations
    }

    #[must_use]
    pub fn search(&self) -> &Rc<SearchCoordinator> {
        &self.search
    }

    /// Drag adapter bound to the given drop-zone DOM.
    #[must_use]
    pub fn drag_adapter(&self, dom: Rc<dyn ContainerDom>) -> DragAdapter {
        DragAdapter::new(Rc::clone(&self.mutations), dom)
    }

    /// Drop every block, close the overlay state, and invalidate searches.
    pub fn reset(&self) {
        self.gate.reset();
        self.overlay.reset();
        self.search.reset();
    }
}
