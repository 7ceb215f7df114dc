//! Drag-and-drop session adapter.
//!
//! Zones come in two roles. **Source** zones (the board sidebar, for example)
//! let items be dragged out as clones and never accept drops. **Target** zones
//! (columns, board groups) accept drops, keep sort order, and turn every drop
//! into an optimistic mutation. The sortable widget has already moved the DOM
//! node when the drop event fires, so "apply" only verifies the placement and
//! "revert" puts the node back at its exact pre-drop container and index.
//!
//! Editing permission is checked on every native drag start rather than once
//! at load, because a swap can change the viewer's permissions at any time.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::future::Future;
use std::rc::Rc;

use crate::entity::EntityId;
use crate::error::DomInconsistency;
use crate::mutation::{Confirmation, DomMutation, MutationExecutor, MutationKind, MutationOutcome};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoneRole {
    Source,
    Target,
}

/// What happens to an item dragged out of a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullMode {
    Clone,
    Move,
}

/// Options handed to the sortable widget for one zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneOptions {
    pub group: String,
    pub pull: PullMode,
    pub put: bool,
    pub sort: bool,
    pub delay_ms: u32,
    pub delay_on_touch_only: bool,
}

impl ZoneOptions {
    #[must_use]
    pub fn for_role(role: ZoneRole, group: &str, touch_delay_ms: u32) -> Self {
        let (pull, put, sort) = match role {
            ZoneRole::Source => (PullMode::Clone, false, false),
            ZoneRole::Target => (PullMode::Move, true, true),
        };
        Self {
            group: group.to_owned(),
            pull,
            put,
            sort,
            delay_ms: touch_delay_ms,
            delay_on_touch_only: true,
        }
    }
}

/// Answers "may the current viewer edit?" at the moment it is asked.
pub trait EditPermission {
    fn can_edit(&self) -> bool;
}

/// Whether a native `dragstart` on a draggable item must be cancelled.
#[must_use]
pub fn suppress_native_drag(permission: &dyn EditPermission, target_is_draggable: bool) -> bool {
    target_is_draggable && !permission.can_edit()
}

/// Where an item sits: container id and index among its siblings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub container: EntityId,
    pub index: usize,
}

/// The sibling `moved` must be inserted before to end up at `index` among
/// `items`; `None` means append. `items` is the container's current order and
/// may still hold `moved` when the move stays inside one container.
#[must_use]
pub fn insertion_reference<'a, T: PartialEq>(items: &'a [T], moved: &T, index: usize) -> Option<&'a T> {
    items.iter().filter(|item| *item != moved).nth(index)
}

/// A completed drop awaiting confirmation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragIntent {
    pub item_id: EntityId,
    pub source: Slot,
    pub target: Slot,
}

impl DragIntent {
    #[must_use]
    pub fn source_container_id(&self) -> EntityId {
        self.source.container
    }

    #[must_use]
    pub fn target_container_id(&self) -> EntityId {
        self.target.container
    }

    #[must_use]
    pub fn target_index(&self) -> usize {
        self.target.index
    }

    /// Dropped back where it started.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.source == self.target
    }
}

/// DOM side of the drop zones.
pub trait ContainerDom {
    /// Current slot of `item`, if it is in the DOM.
    fn locate(&self, item: EntityId) -> Option<Slot>;
    /// Number of elements for `item` inside `container`.
    fn occurrences(&self, item: EntityId, container: EntityId) -> usize;
    /// Move `item` to `slot`.
    ///
    /// # Errors
    ///
    /// Returns [`DomInconsistency`] when the item or container is missing.
    fn place(&self, item: EntityId, slot: Slot) -> Result<(), DomInconsistency>;
    /// Remove the element for `item` from `container` (the last one, when
    /// there are several).
    ///
    /// # Errors
    ///
    /// Returns [`DomInconsistency`] when no such element exists.
    fn remove_from(&self, item: EntityId, container: EntityId) -> Result<(), DomInconsistency>;
}

/// An item moved from one slot to another by the sortable widget.
pub struct DropRelocation {
    dom: Rc<dyn ContainerDom>,
    intent: DragIntent,
}

impl DropRelocation {
    pub fn new(dom: Rc<dyn ContainerDom>, intent: DragIntent) -> Self {
        Self { dom, intent }
    }
}

impl DomMutation for DropRelocation {
    fn apply(&mut self) -> Result<(), DomInconsistency> {
        if self.dom.locate(self.intent.item_id) == Some(self.intent.target) {
            return Ok(());
        }
        self.dom.place(self.intent.item_id, self.intent.target)
    }

    fn revert(&mut self) -> Result<(), DomInconsistency> {
        self.dom.place(self.intent.item_id, self.intent.source)
    }
}

/// A clone dropped from a source zone into a target container.
pub struct CloneInsertion {
    dom: Rc<dyn ContainerDom>,
    item: EntityId,
    container: EntityId,
}

impl CloneInsertion {
    pub fn new(dom: Rc<dyn ContainerDom>, item: EntityId, container: EntityId) -> Self {
        Self { dom, item, container }
    }
}

impl DomMutation for CloneInsertion {
    fn apply(&mut self) -> Result<(), DomInconsistency> {
        if self.dom.occurrences(self.item, self.container) == 0 {
            return Err(DomInconsistency::new(format!(
                "clone of {} not found in {}",
                self.item, self.container
            )));
        }
        Ok(())
    }

    fn revert(&mut self) -> Result<(), DomInconsistency> {
        self.dom.remove_from(self.item, self.container)
    }
}

/// How a drop gesture ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    /// Dropped where it started; nothing sent.
    Unchanged,
    /// The target already held the item; the clone was removed, nothing sent.
    RejectedDuplicate,
    Settled(MutationOutcome),
}

/// Turns drop events into optimistic mutations.
pub struct DragAdapter {
    executor: Rc<MutationExecutor>,
    dom: Rc<dyn ContainerDom>,
}

impl DragAdapter {
    pub fn new(executor: Rc<MutationExecutor>, dom: Rc<dyn ContainerDom>) -> Self {
        Self { executor, dom }
    }

    /// An item was moved between (or within) target zones.
    pub async fn on_relocate<F>(&self, kind: MutationKind, intent: DragIntent, request: F) -> DropOutcome
    where
        F: Future<Output = Confirmation>,
    {
        if intent.is_noop() {
            return DropOutcome::Unchanged;
        }
        let mutation = DropRelocation::new(Rc::clone(&self.dom), intent);
        DropOutcome::Settled(self.executor.run(kind, mutation, request).await)
    }

    /// A clone was dropped from a source zone into `container`.
    pub async fn on_clone_drop<F>(&self, kind: MutationKind, item: EntityId, container: EntityId, request: F) -> DropOutcome
    where
        F: Future<Output = Confirmation>,
    {
        if self.dom.occurrences(item, container) > 1 {
            if let Err(err) = self.dom.remove_from(item, container) {
                log::warn!("drag: duplicate clone cleanup failed: {err}");
                return DropOutcome::Settled(MutationOutcome::RequiresFullReload);
            }
            return DropOutcome::RejectedDuplicate;
        }
        let mutation = CloneInsertion::new(Rc::clone(&self.dom), item, container);
        DropOutcome::Settled(self.executor.run(kind, mutation, request).await)
    }
}
