//! Drop-zone DOM: columns of cards and board groups.
//!
//! Items are element children of their container carrying `data-item-id`.
//! Indexes count only those children, so headers and placeholders inside a
//! container do not shift positions. Each instance only sees zones of one
//! drop kind.

use coord::EntityId;
use coord::drag::{ContainerDom, Slot, insertion_reference};
use coord::error::DomInconsistency;
use coord::mutation::DomMutation;
use web_sys::{Element, Node};

use crate::util::dom;
use crate::util::sortable::DropTarget;

pub struct DomContainers {
    target: DropTarget,
}

impl DomContainers {
    pub fn new(target: DropTarget) -> Self {
        Self { target }
    }

    fn container(&self, id: EntityId) -> Result<Element, DomInconsistency> {
        dom::query(&dom::container_selector(self.target, id))
            .ok_or_else(|| DomInconsistency::new(format!("{:?} container {id} missing", self.target)))
    }

    fn item(&self, id: EntityId) -> Option<Element> {
        dom::query(&dom::placed_item_selector(self.target, id))
    }

    fn items_in(container: &Element) -> Vec<Element> {
        dom::children_with(container, dom::ITEM_ATTR)
    }
}

impl ContainerDom for DomContainers {
    fn locate(&self, item: EntityId) -> Option<Slot> {
        let el = self.item(item)?;
        let parent = el.parent_element()?;
        let container = dom::id_attr(&parent, dom::CONTAINER_ATTR)?;
        let index = Self::items_in(&parent).iter().position(|sibling| sibling == &el)?;
        Some(Slot { container, index })
    }

    fn occurrences(&self, item: EntityId, container: EntityId) -> usize {
        let Ok(parent) = self.container(container) else {
            return 0;
        };
        Self::items_in(&parent).iter().filter(|el| dom::id_attr(el, dom::ITEM_ATTR) == Some(item)).count()
    }

    fn place(&self, item: EntityId, slot: Slot) -> Result<(), DomInconsistency> {
        let el = self.item(item).ok_or_else(|| DomInconsistency::new(format!("item {item} missing")))?;
        let parent = self.container(slot.container)?;
        let items = Self::items_in(&parent);
        let reference: Option<&Node> = insertion_reference(&items, &el, slot.index).map(AsRef::as_ref);
        parent
            .insert_before(&el, reference)
            .map(|_| ())
            .map_err(|err| DomInconsistency::new(format!("insert {item} failed: {err:?}")))
    }

    fn remove_from(&self, item: EntityId, container: EntityId) -> Result<(), DomInconsistency> {
        let parent = self.container(container)?;
        let last = Self::items_in(&parent)
            .into_iter()
            .rev()
            .find(|el| dom::id_attr(el, dom::ITEM_ATTR) == Some(item))
            .ok_or_else(|| DomInconsistency::new(format!("item {item} not in {container}")))?;
        last.remove();
        Ok(())
    }
}

/// Optimistic removal of one element; revert puts it back before its old
/// next sibling.
pub struct ElementRemoval {
    el: Element,
    parent: Option<Node>,
    next: Option<Node>,
}

impl ElementRemoval {
    pub fn new(el: Element) -> Self {
        Self { el, parent: None, next: None }
    }
}

impl DomMutation for ElementRemoval {
    fn apply(&mut self) -> Result<(), DomInconsistency> {
        self.parent = self.el.parent_node();
        if self.parent.is_none() {
            return Err(DomInconsistency::new("element already detached"));
        }
        self.next = self.el.next_sibling();
        self.el.remove();
        Ok(())
    }

    fn revert(&mut self) -> Result<(), DomInconsistency> {
        let parent = self.parent.as_ref().ok_or_else(|| DomInconsistency::new("no parent recorded"))?;
        let next = self.next.as_ref().filter(|n| n.parent_node().as_ref() == Some(parent));
        parent
            .insert_before(&self.el, next)
            .map(|_| ())
            .map_err(|err| DomInconsistency::new(format!("restore failed: {err:?}")))
    }
}
