use std::cell::RefCell;
use std::collections::BTreeMap;

use futures::executor::block_on;

use super::*;
use crate::mutation::MutationKind;
use crate::test_support::Harness;

// =============================================================
// Helpers
// =============================================================

/// Columns of item ids, in DOM order.
#[derive(Default)]
struct FakeColumns {
    columns: RefCell<BTreeMap<EntityId, Vec<EntityId>>>,
}

impl FakeColumns {
    fn with(columns: &[(i64, &[i64])]) -> Rc<Self> {
        let fake = Self::default();
        for (col, items) in columns {
            fake.columns
                .borrow_mut()
                .insert(EntityId(*col), items.iter().copied().map(EntityId).collect());
        }
        Rc::new(fake)
    }

    fn items(&self, col: i64) -> Vec<i64> {
        self.columns.borrow().get(&EntityId(col)).map(|v| v.iter().map(|id| id.get()).collect()).unwrap_or_default()
    }

    /// Simulate the sortable widget moving a node before the drop event.
    fn drag(&self, item: i64, to: Slot) {
        self.place(EntityId(item), to).unwrap();
    }

    /// Simulate a clone landing in `col` at `index`.
    fn drop_clone(&self, item: i64, col: i64, index: usize) {
        self.columns.borrow_mut().entry(EntityId(col)).or_default().insert(index, EntityId(item));
    }

    fn drop_column(&self, col: i64) {
        self.columns.borrow_mut().remove(&EntityId(col));
    }
}

impl ContainerDom for FakeColumns {
    fn locate(&self, item: EntityId) -> Option<Slot> {
        self.columns.borrow().iter().find_map(|(container, items)| {
            items.iter().position(|i| *i == item).map(|index| Slot { container: *container, index })
        })
    }

    fn occurrences(&self, item: EntityId, container: EntityId) -> usize {
        self.columns.borrow().get(&container).map_or(0, |items| items.iter().filter(|i| **i == item).count())
    }

    fn place(&self, item: EntityId, slot: Slot) -> Result<(), DomInconsistency> {
        let mut columns = self.columns.borrow_mut();
        let target = columns.get(&slot.container).ok_or_else(|| DomInconsistency::new("container missing"))?;
        let reference = insertion_reference(target, &item, slot.index).copied();
        let mut found = false;
        for items in columns.values_mut() {
            if let Some(pos) = items.iter().position(|i| *i == item) {
                items.remove(pos);
                found = true;
                break;
            }
        }
        if !found {
            return Err(DomInconsistency::new("item missing"));
        }
        let target = columns.get_mut(&slot.container).ok_or_else(|| DomInconsistency::new("container missing"))?;
        let at = reference.and_then(|r| target.iter().position(|i| *i == r)).unwrap_or(target.len());
        target.insert(at, item);
        Ok(())
    }

    fn remove_from(&self, item: EntityId, container: EntityId) -> Result<(), DomInconsistency> {
        let mut columns = self.columns.borrow_mut();
        let items = columns.get_mut(&container).ok_or_else(|| DomInconsistency::new("container missing"))?;
        let pos = items.iter().rposition(|i| *i == item).ok_or_else(|| DomInconsistency::new("item missing"))?;
        items.remove(pos);
        Ok(())
    }
}

fn slot(container: i64, index: usize) -> Slot {
    Slot { container: EntityId(container), index }
}

fn intent(item: i64, source: Slot, target: Slot) -> DragIntent {
    DragIntent { item_id: EntityId(item), source, target }
}

async fn status(code: u16) -> Confirmation {
    Ok(code)
}

struct Editor(bool);

impl EditPermission for Editor {
    fn can_edit(&self) -> bool {
        self.0
    }
}

// =============================================================
// Zone options
// =============================================================

#[test]
fn source_zone_clones_and_rejects_drops() {
    let opts = ZoneOptions::for_role(ZoneRole::Source, "boards", 200);
    assert_eq!(opts.pull, PullMode::Clone);
    assert!(!opts.put);
    assert!(!opts.sort);
    assert_eq!(opts.group, "boards");
}

#[test]
fn target_zone_moves_and_sorts() {
    let opts = ZoneOptions::for_role(ZoneRole::Target, "cards", 200);
    assert_eq!(opts.pull, PullMode::Move);
    assert!(opts.put && opts.sort);
}

#[test]
fn press_delay_applies_to_touch_only() {
    let opts = ZoneOptions::for_role(ZoneRole::Target, "cards", 200);
    assert_eq!(opts.delay_ms, 200);
    assert!(opts.delay_on_touch_only);
}

#[test]
fn native_drag_suppressed_without_edit_permission() {
    assert!(suppress_native_drag(&Editor(false), true));
    assert!(!suppress_native_drag(&Editor(true), true));
    assert!(!suppress_native_drag(&Editor(false), false));
}

// =============================================================
// Relocation
// =============================================================

#[test]
fn confirmed_move_keeps_new_position() {
    let h = Harness::new();
    let dom = FakeColumns::with(&[(1, &[10, 11, 12]), (2, &[20])]);
    let adapter = h.coord.drag_adapter(dom.clone());
    dom.drag(11, slot(2, 1));

    let outcome = block_on(adapter.on_relocate(MutationKind::CardMove, intent(11, slot(1, 1), slot(2, 1)), status(200)));
    assert_eq!(outcome, DropOutcome::Settled(MutationOutcome::CommittedLocally));
    assert_eq!(dom.items(1), vec![10, 12]);
    assert_eq!(dom.items(2), vec![20, 11]);
}

#[test]
fn rejected_move_restores_exact_origin() {
    let h = Harness::new();
    let dom = FakeColumns::with(&[(1, &[10, 11, 12]), (2, &[20, 21])]);
    let adapter = h.coord.drag_adapter(dom.clone());
    dom.drag(11, slot(2, 0));

    let outcome = block_on(adapter.on_relocate(MutationKind::CardMove, intent(11, slot(1, 1), slot(2, 0)), status(409)));
    assert!(matches!(outcome, DropOutcome::Settled(MutationOutcome::RolledBack(_))));
    assert_eq!(dom.items(1), vec![10, 11, 12]);
    assert_eq!(dom.items(2), vec![20, 21]);
}

#[test]
fn insertion_reference_moving_down_within_a_container() {
    let items = [1, 2, 3, 4];
    assert_eq!(insertion_reference(&items, &1, 2), Some(&4));
    assert_eq!(insertion_reference(&items, &2, 1), Some(&3));
}

#[test]
fn insertion_reference_moving_up_within_a_container() {
    let items = [1, 2, 3, 4];
    assert_eq!(insertion_reference(&items, &4, 1), Some(&2));
    assert_eq!(insertion_reference(&items, &3, 0), Some(&1));
}

#[test]
fn insertion_reference_past_the_end_appends() {
    let items = [1, 2, 3];
    assert_eq!(insertion_reference(&items, &1, 2), None);
    assert_eq!(insertion_reference(&items, &9, 3), None);
    assert_eq!(insertion_reference::<i32>(&[], &9, 0), None);
}

#[test]
fn insertion_reference_from_another_container() {
    let items = [20, 21];
    assert_eq!(insertion_reference(&items, &11, 0), Some(&20));
    assert_eq!(insertion_reference(&items, &11, 1), Some(&21));
}

#[test]
fn rejected_move_within_a_column_restores_order() {
    let h = Harness::new();
    let dom = FakeColumns::with(&[(1, &[10, 11, 12, 13])]);
    let adapter = h.coord.drag_adapter(dom.clone());
    dom.drag(10, slot(1, 2));
    assert_eq!(dom.items(1), vec![11, 12, 10, 13]);

    let outcome = block_on(adapter.on_relocate(MutationKind::CardMove, intent(10, slot(1, 0), slot(1, 2)), status(500)));
    assert!(matches!(outcome, DropOutcome::Settled(MutationOutcome::RolledBack(_))));
    assert_eq!(dom.items(1), vec![10, 11, 12, 13]);

    dom.drag(13, slot(1, 1));
    assert_eq!(dom.items(1), vec![10, 13, 11, 12]);
    block_on(adapter.on_relocate(MutationKind::CardMove, intent(13, slot(1, 3), slot(1, 1)), status(500)));
    assert_eq!(dom.items(1), vec![10, 11, 12, 13]);
}

#[test]
fn rollback_into_vanished_column_requires_reload() {
    let h = Harness::new();
    let dom = FakeColumns::with(&[(1, &[10]), (2, &[])]);
    let adapter = h.coord.drag_adapter(dom.clone());
    dom.drag(10, slot(2, 0));
    let request = {
        let dom = dom.clone();
        async move {
            dom.drop_column(1);
            Ok(500)
        }
    };

    let outcome = block_on(adapter.on_relocate(MutationKind::CardMove, intent(10, slot(1, 0), slot(2, 0)), request));
    assert_eq!(outcome, DropOutcome::Settled(MutationOutcome::RequiresFullReload));
}

#[test]
fn drop_in_place_sends_nothing() {
    let h = Harness::new();
    let dom = FakeColumns::with(&[(1, &[10, 11])]);
    let adapter = h.coord.drag_adapter(dom);
    let outcome = block_on(adapter.on_relocate(MutationKind::CardMove, intent(10, slot(1, 0), slot(1, 0)), status(200)));
    assert_eq!(outcome, DropOutcome::Unchanged);
    assert!(h.coord.gate().can_open());
}

#[test]
fn relocation_blocks_overlay_while_in_flight() {
    let h = Harness::new();
    let dom = FakeColumns::with(&[(1, &[10]), (2, &[])]);
    let adapter = h.coord.drag_adapter(dom.clone());
    dom.drag(10, slot(2, 0));
    block_on(adapter.on_relocate(MutationKind::CardMove, intent(10, slot(1, 0), slot(2, 0)), status(200)));
    assert_eq!(h.coord.gate().active_reasons(), vec!["move-card".to_owned()]);
}

#[test]
fn intent_accessors() {
    let i = intent(7, slot(1, 2), slot(3, 4));
    assert_eq!(i.source_container_id(), EntityId(1));
    assert_eq!(i.target_container_id(), EntityId(3));
    assert_eq!(i.target_index(), 4);
    assert!(!i.is_noop());
}

// =============================================================
// Clone drops
// =============================================================

#[test]
fn clone_into_group_commits_with_reload() {
    let h = Harness::new();
    let dom = FakeColumns::with(&[(5, &[50])]);
    let adapter = h.coord.drag_adapter(dom.clone());
    dom.drop_clone(60, 5, 1);

    let outcome = block_on(adapter.on_clone_drop(MutationKind::GroupAdd, EntityId(60), EntityId(5), status(200)));
    assert_eq!(outcome, DropOutcome::Settled(MutationOutcome::RequiresFullReload));
}

#[test]
fn rejected_clone_is_removed() {
    let h = Harness::new();
    let dom = FakeColumns::with(&[(5, &[50])]);
    let adapter = h.coord.drag_adapter(dom.clone());
    dom.drop_clone(60, 5, 0);

    let outcome = block_on(adapter.on_clone_drop(MutationKind::GroupAdd, EntityId(60), EntityId(5), status(400)));
    assert!(matches!(outcome, DropOutcome::Settled(MutationOutcome::RolledBack(_))));
    assert_eq!(dom.items(5), vec![50]);
}

#[test]
fn duplicate_clone_is_discarded_without_request() {
    let h = Harness::new();
    let dom = FakeColumns::with(&[(5, &[50, 60])]);
    let adapter = h.coord.drag_adapter(dom.clone());
    dom.drop_clone(60, 5, 2);

    let outcome = block_on(adapter.on_clone_drop(MutationKind::GroupAdd, EntityId(60), EntityId(5), status(200)));
    assert_eq!(outcome, DropOutcome::RejectedDuplicate);
    assert_eq!(dom.items(5), vec![50, 60]);
    assert!(h.coord.gate().can_open());
}
