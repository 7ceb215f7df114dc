//! Page runtime: routes DOM events into the coordination core.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `Runtime` lives for the life of the page. Document listeners installed
//! at boot call into it, the overlay host asks it to bind client-driven
//! widgets, and every async gesture holds an `Rc` to it until it settles.
//! Each settled mutation ends in `outcome::finish`, which owns reloads.

use std::rc::{Rc, Weak};

use coord::binding::Widget;
use coord::dock::{ActionDock, DockAction, DockPlan};
use coord::drag::{DragAdapter, DragIntent, Slot, ZoneOptions};
use coord::favorites::{Favorites, FavoritesState};
use coord::history::HistoryMode;
use coord::mutation::{MutationKind, MutationOutcome};
use coord::overlay::OpenOutcome;
use coord::payload::{CardMoveBody, GroupMembershipBody};
use coord::{Coordinator, EntityId};
use leptos::task::spawn_local;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlInputElement, HtmlSelectElement};

use crate::net::api;
use crate::util::browser::BrowserClipboard;
use crate::util::containers::{DomContainers, ElementRemoval};
use crate::util::favorites_dom::DomFavoritesView;
use crate::util::overlay_host::{DomOverlayHost, WidgetBinder};
use crate::util::sortable::{self, DropTarget, SortEnd};
use crate::util::{csrf, dom, js, outcome};

/// Sortable group used when a zone does not name one.
const DEFAULT_SORT_GROUP: &str = "cards";
const DOCK_MENU_OPEN_CLASS: &str = "dock--menu-open";
const DOCK_PANEL_OPEN_CLASS: &str = "dock--panel-open";
const MOVE_COLUMN_SELECTOR: &str = "select[name=\"column_id\"]";
const MOVE_POSITION_SELECTOR: &str = "input[name=\"position\"]";

pub struct Runtime {
    this: Weak<Runtime>,
    coord: Coordinator,
    card_drag: DragAdapter,
    group_drag: DragAdapter,
    dock: ActionDock,
    favorites: Favorites,
}

impl Runtime {
    /// Build the runtime and register it as `host`'s widget binder.
    pub fn new(coord: Coordinator, host: &DomOverlayHost) -> Rc<Self> {
        let runtime = Rc::new_cyclic(|this| {
            let card_drag = coord.drag_adapter(Rc::new(DomContainers::new(DropTarget::Column)));
            let group_drag = coord.drag_adapter(Rc::new(DomContainers::new(DropTarget::Group)));
            let dock = ActionDock::new(
                Rc::clone(coord.gate()),
                Rc::clone(coord.history()),
                Rc::clone(coord.overlay()),
                Rc::clone(coord.mutations()),
                Rc::clone(coord.config()),
            );
            let favorites = Favorites::new(
                Rc::new(FavoritesState::new(DomFavoritesView::listed_ids())),
                Rc::new(DomFavoritesView::new(coord.config().board_url.clone())),
                Rc::clone(coord.mutations()),
            );
            Self { this: this.clone(), coord, card_drag, group_drag, dock, favorites }
        });
        let weak: Weak<Self> = Rc::downgrade(&runtime);
        let binder: Weak<dyn WidgetBinder> = weak;
        host.set_binder(binder);
        runtime
    }

    pub fn coord(&self) -> &Coordinator {
        &self.coord
    }

    fn drag(&self, target: DropTarget) -> &DragAdapter {
        match target {
            DropTarget::Column => &self.card_drag,
            DropTarget::Group => &self.group_drag,
        }
    }

    /// Open the card deep-linked at page load, if any.
    pub fn startup(&self) {
        let action = self.coord.overlay().startup();
        log::debug!("startup: {action:?}");
    }

    /// The swap library finished replacing `region`.
    pub fn on_swap(&self, region: &str) {
        let reaction = self.coord.overlay().on_content_swapped(region);
        log::debug!("swap #{region}: {reaction:?}");
        self.follow_overlay();
    }

    pub fn on_pop_state(&self) {
        let action = self.coord.overlay().on_pop_state();
        log::debug!("popstate: {action:?}");
        self.follow_overlay();
    }

    /// Returns whether a detail swap was requested.
    pub fn open_card(&self, id: EntityId) -> bool {
        matches!(self.coord.overlay().open_card(id, HistoryMode::Push), OpenOutcome::Requested)
    }

    pub fn dismiss(&self) {
        self.coord.overlay().dismiss();
        self.follow_overlay();
    }

    pub fn on_escape(&self) {
        if self.coord.overlay().is_open() {
            self.dismiss();
        }
    }

    /// A click anywhere; `inside_dock` is whether it landed in the dock host.
    pub fn on_document_click(&self, inside_dock: bool) {
        self.dock.on_document_click(inside_dock);
        self.paint_dock();
    }

    /// Keep the dock attached exactly while the overlay is open.
    fn follow_overlay(&self) {
        self.dock.sync();
        if !self.dock.is_attached() {
            if let Some(host) = dom::by_id(dom::DOCK_HOST_ID) {
                host.set_inner_html("");
            }
        }
        self.paint_dock();
    }

    fn paint_dock(&self) {
        let menu = self.dock.menu().unwrap_or_default();
        let selector = format!("#{} [{}=\"{}\"]", dom::DOCK_HOST_ID, dom::WIDGET_ATTR, Widget::Dock.attr());
        for el in dom::query_document(&selector) {
            let classes = el.class_list();
            let painted = classes
                .toggle_with_force(DOCK_MENU_OPEN_CLASS, menu.menu_open)
                .and_then(|_| classes.toggle_with_force(DOCK_PANEL_OPEN_CLASS, menu.panel_open));
            if let Err(err) = painted {
                log::warn!("dock: class toggle failed: {err:?}");
            }
        }
    }

    pub fn toggle_favorite(self: &Rc<Self>, board: EntityId) {
        let runtime = Rc::clone(self);
        spawn_local(async move {
            let config = runtime.coord.config();
            let url = config.favorite_url(board);
            let request = api::post_favorite(&url, csrf::header(config));
            let settled = runtime.favorites.toggle(board, request).await;
            outcome::finish(MutationKind::FavoriteToggle, &settled);
            runtime.follow_overlay();
        });
    }

    /// `button` sits inside a board entry of a group.
    pub fn remove_from_group(self: &Rc<Self>, button: &Element) {
        let item = button.closest(&format!("[{}]", dom::ITEM_ATTR)).ok().flatten();
        let Some(item) = item else {
            log::warn!("group: remove button outside a board entry");
            return;
        };
        let group = item.closest(&format!("[{}]", dom::CONTAINER_ATTR)).ok().flatten();
        let (Some(board), Some(group)) =
            (dom::id_attr(&item, dom::ITEM_ATTR), group.and_then(|g| dom::id_attr(&g, dom::CONTAINER_ATTR)))
        else {
            log::warn!("group: remove without board or group id");
            return;
        };
        let runtime = Rc::clone(self);
        spawn_local(async move {
            let config = runtime.coord.config();
            let url = config.group_remove_url(group);
            let body = GroupMembershipBody { board_id: board };
            let request = api::post_mutation(&url, Some(&body), csrf::header(config));
            let kind = MutationKind::GroupRemove;
            let settled = runtime.coord.mutations().run(kind, ElementRemoval::new(item), request).await;
            outcome::finish(kind, &settled);
            runtime.follow_overlay();
        });
    }

    fn on_sort_end(self: &Rc<Self>, event: &JsValue) {
        let Some(end) = SortEnd::from_event(event) else {
            log::warn!("drag: unreadable drop event");
            return;
        };
        let (Some(item), Some(to)) = (dom::id_attr(&end.item, dom::ITEM_ATTR), dom::id_attr(&end.to, dom::CONTAINER_ATTR))
        else {
            log::warn!("drag: drop without item or container id");
            return;
        };
        let target = DropTarget::from_attr(end.to.get_attribute(dom::DROP_KIND_ATTR).as_deref());
        let kind = target.mutation_kind();
        let runtime = Rc::clone(self);
        match (target, end.cloned) {
            (DropTarget::Group, true) => spawn_local(async move {
                let config = runtime.coord.config();
                let url = config.group_add_url(to);
                let body = GroupMembershipBody { board_id: item };
                let request = api::post_mutation(&url, Some(&body), csrf::header(config));
                let dropped = runtime.drag(target).on_clone_drop(kind, item, to, request).await;
                if outcome::finish_drop(kind, &dropped) {
                    runtime.follow_overlay();
                }
            }),
            (DropTarget::Column, false) => {
                let Some(from) = dom::id_attr(&end.from, dom::CONTAINER_ATTR) else {
                    log::warn!("drag: drop from a zone without container id");
                    return;
                };
                let intent = DragIntent {
                    item_id: item,
                    source: Slot { container: from, index: end.old_index },
                    target: Slot { container: to, index: end.new_index },
                };
                spawn_local(async move {
                    let config = runtime.coord.config();
                    let url = config.card_move_url(item);
                    let body = CardMoveBody { card_id: item, column_id: to, position: intent.target_index() };
                    let request = api::post_mutation(&url, Some(&body), csrf::header(config));
                    let dropped = runtime.drag(target).on_relocate(kind, intent, request).await;
                    if outcome::finish_drop(kind, &dropped) {
                        runtime.follow_overlay();
                    }
                });
            }
            (target, cloned) => {
                log::warn!("drag: unsupported drop into {target:?} (cloned: {cloned})");
                outcome::finish(kind, &MutationOutcome::RequiresFullReload);
            }
        }
    }

    fn on_dock_click(self: &Rc<Self>, ev: &web_sys::MouseEvent) {
        let target = ev.target();
        if dom::closest(target.clone(), &format!("[{}]", dom::DOCK_MENU_TOGGLE_ATTR)).is_some() {
            self.dock.toggle_menu();
            self.paint_dock();
            return;
        }
        if dom::closest(target.clone(), &format!("[{}]", dom::DOCK_PANEL_TOGGLE_ATTR)).is_some() {
            self.dock.toggle_panel();
            self.paint_dock();
            return;
        }
        let Some(button) = dom::closest(target, &format!("[{}]", dom::DOCK_ACTION_ATTR)) else {
            return;
        };
        let Some(action) = button.get_attribute(dom::DOCK_ACTION_ATTR).as_deref().and_then(DockAction::from_attr) else {
            log::warn!("dock: unknown action button");
            return;
        };
        ev.prevent_default();
        match self.dock.plan(action, button.get_attribute(dom::DOCK_URL_ATTR).as_deref()) {
            DockPlan::Request { kind, card, url } => self.run_dock_request(action, kind, card, url, &button),
            DockPlan::CopyLink { card } => {
                let copied = self.dock.copy_link(card, &BrowserClipboard);
                log::debug!("dock: link for card {card}: {copied:?}");
                self.paint_dock();
            }
            DockPlan::Blocked => {}
            DockPlan::NoCard => log::debug!("dock: {} with no open card", action.as_str()),
        }
    }

    fn run_dock_request(self: &Rc<Self>, action: DockAction, kind: MutationKind, card: EntityId, url: String, button: &Element) {
        let body = match action {
            DockAction::Move => {
                let Some(body) = move_form(button, card) else {
                    log::warn!("dock: move panel has no usable column");
                    return;
                };
                Some(body)
            }
            DockAction::Duplicate | DockAction::CopyLink => None,
        };
        let runtime = Rc::clone(self);
        spawn_local(async move {
            let request = api::post_mutation(&url, body.as_ref(), csrf::header(runtime.coord.config()));
            let settled = runtime.dock.run(kind, request).await;
            outcome::finish(kind, &settled);
            runtime.follow_overlay();
        });
    }

    fn bind_sortable(&self, el: &Element) {
        let Some(role) = sortable::zone_role(el.get_attribute(dom::ZONE_ATTR).as_deref()) else {
            log::warn!("drag: sortable without a valid {}", dom::ZONE_ATTR);
            return;
        };
        let group = el.get_attribute(dom::GROUP_ATTR).unwrap_or_else(|| DEFAULT_SORT_GROUP.to_owned());
        let options = ZoneOptions::for_role(role, &group, self.coord.config().touch_drag_delay_ms);
        let this = self.this.clone();
        let on_end = Closure::wrap(Box::new(move |event: JsValue| {
            if let Some(runtime) = this.upgrade() {
                runtime.on_sort_end(&event);
            }
        }) as Box<dyn FnMut(JsValue)>);
        if js::create_sortable(el, &sortable::options(&options, &on_end)) {
            on_end.forget();
        }
    }

    /// Portal the dock into its fixed host and listen for its clicks.
    fn bind_dock(&self, el: &Element) {
        let Some(host) = dom::by_id(dom::DOCK_HOST_ID) else {
            log::warn!("dock: no #{} on page", dom::DOCK_HOST_ID);
            return;
        };
        host.set_inner_html("");
        if let Err(err) = host.append_child(el) {
            log::warn!("dock: portal failed: {err:?}");
            return;
        }
        let this = self.this.clone();
        let on_click = Closure::wrap(Box::new(move |ev: web_sys::MouseEvent| {
            if let Some(runtime) = this.upgrade() {
                runtime.on_dock_click(&ev);
            }
        }) as Box<dyn FnMut(web_sys::MouseEvent)>);
        match el.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()) {
            Ok(()) => on_click.forget(),
            Err(err) => log::warn!("dock: click listener failed: {err:?}"),
        }
    }
}

impl WidgetBinder for Runtime {
    fn bind(&self, widget: Widget, el: &Element) {
        match widget {
            Widget::Sortable => self.bind_sortable(el),
            Widget::Dock => self.bind_dock(el),
            other => log::debug!("runtime: {} is bound by page scripts", other.attr()),
        }
    }
}

/// Read the dock's move form next to `button`.
fn move_form(button: &Element, card: EntityId) -> Option<CardMoveBody> {
    let dock = button.closest(&format!("[{}=\"{}\"]", dom::WIDGET_ATTR, Widget::Dock.attr())).ok().flatten()?;
    let column = dom::query_all(&dock, MOVE_COLUMN_SELECTOR)
        .into_iter()
        .find_map(|el| el.dyn_into::<HtmlSelectElement>().ok())?
        .value();
    let position = dom::query_all(&dock, MOVE_POSITION_SELECTOR)
        .into_iter()
        .find_map(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default();
    CardMoveBody::from_form(card, &column, &position)
}
