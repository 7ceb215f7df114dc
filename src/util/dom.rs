//! DOM lookup helpers and the attribute vocabulary shared with the server
//! templates.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server renders every board, column, and card. The client finds them
//! through `data-*` attributes only; the names live here so templates and
//! client agree in one place.

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

use coord::EntityId;

use crate::util::sortable::DropTarget;

/// Id of the dragged or listed item (card or board).
pub const ITEM_ATTR: &str = "data-item-id";
/// Id of a drop container (column or board group).
pub const CONTAINER_ATTR: &str = "data-container-id";
/// `source` or `target` on a sortable zone.
pub const ZONE_ATTR: &str = "data-zone";
/// Sortable group name shared by zones that exchange items.
pub const GROUP_ATTR: &str = "data-sort-group";
/// `card` or `group` on a target zone: which mutation a drop sends.
pub const DROP_KIND_ATTR: &str = "data-drop-kind";
/// Widget marker scanned after every swap.
pub const WIDGET_ATTR: &str = "data-widget";
/// On elements that open a card overlay when clicked.
pub const OPEN_CARD_ATTR: &str = "data-card-open";
/// On elements that close the overlay when clicked.
pub const CLOSE_ATTR: &str = "data-overlay-close";
/// Star button for a board.
pub const FAVORITE_ATTR: &str = "data-favorite-board";
/// Favorites sidebar entry for a board.
pub const FAVORITE_ITEM_ATTR: &str = "data-favorite-item";
/// "Remove from group" button inside a group's board entry.
pub const GROUP_REMOVE_ATTR: &str = "data-group-remove";
/// On `<body>`: `true` when the viewer may edit.
pub const CAN_EDIT_ATTR: &str = "data-can-edit";
/// Dock buttons: `move`, `duplicate`, or `copy-link`.
pub const DOCK_ACTION_ATTR: &str = "data-action";
/// Optional endpoint override on a dock button.
pub const DOCK_URL_ATTR: &str = "data-url";
/// Dock menu toggle button.
pub const DOCK_MENU_TOGGLE_ATTR: &str = "data-dock-menu";
/// Dock move panel toggle button.
pub const DOCK_PANEL_TOGGLE_ATTR: &str = "data-dock-panel";

pub const FAVORITES_LIST_ID: &str = "favorites-list";
pub const DOCK_HOST_ID: &str = "card-dock-host";
pub const SEARCH_MOUNT_ID: &str = "search-panel";

/// CSS selector for `[attr="id"]`.
pub fn attr_selector(attr: &str, id: EntityId) -> String {
    format!("[{attr}=\"{id}\"]")
}

/// Selector for the target zones of one drop kind. Cards and boards share
/// the item id space, so lookups never cross kinds.
pub fn zone_selector(target: DropTarget) -> String {
    let group = format!("[{DROP_KIND_ATTR}=\"group\"]");
    match target {
        DropTarget::Group => format!("[{ZONE_ATTR}=\"target\"]{group}"),
        DropTarget::Column => format!("[{ZONE_ATTR}=\"target\"]:not({group})"),
    }
}

/// Selector for an item placed directly in a target zone of `target`'s kind.
pub fn placed_item_selector(target: DropTarget, id: EntityId) -> String {
    format!("{} > {}", zone_selector(target), attr_selector(ITEM_ATTR, id))
}

/// Selector for a target container of `target`'s kind.
pub fn container_selector(target: DropTarget, id: EntityId) -> String {
    format!("{}{}", zone_selector(target), attr_selector(CONTAINER_ATTR, id))
}

/// Parse an entity id attribute value.
pub fn parse_id(raw: Option<String>) -> Option<EntityId> {
    raw.as_deref().and_then(EntityId::parse)
}

#[cfg(feature = "hydrate")]
pub use browser::*;

#[cfg(feature = "hydrate")]
mod browser {
    use coord::EntityId;
    use wasm_bindgen::JsCast;
    use web_sys::{Document, Element, HtmlElement};

    use super::parse_id;

    pub fn document() -> Option<Document> {
        web_sys::window().and_then(|w| w.document())
    }

    pub fn by_id(id: &str) -> Option<Element> {
        document()?.get_element_by_id(id)
    }

    pub fn query(selector: &str) -> Option<Element> {
        match document()?.query_selector(selector) {
            Ok(found) => found,
            Err(err) => {
                log::warn!("dom: bad selector {selector}: {err:?}");
                None
            }
        }
    }

    /// All elements under `root` matching `selector`, in document order.
    pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
        let Ok(list) = root.query_selector_all(selector) else {
            log::warn!("dom: bad selector {selector}");
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    /// Same as [`query_all`] over the whole document.
    pub fn query_document(selector: &str) -> Vec<Element> {
        document()
            .and_then(|d| d.document_element())
            .map(|root| query_all(&root, selector))
            .unwrap_or_default()
    }

    /// Nearest ancestor-or-self of an event target matching `selector`.
    pub fn closest(target: Option<web_sys::EventTarget>, selector: &str) -> Option<Element> {
        let el = target?.dyn_into::<Element>().ok()?;
        el.closest(selector).ok().flatten()
    }

    pub fn id_attr(el: &Element, attr: &str) -> Option<EntityId> {
        parse_id(el.get_attribute(attr))
    }

    /// Element children of `parent` carrying `attr`, in order.
    pub fn children_with(parent: &Element, attr: &str) -> Vec<Element> {
        let children = parent.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter(|child| child.has_attribute(attr))
            .collect()
    }

    pub fn set_hidden(el: &Element, hidden: bool) {
        let result = if hidden {
            el.class_list().add_1("hidden")
        } else {
            el.class_list().remove_1("hidden")
        };
        if let Err(err) = result {
            log::warn!("dom: class toggle failed: {err:?}");
        }
        if let Err(err) = el.set_attribute("aria-hidden", if hidden { "true" } else { "false" }) {
            log::warn!("dom: aria-hidden failed: {err:?}");
        }
    }

    pub fn body() -> Option<HtmlElement> {
        document()?.body()
    }
}
