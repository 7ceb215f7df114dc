//! Star buttons and the sidebar favorites list.

use coord::EntityId;
use coord::error::DomInconsistency;
use coord::favorites::{FavoritesView, glyph};
use web_sys::{Element, Node};

use crate::util::dom;

/// Attribute on a star button naming the board for new list entries.
const BOARD_NAME_ATTR: &str = "data-board-name";

pub struct DomFavoritesView {
    board_url_template: String,
}

impl DomFavoritesView {
    pub fn new(board_url_template: impl Into<String>) -> Self {
        Self { board_url_template: board_url_template.into() }
    }

    /// Board ids currently listed in the sidebar, in order.
    pub fn listed_ids() -> Vec<EntityId> {
        dom::query_document(&format!("#{} [{}]", dom::FAVORITES_LIST_ID, dom::FAVORITE_ITEM_ATTR))
            .iter()
            .filter_map(|el| dom::id_attr(el, dom::FAVORITE_ITEM_ATTR))
            .collect()
    }

    fn list_entry(&self, board: EntityId, name: &str) -> Result<Element, DomInconsistency> {
        let document = dom::document().ok_or_else(|| DomInconsistency::new("no document"))?;
        let create = |tag: &str| {
            document.create_element(tag).map_err(|err| DomInconsistency::new(format!("create {tag}: {err:?}")))
        };
        let li = create("li")?;
        let link = create("a")?;
        let href = coord::entity::expand_template(&self.board_url_template, board);
        let attrs = [(dom::FAVORITE_ITEM_ATTR, board.to_string()), ("class", "favorites__item".to_owned())];
        for (attr, value) in &attrs {
            li.set_attribute(attr, value).map_err(|err| DomInconsistency::new(format!("{err:?}")))?;
        }
        link.set_attribute("href", &href).map_err(|err| DomInconsistency::new(format!("{err:?}")))?;
        link.set_text_content(Some(name));
        li.append_child(&link).map_err(|err| DomInconsistency::new(format!("{err:?}")))?;
        Ok(li)
    }
}

impl FavoritesView for DomFavoritesView {
    fn render(&self, board: EntityId, favorited: bool, index: Option<usize>) -> Result<(), DomInconsistency> {
        let stars = dom::query_document(&dom::attr_selector(dom::FAVORITE_ATTR, board));
        if stars.is_empty() {
            return Err(DomInconsistency::new(format!("no star for board {board}")));
        }
        for star in &stars {
            star.set_text_content(Some(glyph(favorited)));
            if let Err(err) = star.set_attribute("aria-pressed", if favorited { "true" } else { "false" }) {
                log::warn!("favorite: aria-pressed: {err:?}");
            }
        }

        let Some(list) = dom::by_id(dom::FAVORITES_LIST_ID) else {
            return Ok(());
        };
        let existing = dom::query_all(&list, &dom::attr_selector(dom::FAVORITE_ITEM_ATTR, board));
        if !favorited {
            for entry in existing {
                entry.remove();
            }
            return Ok(());
        }
        if !existing.is_empty() {
            return Ok(());
        }
        let name = stars[0].get_attribute(BOARD_NAME_ATTR).unwrap_or_else(|| format!("Board {board}"));
        let entry = self.list_entry(board, &name)?;
        let entries = dom::children_with(&list, dom::FAVORITE_ITEM_ATTR);
        let reference: Option<&Node> = index.and_then(|i| entries.get(i)).map(|e| e.as_ref());
        list.insert_before(&entry, reference)
            .map(|_| ())
            .map_err(|err| DomInconsistency::new(format!("favorites insert: {err:?}")))
    }
}
