//! Address-bar synchronization for the open card.
//!
//! SYSTEM CONTEXT
//! ==============
//! A single query parameter (default `card`) mirrors the overlay's entity id
//! so a card link is shareable and back/forward moves between cards. The
//! parameter is never allowed to point at something the gate currently
//! forbids loading: startup and back/forward both clear it instead.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::rc::Rc;

use url::Url;
use url::form_urlencoded;

use crate::entity::EntityId;
use crate::gate::Gate;

/// Browser location and history seam.
pub trait AddressBar {
    /// Current absolute URL.
    fn href(&self) -> String;
    /// Add a new history entry for `url`.
    fn push(&self, url: &str);
    /// Replace the current history entry with `url`.
    fn replace(&self, url: &str);
}

/// Whether a URL change creates a new history entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryMode {
    #[default]
    Push,
    Replace,
}

/// What startup found in the address bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartupAction {
    /// No id in the URL.
    Nothing,
    /// An openable id is present; the caller opens it with [`HistoryMode::Replace`].
    Open(EntityId),
    /// An id was present but the gate blocks opening, so it was removed.
    Cleared,
}

/// What a back/forward navigation means for the overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PopAction {
    /// Point the overlay at this id and fetch its detail.
    Retarget(EntityId),
    /// The id is gone (or forbidden) and the overlay was open.
    Close,
    /// Nothing to do.
    Ignore,
}

pub struct HistorySync {
    bar: Rc<dyn AddressBar>,
    param: String,
}

impl HistorySync {
    pub fn new(bar: Rc<dyn AddressBar>, param: impl Into<String>) -> Self {
        Self { bar, param: param.into() }
    }

    #[must_use]
    pub fn param(&self) -> &str {
        &self.param
    }

    /// The id in the URL, or `None` when absent or not an integer.
    pub fn get_entity_id_from_url(&self) -> Option<EntityId> {
        entity_id_in(&self.bar.href(), &self.param)
    }

    /// Write `id` into the URL.
    pub fn set(&self, id: EntityId, mode: HistoryMode) {
        self.write(Some(id), mode);
    }

    /// Remove the parameter from the URL.
    pub fn clear(&self, mode: HistoryMode) {
        if !self.param_present() {
            return;
        }
        self.write(None, mode);
    }

    /// Absolute link to `id` on the current page.
    pub fn link_for(&self, id: EntityId) -> Option<String> {
        with_entity(&self.bar.href(), &self.param, Some(id))
    }

    /// Decide what to do with an id present at page load.
    pub fn on_startup(&self, gate: &Gate) -> StartupAction {
        let Some(id) = self.get_entity_id_from_url() else {
            if self.param_present() {
                self.clear(HistoryMode::Replace);
            }
            return StartupAction::Nothing;
        };
        if gate.is_blocked() {
            log::info!("history: startup id {id} cleared while gate is blocked");
            self.clear(HistoryMode::Replace);
            return StartupAction::Cleared;
        }
        StartupAction::Open(id)
    }

    /// Decide what a back/forward navigation means for the overlay.
    pub fn on_pop_state(&self, gate: &Gate, overlay_open: bool) -> PopAction {
        match self.get_entity_id_from_url() {
            Some(id) if gate.can_open() => PopAction::Retarget(id),
            Some(id) => {
                log::info!("history: popped id {id} cleared while gate is blocked");
                self.clear(HistoryMode::Replace);
                if overlay_open { PopAction::Close } else { PopAction::Ignore }
            }
            None if overlay_open => PopAction::Close,
            None => PopAction::Ignore,
        }
    }

    fn param_present(&self) -> bool {
        Url::parse(&self.bar.href()).is_ok_and(|url| url.query_pairs().any(|(k, _)| k == self.param.as_str()))
    }

    fn write(&self, id: Option<EntityId>, mode: HistoryMode) {
        let current = self.bar.href();
        let Some(next) = with_entity(&current, &self.param, id) else {
            log::warn!("history: cannot parse location {current}");
            return;
        };
        // Re-pushing the URL we are already on only adds a dead back step.
        if next == current || mode == HistoryMode::Replace {
            self.bar.replace(&next);
        } else {
            self.bar.push(&next);
        }
    }
}

/// Read `param` from an absolute URL as an entity id.
#[must_use]
pub fn entity_id_in(href: &str, param: &str) -> Option<EntityId> {
    let Ok(url) = Url::parse(href) else {
        return None;
    };
    url.query_pairs().find(|(k, _)| k == param).and_then(|(_, v)| EntityId::parse(&v))
}

/// Rewrite `href` so `param` holds `id`, or drop `param` when `id` is `None`.
///
/// Other query pairs and the fragment are preserved in order.
#[must_use]
pub fn with_entity(href: &str, param: &str, id: Option<EntityId>) -> Option<String> {
    let Ok(mut url) = Url::parse(href) else {
        return None;
    };
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != param)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (k, v) in &kept {
        query.append_pair(k, v);
    }
    if let Some(id) = id {
        query.append_pair(param, &id.to_string());
    }
    let query = query.finish();
    url.set_query(if query.is_empty() { None } else { Some(&query) });
    Some(url.to_string())
}

/// Relative link to a path with `param=id` attached.
#[must_use]
pub fn path_with_entity(path: &str, param: &str, id: EntityId) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(param, &id.to_string())
        .finish();
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{path}{separator}{query}")
}
