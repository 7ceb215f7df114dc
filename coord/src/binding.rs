//! Once-per-element widget binding.
//!
//! Swapped-in content is scanned for widgets (rich text, tag toggles, the
//! action dock, sortable lists) after every swap, so the same element is seen
//! many times. The registry remembers which elements each widget kind has
//! already initialized. In the browser the per-kind set is weak-keyed so
//! elements removed by a swap are collected with their binding record.

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use std::cell::RefCell;
use std::collections::HashMap;

/// Widget kinds whose initialization must run at most once per element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Widget {
    RichText,
    TagToggle,
    Checklist,
    Sortable,
    Dock,
}

impl Widget {
    pub const ALL: [Self; 5] = [Self::RichText, Self::TagToggle, Self::Checklist, Self::Sortable, Self::Dock];

    /// Value of the `data-widget` attribute marking elements of this kind.
    #[must_use]
    pub fn attr(self) -> &'static str {
        match self {
            Self::RichText => "rich-text",
            Self::TagToggle => "tag-toggle",
            Self::Checklist => "checklist",
            Self::Sortable => "sortable",
            Self::Dock => "dock",
        }
    }
}

/// A set of elements that a widget kind has bound.
pub trait ElementSet<E: ?Sized>: Default {
    fn contains(&self, element: &E) -> bool;
    fn insert(&self, element: &E);
}

/// Per-widget binding sets.
pub struct BindingRegistry<S> {
    sets: RefCell<HashMap<Widget, S>>,
}

impl<S> Default for BindingRegistry<S> {
    fn default() -> Self {
        Self { sets: RefCell::new(HashMap::new()) }
    }
}

impl<S> BindingRegistry<S> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `init` for `element` unless `widget` already bound it.
    ///
    /// Returns whether `init` ran. The element is recorded before `init` runs
    /// so a re-entrant scan triggered from inside `init` cannot bind twice.
    pub fn bind_once<E: ?Sized>(&self, widget: Widget, element: &E, init: impl FnOnce(&E)) -> bool
    where
        S: ElementSet<E>,
    {
        {
            let mut sets = self.sets.borrow_mut();
            let set = sets.entry(widget).or_default();
            if set.contains(element) {
                return false;
            }
            set.insert(element);
        }
        init(element);
        true
    }
}
