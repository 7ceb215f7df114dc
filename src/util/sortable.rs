//! Sortable widget configuration and drop event decoding.

#[cfg(test)]
#[path = "sortable_test.rs"]
mod sortable_test;

use coord::drag::{PullMode, ZoneRole};
use coord::mutation::MutationKind;

/// Zone role from a `data-zone` value.
pub fn zone_role(raw: Option<&str>) -> Option<ZoneRole> {
    match raw?.trim() {
        "source" => Some(ZoneRole::Source),
        "target" => Some(ZoneRole::Target),
        _ => None,
    }
}

/// What a target zone holds, from its `data-drop-kind` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// A board column; drops relocate cards.
    Column,
    /// A board group; drops add cloned boards.
    Group,
}

impl DropTarget {
    pub fn from_attr(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("group") => Self::Group,
            _ => Self::Column,
        }
    }

    pub fn mutation_kind(self) -> MutationKind {
        match self {
            Self::Column => MutationKind::CardMove,
            Self::Group => MutationKind::GroupAdd,
        }
    }
}

/// Index from the widget's `*DraggableIndex` field, falling back to the plain
/// `*Index`. Negative and non-finite values are rejected.
pub fn drop_index(draggable: Option<f64>, plain: Option<f64>) -> Option<usize> {
    let raw = draggable.or(plain)?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = raw as usize;
    (raw.is_finite() && raw >= 0.0).then_some(index)
}

/// The widget's `group.pull` value.
pub fn pull_value(pull: PullMode) -> &'static str {
    match pull {
        PullMode::Clone => "clone",
        PullMode::Move => "true",
    }
}

#[cfg(feature = "hydrate")]
pub use browser::*;

#[cfg(feature = "hydrate")]
mod browser {
    use coord::drag::{PullMode, ZoneOptions};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::JsValue;
    use wasm_bindgen::closure::Closure;
    use web_sys::Element;

    use crate::util::js;

    /// Decoded `onEnd` event.
    pub struct SortEnd {
        pub item: Element,
        pub from: Element,
        pub to: Element,
        pub old_index: usize,
        pub new_index: usize,
        pub cloned: bool,
    }

    impl SortEnd {
        pub fn from_event(event: &JsValue) -> Option<Self> {
            let element = |key: &str| js::get(event, key).and_then(|v| v.dyn_into::<Element>().ok());
            let number = |key: &str| js::get(event, key).and_then(|v| v.as_f64());
            let index = |draggable: &str, plain: &str| super::drop_index(number(draggable), number(plain));
            let cloned = js::get(event, "pullMode").and_then(|v| v.as_string()).as_deref() == Some("clone");
            Some(Self {
                item: element("item")?,
                from: element("from")?,
                to: element("to")?,
                old_index: index("oldDraggableIndex", "oldIndex")?,
                new_index: index("newDraggableIndex", "newIndex")?,
                cloned,
            })
        }
    }

    /// Build the widget's options object. `on_end` must outlive the widget.
    pub fn options(opts: &ZoneOptions, on_end: &Closure<dyn FnMut(JsValue)>) -> js_sys::Object {
        let group = js_sys::Object::new();
        js::set(&group, "name", &JsValue::from_str(&opts.group));
        let pull = match opts.pull {
            PullMode::Clone => JsValue::from_str(super::pull_value(opts.pull)),
            PullMode::Move => JsValue::TRUE,
        };
        js::set(&group, "pull", &pull);
        js::set(&group, "put", &JsValue::from_bool(opts.put));

        let options = js_sys::Object::new();
        js::set(&options, "group", &group);
        js::set(&options, "sort", &JsValue::from_bool(opts.sort));
        js::set(&options, "delay", &JsValue::from(opts.delay_ms));
        js::set(&options, "delayOnTouchOnly", &JsValue::from_bool(opts.delay_on_touch_only));
        js::set(&options, "draggable", &JsValue::from_str(&format!("[{}]", crate::util::dom::ITEM_ATTR)));
        js::set(&options, "onEnd", on_end.as_ref().unchecked_ref());
        options
    }
}
