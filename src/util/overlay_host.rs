//! Overlay DOM host: visibility, content, swap requests, and widget binding.
//!
//! Widgets inside swapped content are bound at most once per element. The
//! binding sets are `WeakSet`s, so an element dropped by a later swap takes
//! its record with it and nothing has to be unbound.

use std::cell::RefCell;
use std::rc::Weak;

use coord::binding::{BindingRegistry, ElementSet, Widget};
use coord::config::CoordConfig;
use coord::overlay::{OverlayHost, SwapRequest};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Element;

use crate::util::{dom, js};

/// Event dispatched on elements whose widget lives in page scripts.
pub const BIND_EVENT: &str = "corkboard:bind";

/// Weak-keyed element set backed by a JS `WeakSet`.
pub struct WeakElements(js_sys::WeakSet);

impl Default for WeakElements {
    fn default() -> Self {
        Self(js_sys::WeakSet::new())
    }
}

impl ElementSet<Element> for WeakElements {
    fn contains(&self, element: &Element) -> bool {
        self.0.has(element.unchecked_ref())
    }

    fn insert(&self, element: &Element) {
        self.0.add(element.unchecked_ref());
    }
}

/// Binds widgets the client itself drives (sortable zones, the dock).
pub trait WidgetBinder {
    fn bind(&self, widget: Widget, el: &Element);
}

pub struct DomOverlayHost {
    root_id: String,
    region_id: String,
    bindings: BindingRegistry<WeakElements>,
    binder: RefCell<Option<Weak<dyn WidgetBinder>>>,
}

impl DomOverlayHost {
    pub fn new(config: &CoordConfig) -> Self {
        Self {
            root_id: config.overlay_root.clone(),
            region_id: config.overlay_region.clone(),
            bindings: BindingRegistry::new(),
            binder: RefCell::new(None),
        }
    }

    /// Install the binder once the runtime that owns this host exists.
    pub fn set_binder(&self, binder: Weak<dyn WidgetBinder>) {
        *self.binder.borrow_mut() = Some(binder);
    }

    /// Bind every marked widget under `root`, skipping elements already bound.
    pub fn bind_within(&self, root: &Element) {
        let binder = self.binder.borrow().as_ref().and_then(Weak::upgrade);
        for widget in Widget::ALL {
            let selector = format!("[{}=\"{}\"]", dom::WIDGET_ATTR, widget.attr());
            for el in dom::query_all(root, &selector) {
                self.bindings.bind_once(widget, &el, |el| match widget {
                    Widget::Sortable | Widget::Dock => match &binder {
                        Some(binder) => binder.bind(widget, el),
                        None => log::warn!("overlay: no binder for {}", widget.attr()),
                    },
                    Widget::RichText | Widget::TagToggle | Widget::Checklist => announce(widget, el),
                });
            }
        }
    }
}

/// Let page scripts initialize a widget the client does not own.
fn announce(widget: Widget, el: &Element) {
    let init = web_sys::CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&JsValue::from_str(widget.attr()));
    match web_sys::CustomEvent::new_with_event_init_dict(BIND_EVENT, &init) {
        Ok(event) => {
            if let Err(err) = el.dispatch_event(&event) {
                log::warn!("overlay: {} bind event failed: {err:?}", widget.attr());
            }
        }
        Err(err) => log::warn!("overlay: cannot build bind event: {err:?}"),
    }
}

impl OverlayHost for DomOverlayHost {
    fn show(&self) {
        if let Some(root) = dom::by_id(&self.root_id) {
            dom::set_hidden(&root, false);
        }
        if let Some(body) = dom::body() {
            if let Err(err) = body.class_list().add_1("overlay-open") {
                log::warn!("overlay: body class: {err:?}");
            }
        }
    }

    fn hide(&self) {
        if let Some(root) = dom::by_id(&self.root_id) {
            dom::set_hidden(&root, true);
        }
        if let Some(body) = dom::body() {
            if let Err(err) = body.class_list().remove_1("overlay-open") {
                log::warn!("overlay: body class: {err:?}");
            }
        }
    }

    fn clear_content(&self) {
        if let Some(region) = dom::by_id(&self.region_id) {
            region.set_inner_html("");
        }
    }

    fn request_swap(&self, request: &SwapRequest) {
        js::swap(request.method.as_str(), &request.url, &request.target);
    }

    fn init_widgets(&self, region: &str) {
        match dom::by_id(region) {
            Some(root) => self.bind_within(&root),
            None => log::warn!("overlay: swapped region #{region} not found"),
        }
    }
}
