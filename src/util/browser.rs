//! `web-sys` implementations of the small coordination seams: clock,
//! address bar, clipboard, and edit permission.

use coord::clock::Clock;
use coord::dock::Clipboard;
use coord::drag::EditPermission;
use coord::history::AddressBar;
use wasm_bindgen::{JsCast, JsValue};

use crate::util::dom;

/// `Date.now()`.
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }
}

/// `window.location` plus `window.history`.
pub struct BrowserLocation;

impl AddressBar for BrowserLocation {
    fn href(&self) -> String {
        let Some(window) = web_sys::window() else {
            return String::new();
        };
        match window.location().href() {
            Ok(href) => href,
            Err(err) => {
                log::warn!("location: href unavailable: {err:?}");
                String::new()
            }
        }
    }

    fn push(&self, url: &str) {
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            if let Err(err) = history.push_state_with_url(&JsValue::NULL, "", Some(url)) {
                log::warn!("location: pushState failed: {err:?}");
            }
        }
    }

    fn replace(&self, url: &str) {
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            if let Err(err) = history.replace_state_with_url(&JsValue::NULL, "", Some(url)) {
                log::warn!("location: replaceState failed: {err:?}");
            }
        }
    }
}

/// Navigate the whole page to `href`.
pub fn navigate(href: &str) {
    if let Some(window) = web_sys::window() {
        if let Err(err) = window.location().set_href(href) {
            log::warn!("location: navigation to {href} failed: {err:?}");
        }
    }
}

/// Async Clipboard API with a selected-input fallback.
pub struct BrowserClipboard;

/// Read-only input shown when the link must be copied by hand.
const MANUAL_COPY_ID: &str = "card-link-fallback";

impl Clipboard for BrowserClipboard {
    fn write_text(&self, text: &str) -> bool {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let navigator = window.navigator();
        let has_api = js_sys::Reflect::has(&navigator, &JsValue::from_str("clipboard")).unwrap_or(false);
        if !has_api || !window.is_secure_context() {
            return false;
        }
        let promise = navigator.clipboard().write_text(text);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::warn!("clipboard: write rejected: {err:?}");
            }
        });
        true
    }

    fn select_for_manual_copy(&self, text: &str) {
        let Some(input) = dom::by_id(MANUAL_COPY_ID).and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())
        else {
            log::warn!("clipboard: no #{MANUAL_COPY_ID} for manual copy");
            return;
        };
        input.set_value(text);
        dom::set_hidden(&input, false);
        input.select();
    }
}

/// Reads the body's `data-can-edit` flag at call time.
pub struct PagePermission;

impl EditPermission for PagePermission {
    fn can_edit(&self) -> bool {
        dom::body().is_some_and(|body| body.get_attribute(dom::CAN_EDIT_ATTR).as_deref() == Some("true"))
    }
}
