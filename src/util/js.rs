//! Bindings to the page's script collaborators: the fragment-swap library
//! (`htmx`) and the sortable widget (`Sortable`).

use wasm_bindgen::prelude::*;
use web_sys::Element;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = htmx, js_name = ajax, catch)]
    fn htmx_ajax(verb: &str, path: &str, context: &JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(js_namespace = Sortable, js_name = create, catch)]
    fn sortable_create(el: &Element, options: &JsValue) -> Result<JsValue, JsValue>;
}

/// Set `key` on a plain JS object, logging failures.
pub fn set(target: &js_sys::Object, key: &str, value: &JsValue) {
    if let Err(err) = js_sys::Reflect::set(target, &JsValue::from_str(key), value) {
        log::warn!("js: cannot set {key}: {err:?}");
    }
}

/// Read `key` from a JS value.
pub fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key)).ok().filter(|v| !v.is_undefined() && !v.is_null())
}

/// Ask the swap library to fetch `url` into the element with id `target`.
pub fn swap(verb: &str, url: &str, target: &str) {
    let context = js_sys::Object::new();
    set(&context, "target", &JsValue::from_str(&format!("#{target}")));
    set(&context, "swap", &JsValue::from_str("innerHTML"));
    if let Err(err) = htmx_ajax(verb, url, &context) {
        log::warn!("swap: request for {url} failed to start: {err:?}");
    }
}

/// Create a sortable widget on `el`. The returned handle is owned by the
/// widget library; the element keeps it alive.
pub fn create_sortable(el: &Element, options: &js_sys::Object) -> bool {
    match sortable_create(el, options) {
        Ok(_) => true,
        Err(err) => {
            log::warn!("sortable: create failed: {err:?}");
            false
        }
    }
}
