//! Page startup: logging, configuration, the coordination context, and the
//! document-level listeners.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server renders a complete, usable page. Boot attaches behavior to it:
//! click delegation on the document, the swap library's after-swap event,
//! back/forward navigation, and the search island. Nothing here re-renders
//! server markup.

use std::rc::Rc;

use coord::Coordinator;
use coord::clock::Clock;
use coord::drag::suppress_native_drag;
use coord::history::AddressBar;
use coord::overlay::OverlayHost;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use web_sys::{Element, EventTarget, MouseEvent};

use crate::components::search_panel::SearchPanel;
use crate::error::BootError;
use crate::runtime::Runtime;
use crate::util::browser::{BrowserClock, BrowserLocation, PagePermission};
use crate::util::overlay_host::DomOverlayHost;
use crate::util::{config_blob, dom, js};

/// Fired by the swap library on the target after its content is replaced.
const SWAP_EVENT: &str = "htmx:afterSwap";

/// Install the console logger at `Info`; the config may lower or raise it.
pub fn init_logging() {
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("logger already installed: {err}").into());
    }
}

/// Wire the client onto the current page.
///
/// # Errors
///
/// Returns [`BootError`] when there is no document or a listener cannot be
/// installed. A missing search mount point is logged and skipped.
pub fn start() -> Result<Rc<Runtime>, BootError> {
    let config = config_blob::load();
    log::set_max_level(config.log_level().to_level_filter());
    let document = dom::document().ok_or(BootError::NoDocument)?;

    let host = Rc::new(DomOverlayHost::new(&config));
    let clock: Rc<dyn Clock> = Rc::new(BrowserClock);
    let bar: Rc<dyn AddressBar> = Rc::new(BrowserLocation);
    let overlay_host: Rc<dyn OverlayHost> = host.clone();
    let coord = Coordinator::init(config, clock, bar, overlay_host);
    let runtime = Runtime::new(coord, &host);

    install_listeners(&document, &runtime)?;
    if let Some(root) = document.document_element() {
        host.bind_within(&root);
    }
    if let Err(err) = mount_search(&runtime) {
        if !err.is_partial() {
            return Err(err);
        }
        log::warn!("boot: {err}; search disabled");
    }
    runtime.startup();
    log::info!("corkboard client ready");
    Ok(runtime)
}

fn install_listeners(document: &web_sys::Document, runtime: &Rc<Runtime>) -> Result<(), BootError> {
    let window = web_sys::window().ok_or(BootError::NoDocument)?;

    let on_swap = Rc::clone(runtime);
    listen(document, SWAP_EVENT, false, move |ev: web_sys::CustomEvent| {
        match swapped_region(&ev) {
            Some(region) => on_swap.on_swap(&region),
            None => log::debug!("swap: event without a target id"),
        }
    })?;

    let on_pop = Rc::clone(runtime);
    listen(&window, "popstate", false, move |_: web_sys::Event| on_pop.on_pop_state())?;

    let on_click = Rc::clone(runtime);
    listen(document, "click", false, move |ev: MouseEvent| delegate_click(&on_click, &ev))?;

    let on_key = Rc::clone(runtime);
    listen(document, "keydown", false, move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" {
            on_key.on_escape();
        }
    })?;

    listen(document, "dragstart", true, move |ev: web_sys::Event| {
        let draggable = dom::closest(ev.target(), &format!("[{}]", dom::ITEM_ATTR)).is_some();
        if suppress_native_drag(&PagePermission, draggable) {
            ev.prevent_default();
        }
    })
}

/// Attach `handler` for the page's lifetime.
fn listen<E, F>(target: &EventTarget, event: &'static str, capture: bool, handler: F) -> Result<(), BootError>
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    let options = web_sys::AddEventListenerOptions::new();
    options.set_capture(capture);
    target
        .add_event_listener_with_callback_and_add_event_listener_options(event, closure.as_ref().unchecked_ref(), &options)
        .map_err(|err| BootError::Listener { event, detail: format!("{err:?}") })?;
    closure.forget();
    Ok(())
}

/// Id of the element whose content was swapped.
fn swapped_region(ev: &web_sys::CustomEvent) -> Option<String> {
    let from_detail = js::get(&ev.detail(), "target").and_then(|t| t.dyn_into::<Element>().ok());
    let target = from_detail.or_else(|| ev.target().and_then(|t| t.dyn_into::<Element>().ok()))?;
    Some(target.id()).filter(|id| !id.is_empty())
}

/// Document click routing. Modified clicks on card links fall through to the
/// browser so they can open in a new tab.
fn delegate_click(runtime: &Rc<Runtime>, ev: &MouseEvent) {
    let target = ev.target();
    let inside_dock = dom::closest(target.clone(), &format!("#{}", dom::DOCK_HOST_ID)).is_some();
    runtime.on_document_click(inside_dock);

    if let Some(link) = dom::closest(target.clone(), &format!("[{}]", dom::OPEN_CARD_ATTR)) {
        if ev.ctrl_key() || ev.meta_key() || ev.shift_key() || ev.button() != 0 {
            return;
        }
        if let Some(id) = dom::id_attr(&link, dom::OPEN_CARD_ATTR) {
            ev.prevent_default();
            runtime.open_card(id);
        }
        return;
    }
    if dom::closest(target.clone(), &format!("[{}]", dom::CLOSE_ATTR)).is_some() {
        ev.prevent_default();
        runtime.dismiss();
        return;
    }
    if let Some(star) = dom::closest(target.clone(), &format!("[{}]", dom::FAVORITE_ATTR)) {
        if let Some(board) = dom::id_attr(&star, dom::FAVORITE_ATTR) {
            ev.prevent_default();
            runtime.toggle_favorite(board);
        }
        return;
    }
    if let Some(button) = dom::closest(target, &format!("[{}]", dom::GROUP_REMOVE_ATTR)) {
        ev.prevent_default();
        runtime.remove_from_group(&button);
    }
}

fn mount_search(runtime: &Runtime) -> Result<(), BootError> {
    let mount = dom::by_id(dom::SEARCH_MOUNT_ID)
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .ok_or(BootError::MountPoint(dom::SEARCH_MOUNT_ID))?;
    let search = Rc::clone(runtime.coord().search());
    let config = Rc::clone(runtime.coord().config());
    leptos::mount::mount_to(mount, move || view! { <SearchPanel search=search config=config /> }).forget();
    Ok(())
}
