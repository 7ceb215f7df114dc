//! Search-as-you-type panel.
//!
//! The coordinator decides when to fire and which response wins; the panel
//! owns the input, the quiet-interval timer, and copies the coordinator's
//! view into signals after every change.

use std::rc::Rc;

use coord::config::CoordConfig;
use coord::search::{InputAction, SearchCoordinator, SearchView};
#[cfg(feature = "hydrate")]
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::state::search::{SearchRow, rows, status_line};

/// Element id of the results list.
pub const RESULTS_ID: &str = "search-results";

#[derive(Clone, Copy)]
struct Panel {
    search: StoredValue<Rc<SearchCoordinator>, LocalStorage>,
    config: StoredValue<Rc<CoordConfig>, LocalStorage>,
    view: RwSignal<SearchView>,
    highlight: RwSignal<Option<usize>>,
    query: RwSignal<String>,
    #[cfg(feature = "hydrate")]
    timer: StoredValue<Option<Timeout>, LocalStorage>,
}

impl Panel {
    fn publish(self) {
        let (view, highlight) = self.search.with_value(|s| (s.view(), s.highlight()));
        self.view.set(view);
        self.highlight.set(highlight);
    }

    fn cancel_timer(self) {
        #[cfg(feature = "hydrate")]
        self.timer.set_value(None);
    }

    fn on_input(self, raw: String) {
        let action = self.search.with_value(|s| s.on_input(&raw));
        self.query.set(raw);
        self.cancel_timer();
        match action {
            InputAction::Reset => self.publish(),
            InputAction::Debounce { ticket, delay_ms } => self.schedule(ticket, delay_ms),
        }
    }

    /// Start the quiet-interval timer; replacing the stored timer cancels
    /// the previous one.
    fn schedule(self, ticket: u64, delay_ms: u32) {
        #[cfg(feature = "hydrate")]
        {
            let timeout = Timeout::new(delay_ms, move || self.fire(ticket));
            self.timer.set_value(Some(timeout));
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (ticket, delay_ms);
        }
    }

    #[cfg(feature = "hydrate")]
    fn fire(self, ticket: u64) {
        let raw = self.query.get_untracked();
        let Some(request) = self.search.with_value(|s| s.fire(ticket, &raw)) else {
            return;
        };
        self.publish();
        let url = self.config.with_value(|c| c.search_url.clone());
        leptos::task::spawn_local(async move {
            let result = crate::net::api::fetch_search(&url, &request.query).await;
            if self.search.with_value(|s| s.on_response(request.sequence, result)) {
                self.publish();
            }
        });
    }

    fn clear(self) {
        self.cancel_timer();
        self.search.with_value(|s| s.reset());
        self.query.set(String::new());
        self.publish();
    }

    fn on_keydown(self, ev: &leptos::ev::KeyboardEvent) {
        match ev.key().as_str() {
            "ArrowDown" | "ArrowUp" => {
                ev.prevent_default();
                let delta = if ev.key() == "ArrowDown" { 1 } else { -1 };
                let next = self.search.with_value(|s| s.move_highlight(delta));
                self.highlight.set(next);
            }
            "Enter" => {
                let href = self.search.with_value(|s| self.config.with_value(|c| s.highlighted_href(c)));
                if let Some(href) = href {
                    ev.prevent_default();
                    follow(&href);
                }
            }
            "Escape" => self.clear(),
            _ => {}
        }
    }
}

fn follow(href: &str) {
    #[cfg(feature = "hydrate")]
    crate::util::browser::navigate(href);
    #[cfg(not(feature = "hydrate"))]
    log::debug!("search: would open {href}");
}

fn row_view(row: SearchRow) -> impl IntoView {
    let mut class = format!("search__row search__row--{}", row.kind.css_modifier());
    if row.highlighted {
        class.push_str(" search__row--active");
    }
    let selected = if row.highlighted { "true" } else { "false" };
    let context = (!row.context.is_empty()).then_some(row.context);
    view! {
        <li class=class role="option" aria-selected=selected data-key=row.key>
            <a class="search__link" href=row.href>
                <span class="search__title">{row.title}</span>
                {row.badge.map(|badge| view! { <span class="search__badge">{badge}</span> })}
                {context.map(|context| view! { <span class="search__context">{context}</span> })}
                {row.excerpt.map(|excerpt| view! { <span class="search__excerpt">{excerpt}</span> })}
            </a>
        </li>
    }
}

/// Search input plus results list.
#[component]
pub fn SearchPanel(search: Rc<SearchCoordinator>, config: Rc<CoordConfig>) -> impl IntoView {
    let panel = Panel {
        view: RwSignal::new(search.view()),
        highlight: RwSignal::new(search.highlight()),
        query: RwSignal::new(String::new()),
        search: StoredValue::new_local(search),
        config: StoredValue::new_local(config),
        #[cfg(feature = "hydrate")]
        timer: StoredValue::new_local(None),
    };

    view! {
        <div class="search">
            <input
                class="search__input"
                type="search"
                placeholder="Search cards and boards"
                autocomplete="off"
                aria-controls=RESULTS_ID
                prop:value=move || panel.query.get()
                on:input=move |ev| panel.on_input(event_target_value(&ev))
                on:keydown=move |ev: leptos::ev::KeyboardEvent| panel.on_keydown(&ev)
            />
            {move || panel.view.with(status_line).map(|line| view! { <p class="search__status">{line}</p> })}
            <ul id=RESULTS_ID class="search__results" role="listbox">
                {move || {
                    let view = panel.view.get();
                    let highlight = panel.highlight.get();
                    panel
                        .config
                        .with_value(|config| rows(&view, highlight, config))
                        .into_iter()
                        .map(row_view)
                        .collect_view()
                }}
            </ul>
        </div>
    }
}
