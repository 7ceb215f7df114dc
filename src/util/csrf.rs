//! Anti-forgery token lookup.
//!
//! The token is read from the page's hidden form field first and from the
//! cookie second. A missing token is not an error here: the request is sent
//! anyway and the server decides.

#[cfg(test)]
#[path = "csrf_test.rs"]
mod csrf_test;

use coord::config::CoordConfig;

/// Value of cookie `name` in a `document.cookie` string.
pub fn cookie_value(cookies: &str, name: &str) -> Option<String> {
    cookies
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// `(header name, token)` for a mutating request, if a token is present.
pub fn header(config: &CoordConfig) -> Option<(String, String)> {
    #[cfg(feature = "hydrate")]
    {
        token(config).map(|token| (config.csrf_header.clone(), token))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = config;
        None
    }
}

#[cfg(feature = "hydrate")]
fn token(config: &CoordConfig) -> Option<String> {
    use wasm_bindgen::JsCast;

    let document = web_sys::window()?.document()?;
    let selector = format!("input[name=\"{}\"]", config.csrf_field);
    if let Ok(Some(el)) = document.query_selector(&selector) {
        if let Ok(input) = el.dyn_into::<web_sys::HtmlInputElement>() {
            let value = input.value();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    let cookies = document.dyn_into::<web_sys::HtmlDocument>().ok()?.cookie().ok()?;
    let token = cookie_value(&cookies, &config.csrf_cookie);
    if token.is_none() {
        log::debug!("csrf: no token on page, sending without one");
    }
    token
}
