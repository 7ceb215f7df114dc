//! Runtime configuration embedded in the page.
//!
//! The server renders `<script type="application/json" id="corkboard-config">`
//! with any overrides. A missing blob means defaults; a malformed one is
//! logged and also means defaults, so a bad deploy degrades instead of
//! leaving the board without a client.

#[cfg(test)]
#[path = "config_blob_test.rs"]
mod config_blob_test;

use coord::config::CoordConfig;

pub const CONFIG_ELEMENT_ID: &str = "corkboard-config";

/// Parse the blob's text, falling back to defaults.
pub fn parse_or_default(raw: Option<&str>) -> CoordConfig {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return CoordConfig::default();
    };
    match CoordConfig::from_json(raw) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("config: {err}; using defaults");
            CoordConfig::default()
        }
    }
}

/// Read and parse the page's config blob.
pub fn load() -> CoordConfig {
    #[cfg(feature = "hydrate")]
    {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        parse_or_default(text.as_deref())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        CoordConfig::default()
    }
}
