//! Confirmation and search requests.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Native builds: stubs reporting a transport failure, so the coordination
//! paths still type-check and roll back if ever reached.
//!
//! ERROR HANDLING
//! ==============
//! A mutation confirmation reports the HTTP status as-is; deciding what a
//! non-2xx means belongs to the executor. Only failures before a status
//! arrives become [`MutationError::Transport`].

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use coord::error::{MutationError, SearchError};
use coord::favorites::FavoriteConfirmation;
use coord::mutation::Confirmation;
use coord::search::SearchResults;
use serde::Serialize;

/// Query parameter carrying the search text.
#[cfg(any(test, feature = "hydrate"))]
const SEARCH_PARAM: &str = "q";

#[cfg(any(test, feature = "hydrate"))]
fn request_failed_message(url: &str, err: &impl std::fmt::Display) -> String {
    format!("request to {url} failed: {err}")
}

#[cfg(any(test, feature = "hydrate"))]
fn encode_failed_message(url: &str, err: &impl std::fmt::Display) -> String {
    format!("body for {url} not encoded: {err}")
}

#[cfg(any(test, feature = "hydrate"))]
fn search_status(status: u16) -> Result<(), SearchError> {
    if coord::error::is_success(status) { Ok(()) } else { Err(SearchError::Rejected { status }) }
}

#[cfg(not(feature = "hydrate"))]
fn unavailable() -> MutationError {
    MutationError::Transport("not available outside the browser".to_owned())
}

#[cfg(feature = "hydrate")]
fn post(url: &str, csrf: Option<(String, String)>) -> gloo_net::http::RequestBuilder {
    let mut builder = gloo_net::http::Request::post(url)
        .credentials(web_sys::RequestCredentials::SameOrigin)
        .header("Accept", "application/json");
    if let Some((name, token)) = csrf {
        builder = builder.header(&name, &token);
    }
    builder
}

/// POST a mutation to `url`, with an optional JSON body, and report the
/// response status.
pub async fn post_mutation<B: Serialize>(url: &str, body: Option<&B>, csrf: Option<(String, String)>) -> Confirmation {
    #[cfg(feature = "hydrate")]
    {
        let builder = post(url, csrf);
        let request = match body {
            Some(body) => builder.json(body),
            None => builder.build(),
        }
        .map_err(|e| MutationError::Transport(encode_failed_message(url, &e)))?;
        let resp = request.send().await.map_err(|e| MutationError::Transport(request_failed_message(url, &e)))?;
        Ok(resp.status())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (url, body, csrf);
        Err(unavailable())
    }
}

/// POST a favorite toggle and read the optional flag from the reply.
pub async fn post_favorite(url: &str, csrf: Option<(String, String)>) -> FavoriteConfirmation {
    #[cfg(feature = "hydrate")]
    {
        let request = post(url, csrf).build().map_err(|e| MutationError::Transport(encode_failed_message(url, &e)))?;
        let resp = request.send().await.map_err(|e| MutationError::Transport(request_failed_message(url, &e)))?;
        let status = resp.status();
        let body = match resp.text().await {
            Ok(body) => body,
            Err(err) => {
                log::debug!("favorite: reply body unreadable: {err}");
                String::new()
            }
        };
        Ok((status, coord::payload::FavoriteReply::from_body(&body)))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (url, csrf);
        Err(unavailable())
    }
}

/// GET search results for `query`.
///
/// # Errors
///
/// Returns [`SearchError`] on transport failure, non-2xx status, or an
/// undecodable body.
pub async fn fetch_search(url: &str, query: &str) -> Result<SearchResults, SearchError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(url)
            .query([(SEARCH_PARAM, query)])
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| SearchError::Transport(request_failed_message(url, &e)))?;
        search_status(resp.status())?;
        let body = resp.text().await.map_err(|e| SearchError::Transport(request_failed_message(url, &e)))?;
        SearchResults::from_json(&body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (url, query);
        Err(SearchError::Transport("not available outside the browser".to_owned()))
    }
}
