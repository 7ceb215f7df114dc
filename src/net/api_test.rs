use super::*;

use coord::payload::CardMoveBody;
use coord::EntityId;
use futures::executor::block_on;

#[test]
fn search_param_is_q() {
    assert_eq!(SEARCH_PARAM, "q");
}

#[test]
fn request_failed_message_names_url() {
    assert_eq!(request_failed_message("/cards/3/move/", &"offline"), "request to /cards/3/move/ failed: offline");
}

#[test]
fn encode_failed_message_names_url() {
    assert_eq!(encode_failed_message("/x/", &"bad"), "body for /x/ not encoded: bad");
}

#[test]
fn search_status_accepts_2xx_only() {
    assert_eq!(search_status(200), Ok(()));
    assert_eq!(search_status(204), Ok(()));
    assert_eq!(search_status(500), Err(SearchError::Rejected { status: 500 }));
    assert_eq!(search_status(302), Err(SearchError::Rejected { status: 302 }));
}

#[test]
fn native_mutation_reports_transport_failure() {
    let body = CardMoveBody { card_id: EntityId(1), column_id: EntityId(2), position: 0 };
    let result = block_on(post_mutation("/cards/1/move/", Some(&body), None));
    assert!(matches!(result, Err(MutationError::Transport(_))));
}

#[test]
fn native_favorite_reports_transport_failure() {
    let result = block_on(post_favorite("/boards/1/favorite/", None));
    assert!(matches!(result, Err(MutationError::Transport(_))));
}

#[test]
fn native_search_reports_transport_failure() {
    let result = block_on(fetch_search("/search/", "plan"));
    assert!(matches!(result, Err(SearchError::Transport(_))));
}
