use super::*;

// =============================================================
// Helpers
// =============================================================

fn coordinator() -> SearchCoordinator {
    SearchCoordinator::new(250, 1)
}

/// Type `query` and let its debounce timer fire.
fn type_and_fire(search: &SearchCoordinator, query: &str) -> SearchRequest {
    let InputAction::Debounce { ticket, .. } = search.on_input(query) else {
        panic!("expected debounce for {query:?}");
    };
    search.fire(ticket, query).expect("request issued")
}

fn results_titled(title: &str) -> SearchResults {
    SearchResults {
        cards: vec![CardHit {
            id: EntityId(1),
            board_id: EntityId(2),
            title: title.to_owned(),
            board_name: "Roadmap".to_owned(),
            column_name: "Doing".to_owned(),
            excerpt: None,
            match_in: MatchLocation::Title,
        }],
        boards: vec![],
    }
}

fn rendered_title(search: &SearchCoordinator) -> Option<String> {
    match search.view() {
        SearchView::Results { results, .. } => results.cards.first().map(|c| c.title.clone()),
        _ => None,
    }
}

// =============================================================
// Debounce
// =============================================================

#[test]
fn input_requests_debounce_with_configured_delay() {
    let search = coordinator();
    assert!(matches!(search.on_input("road"), InputAction::Debounce { delay_ms: 250, .. }));
}

#[test]
fn newer_keystroke_cancels_pending_fire() {
    let search = coordinator();
    let InputAction::Debounce { ticket: first, .. } = search.on_input("ro") else {
        panic!("expected debounce");
    };
    let InputAction::Debounce { ticket: second, .. } = search.on_input("roa") else {
        panic!("expected debounce");
    };
    assert_eq!(search.fire(first, "ro"), None);
    assert_eq!(search.fire(second, "roa").map(|r| r.query), Some("roa".to_owned()));
}

#[test]
fn whitespace_query_resets_synchronously() {
    let search = coordinator();
    type_and_fire(&search, "road");
    assert_eq!(search.on_input("   "), InputAction::Reset);
    assert_eq!(search.view(), SearchView::Idle);
}

#[test]
fn min_chars_holds_back_short_queries() {
    let search = SearchCoordinator::new(250, 3);
    assert_eq!(search.on_input("ab"), InputAction::Reset);
    assert!(matches!(search.on_input("abc"), InputAction::Debounce { .. }));
}

#[test]
fn fire_trims_the_query_and_enters_loading() {
    let search = coordinator();
    let req = type_and_fire(&search, "  road  ");
    assert_eq!(req.query, "road");
    assert_eq!(search.view(), SearchView::Loading { query: "road".to_owned() });
}

// =============================================================
// Sequencing
// =============================================================

#[test]
fn sequences_strictly_increase() {
    let search = coordinator();
    let a = type_and_fire(&search, "a");
    let b = type_and_fire(&search, "ab");
    let c = type_and_fire(&search, "abc");
    assert!(a.sequence < b.sequence && b.sequence < c.sequence);
}

#[test]
fn out_of_order_responses_render_only_the_latest() {
    let search = coordinator();
    let r1 = type_and_fire(&search, "r");
    let r2 = type_and_fire(&search, "ro");
    let r3 = type_and_fire(&search, "roa");

    assert!(!search.on_response(r2.sequence, Ok(results_titled("two"))));
    assert_eq!(rendered_title(&search), None);
    assert!(!search.on_response(r1.sequence, Ok(results_titled("one"))));
    assert_eq!(rendered_title(&search), None);
    assert!(search.on_response(r3.sequence, Ok(results_titled("three"))));
    assert_eq!(rendered_title(&search), Some("three".to_owned()));
}

#[test]
fn late_older_response_cannot_overwrite_newer_results() {
    let search = coordinator();
    let old = type_and_fire(&search, "r");
    let new = type_and_fire(&search, "ro");
    search.on_response(new.sequence, Ok(results_titled("new")));
    assert!(!search.on_response(old.sequence, Ok(results_titled("old"))));
    assert_eq!(rendered_title(&search), Some("new".to_owned()));
}

#[test]
fn clearing_input_discards_in_flight_response() {
    let search = coordinator();
    let req = type_and_fire(&search, "road");
    search.on_input("");
    assert!(!search.on_response(req.sequence, Ok(results_titled("road"))));
    assert_eq!(search.view(), SearchView::Idle);
}

#[test]
fn error_renders_inline_error_state() {
    let search = coordinator();
    let req = type_and_fire(&search, "road");
    assert!(search.on_response(req.sequence, Err(SearchError::Rejected { status: 500 })));
    assert!(matches!(search.view(), SearchView::Error(_)));
}

#[test]
fn stale_error_is_also_dropped() {
    let search = coordinator();
    let old = type_and_fire(&search, "r");
    type_and_fire(&search, "ro");
    assert!(!search.on_response(old.sequence, Err(SearchError::Transport("offline".to_owned()))));
    assert!(matches!(search.view(), SearchView::Loading { .. }));
}

// =============================================================
// Results and navigation
// =============================================================

#[test]
fn decodes_response_with_defaults_and_unknown_match_tag() {
    let raw = r#"{
        "cards": [
            { "id": 5, "board_id": 2, "title": "Fix login", "board_name": "Web",
              "column_name": "Todo", "excerpt": "...login...", "match": "description" },
            { "id": 6, "board_id": 2, "title": "Other", "match": "attachment" }
        ],
        "boards": [ { "id": 2, "title": "Web" } ]
    }"#;
    let results = SearchResults::from_json(raw).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results.cards[0].match_in, MatchLocation::Description);
    assert_eq!(results.cards[1].match_in, MatchLocation::Other);
    assert_eq!(results.cards[1].excerpt, None);
    assert_eq!(results.boards[0].name, "Web");
}

#[test]
fn missing_arrays_decode_as_empty() {
    assert!(SearchResults::from_json("{}").unwrap().is_empty());
    assert!(matches!(SearchResults::from_json("[]"), Err(SearchError::Decode(_))));
}

#[test]
fn card_result_links_to_board_with_card_param() {
    let cfg = CoordConfig::default();
    let results = results_titled("x");
    assert_eq!(card_href(&results.cards[0], &cfg), "/boards/2/?card=1");
    let board = BoardHit { id: EntityId(9), name: "B".to_owned() };
    assert_eq!(board_href(&board, &cfg), "/boards/9/");
}

#[test]
fn keyboard_highlight_walks_cards_then_boards() {
    let cfg = CoordConfig::default();
    let search = coordinator();
    let req = type_and_fire(&search, "x");
    let mut results = results_titled("x");
    results.boards.push(BoardHit { id: EntityId(4), name: "Ops".to_owned() });
    search.on_response(req.sequence, Ok(results));

    assert_eq!(search.move_highlight(1), Some(0));
    assert_eq!(search.highlighted_href(&cfg).as_deref(), Some("/boards/2/?card=1"));
    assert_eq!(search.move_highlight(1), Some(1));
    assert_eq!(search.highlighted_href(&cfg).as_deref(), Some("/boards/4/"));
    assert_eq!(search.move_highlight(1), Some(1));
    assert_eq!(search.move_highlight(-5), Some(0));
}

#[test]
fn highlight_is_none_without_results() {
    let search = coordinator();
    assert_eq!(search.move_highlight(1), None);
    assert_eq!(search.highlighted_href(&CoordConfig::default()), None);
}

#[test]
fn reset_invalidates_pending_ticket() {
    let search = coordinator();
    let InputAction::Debounce { ticket, .. } = search.on_input("road") else {
        panic!("expected debounce");
    };
    search.reset();
    assert_eq!(search.fire(ticket, "road"), None);
}
