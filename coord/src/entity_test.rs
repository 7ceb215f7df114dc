use super::*;

#[test]
fn parse_accepts_plain_integers() {
    assert_eq!(EntityId::parse("42"), Some(EntityId(42)));
    assert_eq!(EntityId::parse(" 7 "), Some(EntityId(7)));
    assert_eq!(EntityId::parse("-3"), Some(EntityId(-3)));
}

#[test]
fn parse_rejects_non_numeric_values() {
    assert_eq!(EntityId::parse(""), None);
    assert_eq!(EntityId::parse("NaN"), None);
    assert_eq!(EntityId::parse("Infinity"), None);
    assert_eq!(EntityId::parse("12abc"), None);
    assert_eq!(EntityId::parse("1e3"), None);
}

#[test]
fn display_round_trips_through_from_str() {
    let id: EntityId = "99".parse().unwrap();
    assert_eq!(id.to_string(), "99");
}

#[test]
fn expand_template_replaces_every_placeholder() {
    assert_eq!(expand_template("/cards/{id}/", EntityId(5)), "/cards/5/");
    assert_eq!(expand_template("/a/{id}/b/{id}", EntityId(1)), "/a/1/b/1");
    assert_eq!(expand_template("/search/", EntityId(1)), "/search/");
}

#[test]
fn serializes_as_bare_number() {
    let json = serde_json::to_string(&EntityId(12)).unwrap();
    assert_eq!(json, "12");
    let back: EntityId = serde_json::from_str("12").unwrap();
    assert_eq!(back, EntityId(12));
}
