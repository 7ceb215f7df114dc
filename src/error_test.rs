use super::*;

#[test]
fn listener_error_names_event() {
    let err = BootError::Listener { event: "popstate", detail: "denied".to_owned() };
    assert_eq!(err.to_string(), "listener for popstate not installed: denied");
}

#[test]
fn only_missing_mount_point_is_partial() {
    assert!(BootError::MountPoint("search-panel").is_partial());
    assert!(!BootError::NoDocument.is_partial());
    assert!(!BootError::Listener { event: "click", detail: String::new() }.is_partial());
}
