//! User-facing notices and the fail-closed split across real failure paths.

use printbooth::background::BackgroundSelection;
use printbooth::params::FlowParams;
use printbooth::templates::TemplateRegistry;
use printbooth::BoothError;
use std::collections::BTreeMap;

#[test]
fn unknown_template_fails_closed() {
    let registry = TemplateRegistry::builtin();
    let err = registry.get("9-mosaic").unwrap_err();
    assert_eq!(err, BoothError::UnknownTemplate("9-mosaic".into()));
    assert!(!err.is_recoverable());
}

#[test]
fn malformed_route_photos_fail_closed() {
    let mut params = BTreeMap::new();
    params.insert("templateId".to_string(), "4-grid".to_string());
    params.insert("photos".to_string(), "[not json".to_string());

    let err = FlowParams::from_route_params(&params).unwrap_err();
    assert!(matches!(err, BoothError::MalformedParams(_)));
    assert!(!err.is_recoverable());
}

#[test]
fn camera_denial_offers_retry() {
    let notice = BoothError::camera_denied("user declined").user_notice();
    assert_eq!(notice.title, "Permission Required");
    assert!(notice.message.contains("camera"));
    assert!(notice.offers_retry);
}

#[test]
fn shutter_failure_is_retryable() {
    let err = BoothError::Capture("device busy".into());
    assert!(err.is_recoverable());
    let notice = err.user_notice();
    assert_eq!(notice.message, "Failed to take picture. Please try again.");
    assert!(notice.offers_retry);
}

#[test]
fn rejected_custom_color_is_reported_and_recoverable() {
    let mut selection = BackgroundSelection::default();
    let err = selection.apply_custom_color("blue").unwrap_err();
    assert!(err.is_recoverable());
    let notice = err.user_notice();
    assert_eq!(notice.title, "Invalid Color");
    assert!(notice.message.contains("blue"));
    assert!(selection.choice().is_none());
}

#[test]
fn save_failure_notice_names_gallery() {
    let notice = BoothError::Io("disk full".into()).user_notice();
    assert_eq!(notice.message, "Failed to save to gallery: disk full");
    assert!(!notice.offers_retry);
}
