use super::*;
use crate::test_support::{Reply, ScriptedTransport, anonymous_client};
use serde_json::json;

#[test]
fn validate_trims_and_checks_fields() {
    let view = RegisterView::new(" bob ", " b@x.com ", " secret1 ");
    let registration = view.validate().unwrap();
    assert_eq!(registration.username, "bob");
    assert_eq!(registration.email, "b@x.com");
    assert_eq!(registration.password, "secret1");
}

#[test]
fn validate_rejects_in_field_order() {
    let cases = [
        (RegisterView::new("", "b@x.com", "secret1"), "Username is required."),
        (RegisterView::new("bob", "bx.com", "secret1"), "Invalid email format."),
        (RegisterView::new("bob", "b@x.com", "12345"), "Password must be at least 6 characters."),
    ];
    for (view, expected) in cases {
        assert_eq!(view.validate().unwrap_err().to_string(), expected);
    }
}

#[tokio::test]
async fn registration_with_tokens_logs_in() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(
        201,
        json!({ "access": "A1", "refresh": "R1", "message": "User registered successfully!" }),
    )]);
    let client = anonymous_client(&transport);
    let mut view = RegisterView::new("bob", "b@x.com", "secret1");

    assert_eq!(view.submit(&client).await, ViewOutcome::Navigate(Route::Dashboard));
    assert!(client.session().is_authenticated());
    assert_eq!(client.session().user_email().as_deref(), Some("b@x.com"));
}

#[tokio::test]
async fn registration_without_tokens_goes_to_login() {
    let transport =
        ScriptedTransport::sequence(vec![Reply::Json(201, json!({ "message": "User registered successfully!" }))]);
    let client = anonymous_client(&transport);
    let mut view = RegisterView::new("bob", "b@x.com", "secret1");

    assert_eq!(view.submit(&client).await, ViewOutcome::Navigate(Route::Login));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn duplicate_email_is_surfaced() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(
        400,
        json!({ "email": ["user with this email already exists."] }),
    )]);
    let client = anonymous_client(&transport);
    let mut view = RegisterView::new("bob", "b@x.com", "secret1");

    assert_eq!(view.submit(&client).await, ViewOutcome::Stay);
    assert_eq!(view.status(), &ViewStatus::Error("user with this email already exists.".into()));
}

#[tokio::test]
async fn other_failures_use_generic_message() {
    let transport = ScriptedTransport::sequence(vec![Reply::Text(500, "oops")]);
    let client = anonymous_client(&transport);
    let mut view = RegisterView::new("bob", "b@x.com", "secret1");

    view.submit(&client).await;

    assert_eq!(view.status().message(), Some("Registration failed. Please try again."));
}
