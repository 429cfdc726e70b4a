use super::*;
use crate::test_support::{Reply, ScriptedTransport, client_with_tokens};
use serde_json::json;

#[test]
fn status_message_only_for_terminal_states() {
    assert_eq!(ViewStatus::Idle.message(), None);
    assert_eq!(ViewStatus::Loading.message(), None);
    assert_eq!(ViewStatus::Success("ok".into()).message(), Some("ok"));
    assert!(ViewStatus::Error("bad".into()).is_error());
}

#[test]
fn unauthorized_failure_navigates_to_login() {
    let err = ClientError::Unauthorized { body: String::new() };
    assert_eq!(after_failure(&err), ViewOutcome::Navigate(Route::Login));
    let err = ClientError::Status { status: 500, body: String::new() };
    assert_eq!(after_failure(&err), ViewOutcome::Stay);
}

#[tokio::test]
async fn logout_clears_session_and_goes_to_login() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(200, json!({ "message": "Logout successful!" }))]);
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));

    assert_eq!(logout(&client).await, ViewOutcome::Navigate(Route::Login));
    assert!(!client.session().is_authenticated());
    assert_eq!(transport.requests()[0].bearer(), Some("A1"));
}

#[tokio::test]
async fn logout_clears_session_even_when_backend_fails() {
    let transport = ScriptedTransport::sequence(vec![Reply::Fail]);
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));

    assert_eq!(logout(&client).await, ViewOutcome::Navigate(Route::Login));
    assert_eq!(client.session().get(), crate::session::Session::default());
}
