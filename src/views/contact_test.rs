use super::*;
use crate::guard::Route;
use crate::net::request::RequestBody;
use crate::net::types::Category;
use crate::test_support::{Reply, ScriptedTransport, client_with_tokens};
use serde_json::json;

fn item(contact_email: Option<&str>) -> Item {
    Item {
        id: 7,
        title: "Wallet".into(),
        description: "Brown leather".into(),
        category: Category::Lost,
        location: "Bus stop".into(),
        image: None,
        contact_email: contact_email.map(ToOwned::to_owned),
        created_at: None,
        updated_at: None,
        is_deleted: false,
    }
}

#[test]
fn validate_requires_a_real_message() {
    let session = SessionStore::in_memory();
    let mut view = ContactView::new(&item(Some("owner@x.com")), &session);

    view.message = "   ".into();
    assert_eq!(view.validate().unwrap_err().to_string(), "Please enter a message.");
    view.message = "too short".into();
    assert_eq!(view.validate().unwrap_err().to_string(), "Message must be at least 10 characters.");
    view.message = "  I found your wallet  ".into();
    assert_eq!(view.validate().unwrap().message, "I found your wallet");
}

#[test]
fn missing_reporter_email_is_a_validation_error() {
    let session = SessionStore::in_memory();
    let mut view = ContactView::new(&item(Some("  ")), &session);
    view.message = "I found your wallet".into();

    assert!(matches!(view.validate(), Err(ClientError::Validation(_))));
}

#[tokio::test]
async fn send_posts_message_to_reporter() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(200, json!({ "message": "Email sent successfully!" }))]);
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));
    let mut view = ContactView::new(&item(Some("owner@x.com")), client.session());
    view.message = "I found your wallet".into();

    assert_eq!(view.send(&client).await, ViewOutcome::Stay);
    assert_eq!(view.status(), &ViewStatus::Success("Message sent successfully!".into()));
    assert!(view.message.is_empty());
    assert_eq!(
        transport.requests()[0].body,
        RequestBody::Json(json!({ "item_id": 7, "message": "I found your wallet", "mail": "owner@x.com" }))
    );
}

#[tokio::test]
async fn send_failure_keeps_message() {
    let transport = ScriptedTransport::sequence(vec![Reply::Text(500, "smtp down")]);
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));
    let mut view = ContactView::new(&item(Some("owner@x.com")), client.session());
    view.message = "I found your wallet".into();

    view.send(&client).await;

    assert_eq!(view.status().message(), Some("Failed to send message. Please try again."));
    assert_eq!(view.message, "I found your wallet");
}

#[tokio::test]
async fn unauthorized_send_redirects() {
    let transport = ScriptedTransport::new(|_| Reply::Json(401, json!({ "detail": "expired" })));
    let client = client_with_tokens(&transport, Some("A1"), None);
    let mut view = ContactView::new(&item(Some("owner@x.com")), client.session());
    view.message = "I found your wallet".into();

    assert_eq!(view.send(&client).await, ViewOutcome::Navigate(Route::Login));
}
