use super::*;
use crate::net::request::{FormPart, RequestBody};
use crate::net::types::{Category, ImageUpload};
use crate::test_support::{Reply, ScriptedTransport, anonymous_client, client_with_tokens};
use reqwest::Method;
use serde_json::json;

fn item(id: i64, title: &str) -> serde_json::Value {
    json!({ "id": id, "title": title, "description": "", "category": "lost", "location": "Hall" })
}

#[test]
fn item_path_formats_trailing_slash() {
    assert_eq!(item_path(42), "/items/42/");
}

#[tokio::test]
async fn login_posts_credentials_and_decodes_tokens() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(
        200,
        json!({ "access": "A1", "refresh": "R1", "user": { "email": "a@x.com" } }),
    )]);
    let client = anonymous_client(&transport);
    let credentials = Credentials { username: "alice".into(), password: "secret1".into() };

    let resp = auth::login(&client, &credentials).await.unwrap();

    assert_eq!(resp.access, "A1");
    let sent = &transport.requests()[0];
    assert_eq!(sent.method, Method::POST);
    assert_eq!(sent.path, LOGIN_PATH);
    assert_eq!(sent.body, RequestBody::Json(json!({ "username": "alice", "password": "secret1" })));
}

#[tokio::test]
async fn login_bad_credentials_is_unauthorized() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(
        401,
        json!({ "detail": "No active account found with the given credentials" }),
    )]);
    let client = anonymous_client(&transport);
    let credentials = Credentials { username: "alice".into(), password: "nope".into() };

    let err = auth::login(&client, &credentials).await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized { .. }));
    assert_eq!(err.server_message().as_deref(), Some("No active account found with the given credentials"));
}

#[tokio::test]
async fn register_surfaces_field_errors() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(
        400,
        json!({ "email": ["A user with this email already exists."] }),
    )]);
    let client = anonymous_client(&transport);
    let registration = Registration { username: "bob".into(), email: "b@x.com".into(), password: "secret1".into() };

    let err = auth::register(&client, &registration).await.unwrap_err();

    assert_eq!(err.status(), Some(400));
    assert_eq!(err.field_message("email").as_deref(), Some("A user with this email already exists."));
}

#[tokio::test]
async fn list_items_decodes_array() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(200, json!([item(1, "Keys"), item(2, "Phone")]))]);
    let client = anonymous_client(&transport);

    let found = items::list(&client).await.unwrap();

    assert_eq!(found.len(), 2);
    assert_eq!(found[1].title, "Phone");
}

#[tokio::test]
async fn search_items_sends_trimmed_query() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(200, json!([item(1, "Keys")]))]);
    let client = anonymous_client(&transport);

    let found = items::search(&client, "  keys ").await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(transport.requests()[0].query, vec![("search".to_owned(), "keys".to_owned())]);
}

#[tokio::test]
async fn blank_search_skips_network() {
    let transport = ScriptedTransport::sequence(vec![]);
    let client = anonymous_client(&transport);

    assert!(items::search(&client, "   ").await.unwrap().is_empty());
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn create_item_sends_multipart_with_image() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(201, item(9, "Umbrella"))]);
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));
    let draft = ItemDraft {
        title: "Umbrella".into(),
        description: "Black".into(),
        category: Category::Found,
        location: "Cafe".into(),
        contact_email: Some("me@x.com".into()),
        image: Some(ImageUpload::File {
            file_name: "u.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: vec![1, 2, 3],
        }),
    };

    let created = items::create(&client, &draft).await.unwrap();

    assert_eq!(created.id, 9);
    let sent = &transport.requests()[0];
    assert_eq!(sent.bearer(), Some("A1"));
    let RequestBody::Multipart(parts) = &sent.body else {
        panic!("expected multipart body, got {:?}", sent.body);
    };
    assert!(parts.iter().any(|p| matches!(p, FormPart::Text { name, value } if name == "category" && value == "found")));
    assert!(parts.iter().any(|p| matches!(p, FormPart::File { name, .. } if name == "image")));
}

#[tokio::test]
async fn update_item_uses_requested_method() {
    let transport = ScriptedTransport::sequence(vec![
        Reply::Json(200, item(5, "Keys")),
        Reply::Json(200, item(5, "Keys")),
    ]);
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));
    let draft = ItemDraft { title: "Keys".into(), ..ItemDraft::default() };

    items::update(&client, 5, &draft, UpdateMode::Patch).await.unwrap();
    items::update(&client, 5, &draft, UpdateMode::Put).await.unwrap();

    let sent = transport.requests();
    assert_eq!((sent[0].method.clone(), sent[0].path.as_str()), (Method::PATCH, "/items/5/"));
    assert_eq!(sent[1].method, Method::PUT);
}

#[tokio::test]
async fn update_foreign_item_is_forbidden_status() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(403, json!({ "error": "Not authorized" }))]);
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));

    let err = items::update(&client, 5, &ItemDraft::default(), UpdateMode::Patch).await.unwrap_err();

    assert_eq!(err.status(), Some(403));
    assert_eq!(err.server_message().as_deref(), Some("Not authorized"));
}

#[tokio::test]
async fn delete_item_targets_item_path() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(
        200,
        json!({ "message": "Item deleted (soft delete) successfully!" }),
    )]);
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));

    let resp = items::delete(&client, 3).await.unwrap();

    assert!(resp.message.unwrap().contains("deleted"));
    assert_eq!(transport.requests()[0].method, Method::DELETE);
    assert_eq!(transport.requests()[0].path, "/items/3/");
}

#[tokio::test]
async fn fetch_profile_after_refresh() {
    let transport = ScriptedTransport::new(|req| match (req.path.as_str(), req.bearer()) {
        ("/auth/refresh/", _) => Reply::Json(200, json!({ "access": "A2" })),
        (PROFILE_PATH, Some("A2")) => Reply::Json(
            200,
            json!({ "user": { "id": 1, "username": "alice", "email": "a@x.com" }, "posted_items": [item(4, "Bag")] }),
        ),
        _ => Reply::Json(401, json!({ "detail": "expired" })),
    });
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));

    let profile = profile::fetch(&client).await.unwrap();

    assert_eq!(profile.user.email, "a@x.com");
    assert_eq!(profile.posted_items.len(), 1);
}

#[tokio::test]
async fn fetch_profile_unauthorized_after_failed_refresh() {
    let transport = ScriptedTransport::new(|_| Reply::Json(401, json!({ "detail": "expired" })));
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));

    let err = profile::fetch(&client).await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthorized { .. }));
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn contact_reporter_posts_json() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(200, json!({ "message": "Email sent successfully!" }))]);
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));
    let message = ContactMessage { item_id: 7, message: "I have your wallet".into(), mail: "owner@x.com".into() };

    contact::send(&client, &message).await.unwrap();

    let sent = &transport.requests()[0];
    assert_eq!(sent.path, CONTACT_PATH);
    assert_eq!(
        sent.body,
        RequestBody::Json(json!({ "item_id": 7, "message": "I have your wallet", "mail": "owner@x.com" }))
    );
}

#[tokio::test]
async fn logout_posts_to_logout_path() {
    let transport = ScriptedTransport::sequence(vec![Reply::Json(200, json!({ "message": "Logout successful!" }))]);
    let client = client_with_tokens(&transport, Some("A1"), Some("R1"));

    let resp = auth::logout(&client).await.unwrap();

    assert_eq!(resp.message.as_deref(), Some("Logout successful!"));
    assert_eq!(transport.requests()[0].path, LOGOUT_PATH);
}
