//! Integration tests for the contact endpoints and owner scoping.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::{Value, json};

use contact_book_core::{ContactId, Email, UserId};
use contact_book_integration_tests::TestServer;
use contact_book_server::db::{ContactRepository, MemoryStore, RepositoryError, UserRepository};
use contact_book_server::models::{Contact, ContactDraft, NewUser, User};

async fn register(server: &TestServer, name: &str, email: &str) -> String {
    let resp = server.register(name, email, "secret1").await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    body["token"].as_str().unwrap().to_owned()
}

async fn list(server: &TestServer, token: &str) -> Vec<Value> {
    let resp = server
        .client()
        .get(server.url("/api/contacts"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

async fn create(server: &TestServer, token: &str, body: &Value) -> reqwest::Response {
    server
        .client()
        .post(server.url("/api/contacts"))
        .bearer_auth(token)
        .json(body)
        .send()
        .await
        .unwrap()
}

fn bo() -> Value {
    json!({ "name": "Bo", "email": "bo@x.com", "phone": "555", "category": "work" })
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_example_flow() {
    let server = TestServer::spawn().await.unwrap();
    let token = register(&server, "Al", "al@x.com").await;

    let resp = create(&server, &token, &bo()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let contact: Value = resp.json().await.unwrap();
    assert_eq!(contact["category"], "work");
    assert_eq!(contact["name"], "Bo");

    let listed = list(&server, &token).await;
    assert_eq!(listed, vec![contact.clone()]);

    let resp = server
        .client()
        .delete(server.url(&format!("/api/contacts/{}", contact["_id"])))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let ack: Value = resp.json().await.unwrap();
    assert_eq!(ack, json!({ "message": "Contact deleted" }));

    assert!(list(&server, &token).await.is_empty());
}

#[tokio::test]
async fn test_contact_json_shape() {
    let server = TestServer::spawn().await.unwrap();
    let token = register(&server, "Al", "al@x.com").await;
    let user_id = server.keys().verify(&token).unwrap().user_id;

    let contact: Value = create(&server, &token, &bo()).await.json().await.unwrap();
    for key in [
        "_id",
        "user",
        "name",
        "email",
        "phone",
        "category",
        "createdAt",
        "updatedAt",
    ] {
        assert!(contact.get(key).is_some(), "missing {key}");
    }
    assert_eq!(contact["user"], json!(user_id.as_i32()));
}

#[tokio::test]
async fn test_create_defaults_category_to_personal() {
    let server = TestServer::spawn().await.unwrap();
    let token = register(&server, "Al", "al@x.com").await;

    let body = json!({ "name": "Bo", "email": "bo@x.com", "phone": "555" });
    let contact: Value = create(&server, &token, &body).await.json().await.unwrap();
    assert_eq!(contact["category"], "personal");
}

#[tokio::test]
async fn test_create_ignores_client_supplied_owner() {
    let server = TestServer::spawn().await.unwrap();
    let al = register(&server, "Al", "al@x.com").await;
    let cy = register(&server, "Cy", "cy@x.com").await;
    let cy_id = server.keys().verify(&cy).unwrap().user_id;

    let mut body = bo();
    body["user"] = json!(cy_id.as_i32());
    let contact: Value = create(&server, &al, &body).await.json().await.unwrap();

    assert_ne!(contact["user"], json!(cy_id.as_i32()));
    assert!(list(&server, &cy).await.is_empty());
    assert_eq!(list(&server, &al).await.len(), 1);
}

#[tokio::test]
async fn test_create_validation() {
    let server = TestServer::spawn().await.unwrap();
    let token = register(&server, "Al", "al@x.com").await;

    let resp = create(&server, &token, &json!({ "name": "Bo", "email": "bo@x.com" })).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "phone is required");

    let mut friend = bo();
    friend["category"] = json!("friend");
    let resp = create(&server, &token, &friend).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(list(&server, &token).await.is_empty());
}

#[tokio::test]
async fn test_update_then_list_reflects_patch() {
    let server = TestServer::spawn().await.unwrap();
    let token = register(&server, "Al", "al@x.com").await;
    let contact: Value = create(&server, &token, &bo()).await.json().await.unwrap();

    let resp = server
        .client()
        .put(server.url(&format!("/api/contacts/{}", contact["_id"])))
        .bearer_auth(&token)
        .json(&json!({ "phone": "556", "category": "family" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["_id"], contact["_id"]);
    assert_eq!(updated["name"], "Bo");
    assert_eq!(updated["phone"], "556");
    assert_eq!(updated["category"], "family");

    assert_eq!(list(&server, &token).await, vec![updated]);
}

#[tokio::test]
async fn test_update_rejects_blanking_required_field() {
    let server = TestServer::spawn().await.unwrap();
    let token = register(&server, "Al", "al@x.com").await;
    let contact: Value = create(&server, &token, &bo()).await.json().await.unwrap();

    let resp = server
        .client()
        .put(server.url(&format!("/api/contacts/{}", contact["_id"])))
        .bearer_auth(&token)
        .json(&json!({ "email": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(list(&server, &token).await, vec![contact]);
}

#[tokio::test]
async fn test_list_keeps_insertion_order() {
    let server = TestServer::spawn().await.unwrap();
    let token = register(&server, "Al", "al@x.com").await;

    for name in ["Cy", "Ab", "Bo"] {
        let body = json!({ "name": name, "email": "x@x.com", "phone": "1" });
        assert_eq!(
            create(&server, &token, &body).await.status(),
            StatusCode::CREATED
        );
    }

    let names: Vec<Value> = list(&server, &token)
        .await
        .into_iter()
        .map(|c| c["name"].clone())
        .collect();
    assert_eq!(names, vec![json!("Cy"), json!("Ab"), json!("Bo")]);
}

// ============================================================================
// Ownership
// ============================================================================

#[tokio::test]
async fn test_contacts_are_invisible_to_other_users() {
    let server = TestServer::spawn().await.unwrap();
    let al = register(&server, "Al", "al@x.com").await;
    let cy = register(&server, "Cy", "cy@x.com").await;
    let contact: Value = create(&server, &al, &bo()).await.json().await.unwrap();
    let path = format!("/api/contacts/{}", contact["_id"]);

    assert!(list(&server, &cy).await.is_empty());

    let resp = server
        .client()
        .put(server.url(&path))
        .bearer_auth(&cy)
        .json(&json!({ "name": "Stolen" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Contact not found");

    let resp = server
        .client()
        .delete(server.url(&path))
        .bearer_auth(&cy)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(list(&server, &al).await, vec![contact]);
}

#[tokio::test]
async fn test_malformed_contact_id_is_not_found() {
    let server = TestServer::spawn().await.unwrap();
    let token = register(&server, "Al", "al@x.com").await;

    let resp = server
        .client()
        .delete(server.url("/api/contacts/64b7f0c2e1a4"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_for_vanished_user_is_not_found() {
    let server = TestServer::spawn().await.unwrap();
    let token = server.keys().issue(UserId::new(404)).unwrap();

    let resp = create(&server, &token, &bo()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "User not found" }));

    assert!(list(&server, &token).await.is_empty());
}

// ============================================================================
// Access gate
// ============================================================================

/// Store that counts every call before delegating to a [`MemoryStore`].
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepository for CountingStore {
    async fn create(&self, new_user: NewUser<'_>) -> Result<User, RepositoryError> {
        self.touch();
        self.inner.create(new_user).await
    }

    async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        self.touch();
        self.inner.get_with_password_hash(email).await
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        self.touch();
        self.inner.get_by_id(id).await
    }

    async fn update_profile(
        &self,
        id: UserId,
        name: Option<&str>,
        email: Option<&Email>,
    ) -> Result<Option<User>, RepositoryError> {
        self.touch();
        self.inner.update_profile(id, name, email).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.touch();
        self.inner.ping().await
    }
}

#[async_trait]
impl ContactRepository for CountingStore {
    async fn list(&self, owner: UserId) -> Result<Vec<Contact>, RepositoryError> {
        self.touch();
        self.inner.list(owner).await
    }

    async fn insert(
        &self,
        owner: UserId,
        draft: &ContactDraft,
    ) -> Result<Contact, RepositoryError> {
        self.touch();
        self.inner.insert(owner, draft).await
    }

    async fn get(&self, id: ContactId, owner: UserId) -> Result<Option<Contact>, RepositoryError> {
        self.touch();
        self.inner.get(id, owner).await
    }

    async fn update(
        &self,
        id: ContactId,
        owner: UserId,
        draft: &ContactDraft,
    ) -> Result<Option<Contact>, RepositoryError> {
        self.touch();
        self.inner.update(id, owner, draft).await
    }

    async fn delete(&self, id: ContactId, owner: UserId) -> Result<bool, RepositoryError> {
        self.touch();
        self.inner.delete(id, owner).await
    }
}

#[tokio::test]
async fn test_unauthenticated_requests_never_reach_the_store() {
    let store = CountingStore::default();
    let calls = Arc::clone(&store.calls);
    let server = TestServer::spawn_with(store).await.unwrap();

    let expired = server
        .keys()
        .issue_at(UserId::new(1), Utc::now() - Duration::hours(25))
        .unwrap();

    let client = server.client();
    let requests = [
        client.get(server.url("/api/contacts")),
        client.post(server.url("/api/contacts")).json(&bo()),
        client
            .put(server.url("/api/contacts/1"))
            .json(&json!({ "name": "X" })),
        client.delete(server.url("/api/contacts/1")),
        client.get(server.url("/api/contacts")).bearer_auth(&expired),
        client
            .post(server.url("/api/contacts"))
            .bearer_auth(&expired)
            .json(&bo()),
        client
            .delete(server.url("/api/contacts/1"))
            .bearer_auth("garbage"),
    ];

    for request in requests {
        let resp = request.send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = resp.json().await.unwrap();
        assert!(
            body["message"] == "No token provided" || body["message"] == "Invalid token",
            "unexpected body {body}"
        );
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_auth_is_checked_before_body_parsing() {
    let server = TestServer::spawn().await.unwrap();

    let resp = server
        .client()
        .post(server.url("/api/contacts"))
        .header("content-type", "application/json")
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
