//! API integration tests against a running server

use reqwest::Client;
use serde_json::{json, Value};
use uuid::Uuid;

const BASE_URL: &str = "http://localhost:3000/api/v1";

/// Register a fresh account and return its email
async fn register(client: &Client) -> String {
    let email = format!("reader-{}@example.org", Uuid::new_v4());
    let response = client
        .post(format!("{}/users", BASE_URL))
        .json(&json!({
            "email": email,
            "name": "Reader",
            "password": "hunter22"
        }))
        .send()
        .await
        .expect("Failed to send registration request");
    assert_eq!(response.status(), 201);
    email
}

async fn create(client: &Client, path: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}{}", BASE_URL, path))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success(), "POST {} failed", path);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login_and_profile() {
    let client = Client::new();
    let email = register(&client).await;

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": email,
            "password": "hunter22"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["token_type"], "Bearer");
    let token = body["token"].as_str().expect("No token in response");

    let profile: Value = client
        .get(format!("{}/users/profile", BASE_URL))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(profile["email"], email.as_str());
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "email": "nobody@example.org",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_author_delete_is_blocked_by_books() {
    let client = Client::new();

    let author = create(
        &client,
        "/catalog/authors",
        json!({ "first_name": "Jane", "family_name": "Austen" }),
    )
    .await;
    let author_id = author["id"].as_str().expect("No author id");

    let book = create(
        &client,
        "/catalog/books",
        json!({
            "title": "Emma",
            "author": author_id,
            "summary": "Matchmaking in Highbury",
            "isbn": "9780141439587"
        }),
    )
    .await;

    let response = client
        .post(format!("{}/catalog/authors/{}/delete", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 409);

    let book_id = book["id"].as_str().expect("No book id");
    for path in [
        format!("/catalog/books/{}/delete", book_id),
        format!("/catalog/authors/{}/delete", author_id),
    ] {
        let response = client
            .post(format!("{}{}", BASE_URL, path))
            .send()
            .await
            .expect("Failed to send request");
        assert!(response.status().is_success());
    }
}

#[tokio::test]
#[ignore]
async fn test_dashboard() {
    let client = Client::new();

    let response = client
        .get(format!("{}/catalog", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    for key in ["books", "instances", "available", "genres", "authors"] {
        assert!(body[key].is_i64(), "missing {}", key);
    }
}
