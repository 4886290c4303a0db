mod common;

use axum_test::TestServer;
use serde_json::json;
use shortcut::domain::repositories::UrlRepository;

fn server() -> (TestServer, shortcut::infrastructure::persistence::InMemoryStore) {
    let (state, _rx, store) = common::create_test_state();
    (TestServer::new(common::test_app(state)).unwrap(), store)
}

#[tokio::test]
async fn test_create_short_url_success() {
    let (server, _store) = server();

    let response = server
        .post("/api/urls")
        .json(&json!({ "original_url": "https://example.com/some/long/path" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    let code = json["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 7);
    assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(json["short_url"], format!("{}/{code}", common::BASE_URL));
    assert_eq!(json["original_url"], "https://example.com/some/long/path");
    assert!(json["expires_at"].is_null());

    assert_eq!(response.header("location"), format!("/api/urls/{code}"));
}

#[tokio::test]
async fn test_create_short_url_with_custom_code() {
    let (server, _store) = server();

    let response = server
        .post("/api/urls")
        .json(&json!({
            "original_url": "https://example.com",
            "custom_code": "promo_24"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["short_code"], "promo_24");
    assert_eq!(json["short_url"], "https://sho.rt/promo_24");
}

#[tokio::test]
async fn test_same_url_returns_existing_code() {
    let (server, _store) = server();
    let body = json!({ "original_url": "https://example.com/dedupe" });

    let first = server.post("/api/urls").json(&body).await;
    let second = server.post("/api/urls").json(&body).await;

    let first = first.json::<serde_json::Value>();
    let second = second.json::<serde_json::Value>();
    assert_eq!(first["short_code"], second["short_code"]);
}

#[tokio::test]
async fn test_custom_code_conflict() {
    let (server, store) = server();
    common::insert_url(&store, "taken", "https://example.com/a", None).await;

    let response = server
        .post("/api/urls")
        .json(&json!({
            "original_url": "https://example.com/b",
            "custom_code": "taken"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CONFLICT);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "conflict");
}

#[tokio::test]
async fn test_invalid_url_rejected() {
    let (server, _store) = server();

    for url in ["not a url", "/relative/path", "example.com", ""] {
        let response = server
            .post("/api/urls")
            .json(&json!({ "original_url": url }))
            .await;

        response.assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_non_web_scheme_accepted() {
    let (server, _store) = server();

    let response = server
        .post("/api/urls")
        .json(&json!({ "original_url": "ftp://files.example.com/a.zip" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["original_url"], "ftp://files.example.com/a.zip");

    let code = json["short_code"].as_str().unwrap();
    let redirect = server.get(&format!("/{code}")).await;
    assert_eq!(redirect.status_code(), 307);
    assert_eq!(redirect.header("location"), "ftp://files.example.com/a.zip");
}

#[tokio::test]
async fn test_invalid_custom_code_rejected() {
    let (server, _store) = server();

    for code in ["has space", "elevenchars", "a/b", "api"] {
        let response = server
            .post("/api/urls")
            .json(&json!({
                "original_url": "https://example.com",
                "custom_code": code
            }))
            .await;

        response.assert_status_bad_request();
    }
}

#[tokio::test]
async fn test_create_with_expiry() {
    let (server, _store) = server();

    let response = server
        .post("/api/urls")
        .json(&json!({
            "original_url": "https://example.com/expiring",
            "expires_at": "2099-01-01T00:00:00Z"
        }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["expires_at"], "2099-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_delete_short_url() {
    let (server, store) = server();
    common::insert_url(&store, "gone1", "https://example.com", None).await;

    let response = server.delete("/api/urls/gone1").await;
    response.assert_status(axum::http::StatusCode::NO_CONTENT);

    assert!(store.get_by_code("gone1").await.unwrap().is_none());
    assert!(store.exists_by_code("gone1").await.unwrap());

    server.get("/gone1").await.assert_status_not_found();
    server
        .delete("/api/urls/gone1")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_deactivated_url_is_not_reused_for_dedupe() {
    let (server, _store) = server();
    let body = json!({ "original_url": "https://example.com/again" });

    let first = server.post("/api/urls").json(&body).await;
    let first_code = first.json::<serde_json::Value>()["short_code"]
        .as_str()
        .unwrap()
        .to_string();

    server
        .delete(&format!("/api/urls/{first_code}"))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    let second = server.post("/api/urls").json(&body).await;
    let second = second.json::<serde_json::Value>();
    assert_ne!(second["short_code"], first_code.as_str());
}
