use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::json;

use genre_recs::api::{create_router, AppState};
use genre_recs::models::{Catalog, CatalogEntry};
use genre_recs::services::{JsonFileStore, RecommendOptions};

fn create_test_server() -> TestServer {
    let state = AppState::new();
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_abc_server() -> TestServer {
    let catalog = Catalog::new(vec![
        CatalogEntry::new("A", ["SciFi", "Drama"]),
        CatalogEntry::new("B", ["Comedy"]),
        CatalogEntry::new("C", ["SciFi"]),
    ])
    .unwrap();
    let state = AppState::with_parts(
        catalog,
        Arc::new(genre_recs::services::InMemoryStore::new()),
        RecommendOptions::default(),
    );
    TestServer::new(create_router(state)).unwrap()
}

async fn create_profile(server: &TestServer, username: &str) {
    server
        .post("/profiles")
        .json(&json!({ "username": username }))
        .await
        .assert_status(StatusCode::CREATED);
}

async fn rate(server: &TestServer, username: &str, title: &str, rating: i64) {
    server
        .put(&format!("/profiles/{}/ratings", username))
        .json(&json!({ "title": title, "rating": rating }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let header = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_supplied_request_id_is_kept() {
    let server = create_test_server();
    let id = "6f1c2b8e-3d4a-4b5c-9e7f-0a1b2c3d4e5f";
    let response = server
        .get("/catalog")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static(id),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("x-request-id"), id);
}

#[tokio::test]
async fn test_malformed_request_id_is_replaced() {
    let server = create_test_server();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("not-a-uuid"),
        )
        .await;

    let header = response.header("x-request-id");
    assert_ne!(header, "not-a-uuid");
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_catalog_and_genres() {
    let server = create_test_server();

    let catalog: Vec<serde_json::Value> = server.get("/catalog").await.json();
    assert_eq!(catalog.len(), 10);
    assert_eq!(catalog[0]["title"], "Stranger Things");

    let genres: Vec<String> = server.get("/genres").await.json();
    assert_eq!(
        genres,
        ["Action", "Comedy", "Crime", "Drama", "Sci-Fi", "Thriller"]
    );
}

#[tokio::test]
async fn test_create_and_get_profile() {
    let server = create_test_server();
    create_profile(&server, "  Alice ").await;

    let response = server.get("/profiles/alice").await;
    response.assert_status_ok();
    let profile: serde_json::Value = response.json();
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["ratings"].as_array().unwrap().len(), 0);

    // Same user again
    server
        .post("/profiles")
        .json(&json!({ "username": "ALICE" }))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invalid_username() {
    let server = create_test_server();
    server
        .post("/profiles")
        .json(&json!({ "username": "a/b" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_profile() {
    let server = create_test_server();
    server
        .get("/profiles/nobody")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/profiles/nobody/recommendations")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rating_lifecycle() {
    let server = create_test_server();
    create_profile(&server, "alice").await;

    // Title is resolved to the canonical spelling
    let response = server
        .put("/profiles/alice/ratings")
        .json(&json!({ "title": "  breaking   bad", "rating": 6 }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["title"], "Breaking Bad");
    assert!(body["previous_rating"].is_null());

    // Changing the rating keeps a single entry
    let body: serde_json::Value = server
        .put("/profiles/alice/ratings")
        .json(&json!({ "title": "Breaking Bad", "rating": 9 }))
        .await
        .json();
    assert_eq!(body["previous_rating"], 6);
    assert_eq!(body["profile"]["ratings"].as_array().unwrap().len(), 1);
    assert_eq!(body["profile"]["ratings"][0]["rating"], 9);

    // Removal
    let response = server.delete("/profiles/alice/ratings/breaking%20bad").await;
    response.assert_status_ok();
    let profile: serde_json::Value = response.json();
    assert!(profile["ratings"].as_array().unwrap().is_empty());

    server
        .delete("/profiles/alice/ratings/Breaking%20Bad")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rating_validation() {
    let server = create_test_server();
    create_profile(&server, "alice").await;

    for bad in [0, 11, -1] {
        server
            .put("/profiles/alice/ratings")
            .json(&json!({ "title": "The Matrix", "rating": bad }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    server
        .put("/profiles/alice/ratings")
        .json(&json!({ "title": "Inception", "rating": 7 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_without_ratings_has_no_recommendations() {
    let server = create_test_server();
    create_profile(&server, "alice").await;

    let response = server.get("/profiles/alice/recommendations").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "no ratings found");
}

#[tokio::test]
async fn test_profile_recommendation_flow() {
    let server = create_test_server();
    create_profile(&server, "alice").await;
    rate(&server, "alice", "Stranger Things", 5).await;
    rate(&server, "alice", "The Office", 4).await;
    rate(&server, "alice", "Interstellar", 5).await;
    rate(&server, "alice", "Parks and Rec", 2).await;

    let response = server.get("/profiles/alice/recommendations").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 5);
    assert_eq!(recs[0]["title"], "Black Mirror");
    assert_eq!(recs[1]["title"], "Severance");
    assert!(recs[0]["explanation"]
        .as_str()
        .unwrap()
        .starts_with("Top matches: Drama"));

    let rated = ["Stranger Things", "The Office", "Interstellar", "Parks and Rec"];
    assert!(recs
        .iter()
        .all(|r| !rated.contains(&r["title"].as_str().unwrap())));

    let total: f64 = body["preference"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["weight"].as_f64().unwrap())
        .sum();
    assert!((total - 1.0).abs() < 1e-9);

    // Query overrides
    let body: serde_json::Value = server
        .get("/profiles/alice/recommendations")
        .add_query_param("top_n", 2)
        .add_query_param("top_k", 1)
        .await
        .json();
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["top_genres"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_stateless_recommendation_round_trip() {
    let server = create_abc_server();

    let response = server
        .post("/recommendations")
        .json(&json!({
            "ratings": [
                { "title": "A", "rating": 10 },
                { "title": "B", "rating": 2 }
            ]
        }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["title"], "C");
    assert!((recs[0]["score"].as_f64().unwrap() - 10.0 / 22.0).abs() < 1e-9);
    assert_eq!(recs[0]["explanation"], "Top matches: SciFi (0.45)");
    assert_eq!(body["preference"][2]["genre"], "Comedy");
}

#[tokio::test]
async fn test_stateless_recommendation_errors() {
    let server = create_abc_server();

    let response = server
        .post("/recommendations")
        .json(&json!({ "ratings": [{ "title": "Inception", "rating": 8 }] }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "no ratings matched the catalog");

    let response = server
        .post("/recommendations")
        .json(&json!({
            "ratings": [
                { "title": "A", "rating": 1 },
                { "title": "B", "rating": 1 },
                { "title": "C", "rating": 1 }
            ]
        }))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "nothing left to recommend");

    server
        .post("/recommendations")
        .json(&json!({ "ratings": [{ "title": "A", "rating": 5 }], "top_n": 0 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profiles_persist_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let state = AppState::with_parts(Catalog::builtin(), store, RecommendOptions::default());
    let server = TestServer::new(create_router(state)).unwrap();

    create_profile(&server, "carol").await;
    rate(&server, "carol", "The Matrix", 8).await;

    let raw = std::fs::read_to_string(dir.path().join("carol.json")).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        saved,
        json!({ "username": "carol", "ratings": [{ "title": "The Matrix", "rating": 8 }] })
    );
}
