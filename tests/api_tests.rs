use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use cinematch_api::{
    models::{CorpusEntry, TagDocument},
    routes::{create_router, AppState},
    services::{PosterProvider, RecommendationIndex, PLACEHOLDER_POSTER},
};

/// Deterministic poster per title
struct FakePosters;

#[async_trait::async_trait]
impl PosterProvider for FakePosters {
    async fn resolve(&self, title: &str) -> String {
        if title == "Titanic" {
            return PLACEHOLDER_POSTER.to_string();
        }
        format!("https://posters.test/{}.jpg", title.replace(' ', "_"))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

fn entry(id: u64, title: &str, tags: &str) -> CorpusEntry {
    CorpusEntry {
        id,
        title: title.to_string(),
        tags: TagDocument::new(tags),
    }
}

fn create_test_server() -> TestServer {
    let index = RecommendationIndex::from_entries(
        vec![
            entry(1, "Avatar", "marin alien moon jamescameron sciencefict"),
            entry(2, "Aliens", "marin alien coloni jamescameron sciencefict"),
            entry(3, "Titanic", "romanc ship sea jamescameron drama"),
            entry(4, "The Avengers", "hero alien invas marvel"),
            entry(5, "Avengers: Age of Ultron", "hero robot marvel"),
        ],
        5000,
    )
    .unwrap();

    let state = Arc::new(AppState {
        index: Arc::new(index),
        poster_provider: Arc::new(FakePosters),
        poster_timeout: Duration::from_secs(1),
        default_top_n: 6,
    });
    TestServer::new(create_router(state)).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["movies"], 5);
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let server = create_test_server();
    let response = server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_recommend_exact_match() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("q", "avatar")
        .add_query_param("top_n", 3)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "found");
    assert_eq!(body["match_kind"], "exact");
    assert_eq!(body["matched_title"], "Avatar");

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["title"], "Aliens");
    assert_eq!(results[0]["poster"], "https://posters.test/Aliens.jpg");
    assert_eq!(results[1]["title"], "The Avengers");
    assert_eq!(results[1]["poster"], "https://posters.test/The_Avengers.jpg");
    assert_eq!(results[2]["title"], "Titanic");
    assert_eq!(results[2]["poster"], PLACEHOLDER_POSTER);
}

#[tokio::test]
async fn test_recommend_default_top_n_excludes_query() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("q", "Aliens")
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["title"] != "Aliens"));
}

#[tokio::test]
async fn test_recommend_substring_match() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("q", "ultron")
        .add_query_param("top_n", 1)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["match_kind"], "substring");
    assert_eq!(body["matched_title"], "Avengers: Age of Ultron");
    assert_eq!(body["results"][0]["title"], "The Avengers");
}

#[tokio::test]
async fn test_recommend_not_found() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("q", "Zardoz")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["status"], "not_found");
    assert_eq!(body["query"], "Zardoz");
}

#[tokio::test]
async fn test_recommend_rejects_blank_query() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("q", "   ")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommend_rejects_huge_top_n() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/recommendations")
        .add_query_param("q", "Avatar")
        .add_query_param("top_n", 500)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_suggest_orders_prefix_matches_first() {
    let server = create_test_server();
    let response = server.get("/api/v1/suggest").add_query_param("q", "aven").await;

    response.assert_status_ok();
    let suggestions: Vec<String> = response.json();
    assert_eq!(suggestions, vec!["Avengers: Age of Ultron", "The Avengers"]);
}

#[tokio::test]
async fn test_suggest_empty_prefix() {
    let server = create_test_server();
    let response = server.get("/api/v1/suggest").await;

    response.assert_status_ok();
    let suggestions: Vec<String> = response.json();
    assert!(suggestions.is_empty());
}
