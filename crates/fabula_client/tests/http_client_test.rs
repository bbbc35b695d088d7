//! Tests for the HTTP story client against a local server.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use fabula_client::{ClientConfig, HttpStoryClient};
use fabula_core::{Author, ContinueRequest, StoryId, StoryMode};
use fabula_error::FabulaErrorKind;
use fabula_interface::StoryApi;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::time::Duration;

async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn story_app() -> Router {
    Router::new()
        .route(
            "/story/create",
            post(|| async { Json(json!({"story_id": "s1"})) }),
        )
        .route(
            "/story/continue",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "story_id": body["story_id"],
                    "new_turns": [
                        {
                            "story_id": body["story_id"],
                            "turn": 1,
                            "author": "human",
                            "text": body["user_text"],
                            "flow_score": 1.4,
                            "entropy_score": -0.2
                        },
                        {
                            "story_id": body["story_id"],
                            "turn": 2,
                            "author": "ai",
                            "text": format!("{} rounds in {}", body["rounds"], body["mode"].as_str().unwrap_or("?"))
                        }
                    ]
                }))
            }),
        )
        .route(
            "/story/static-data",
            get(|| async { Json(json!({"rivers": [1, 2, 3]})) }),
        )
        .route(
            "/story/:story_id",
            get(|Path(story_id): Path<String>| async move {
                if story_id == "missing" {
                    return Err((
                        StatusCode::NOT_FOUND,
                        Json(json!({"detail": "story not found"})),
                    ));
                }
                Ok(Json(json!({
                    "story_id": story_id,
                    "turns": [
                        {"story_id": story_id, "turn": 1, "author": "human", "text": "first"}
                    ]
                })))
            }),
        )
        .route(
            "/metrics/compare",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                Json(json!({"story_id": params.get("story_id"), "points": []}))
            }),
        )
}

async fn client_for(app: Router) -> HttpStoryClient {
    let base_url = spawn_server(app).await;
    HttpStoryClient::new(ClientConfig::new(base_url, "ws://unused")).unwrap()
}

#[tokio::test]
async fn test_create_story() {
    let client = client_for(story_app()).await;
    let response = client.create_story().await.unwrap();
    assert_eq!(response.story_id, StoryId::from("s1"));
}

#[tokio::test]
async fn test_continue_story_sends_wire_fields() {
    let client = client_for(story_app()).await;
    let request = ContinueRequest {
        story_id: StoryId::from("s1"),
        user_text: "hi".to_string(),
        rounds: 3,
        mode: StoryMode::AiOnly,
    };

    let response = client.continue_story(&request).await.unwrap();

    assert_eq!(response.new_turns.len(), 2);
    assert_eq!(response.new_turns[0].text, "hi");
    assert_eq!(response.new_turns[0].author, Author::Human);
    assert_eq!(response.new_turns[0].flow_score, Some(1.4));
    assert_eq!(response.new_turns[1].text, "3 rounds in ai_only");
}

#[tokio::test]
async fn test_get_story() {
    let client = client_for(story_app()).await;
    let response = client.get_story(&StoryId::from("abc")).await.unwrap();

    assert_eq!(response.story_id, Some(StoryId::from("abc")));
    assert_eq!(response.turns.len(), 1);
    assert_eq!(response.turns[0].text, "first");
}

#[tokio::test]
async fn test_story_id_stays_one_path_segment() {
    let client = client_for(story_app()).await;
    let response = client.get_story(&StoryId::from("a/b?c")).await.unwrap();

    assert_eq!(response.story_id, Some(StoryId::from("a/b?c")));
}

#[tokio::test]
async fn test_not_found_surfaces_status_and_detail() {
    let client = client_for(story_app()).await;
    let err = client.get_story(&StoryId::from("missing")).await.unwrap_err();

    match err.kind() {
        FabulaErrorKind::Http(http) => {
            assert_eq!(http.status, Some(404));
            assert_eq!(http.message, "story not found");
        }
        other => panic!("Expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_static_data_and_compare() {
    let client = client_for(story_app()).await;

    let data = client.static_data().await.unwrap();
    assert_eq!(data["rivers"], json!([1, 2, 3]));

    let compare = client.compare(&StoryId::from("s9")).await.unwrap();
    assert_eq!(compare["story_id"], "s9");
}

#[tokio::test]
async fn test_non_json_body_is_json_error() {
    let app = Router::new().route("/story/create", post(|| async { "definitely not json" }));
    let client = client_for(app).await;

    let err = client.create_story().await.unwrap_err();
    assert!(matches!(err.kind(), FabulaErrorKind::Json(_)));
}

#[tokio::test]
async fn test_timeout_is_http_error() {
    let app = Router::new().route(
        "/story/create",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"story_id": "late"}))
        }),
    );
    let base_url = spawn_server(app).await;
    let client = HttpStoryClient::new(
        ClientConfig::new(base_url, "ws://unused").with_timeout(Duration::from_millis(100)),
    )
    .unwrap();

    let err = client.create_story().await.unwrap_err();
    match err.kind() {
        FabulaErrorKind::Http(http) => {
            assert!(http.message.contains("timed out"));
            assert_eq!(http.status, None);
        }
        other => panic!("Expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    // Bind and drop a listener to find a port nobody is serving on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        HttpStoryClient::new(ClientConfig::new(format!("http://{}", addr), "ws://unused")).unwrap();
    let err = client.create_story().await.unwrap_err();
    assert!(matches!(err.kind(), FabulaErrorKind::Http(_)));
}
