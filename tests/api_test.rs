mod common;

use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use axum::Router;
use common::fixture;
use common::FixtureOptions;
use jejurag::api::build_router;
use jejurag::api::AppState;
use serde_json::json;
use serde_json::Value;
use tower::ServiceExt;

fn router(options: FixtureOptions) -> Router {
    let fx = fixture(options).expect("fixture");
    build_router(AppState { rag: fx.service }, false)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_unbuilt_index() {
    let (status, body) = send(router(FixtureOptions::default()), get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["index_built"], false);
}

#[tokio::test]
async fn test_init_builds_index() {
    let app = router(FixtureOptions::default());

    let (status, body) = send(app.clone(), post("/api/init", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["documents"], 6);

    let (_, body) = send(app, get("/api/health")).await;
    assert_eq!(body["data"]["index_built"], true);
}

#[tokio::test]
async fn test_search_returns_ranked_hits() {
    let (status, body) = send(
        router(FixtureOptions::default()),
        post("/api/search", json!({"query": "바다 카페", "limit": 2})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let hits = body["data"].as_array().expect("hit list");
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["name"], "협재 해변");
    assert_eq!(hits[1]["name"], "좌표없는 카페");
}

#[tokio::test]
async fn test_blank_search_is_bad_request() {
    let (status, body) = send(
        router(FixtureOptions::default()),
        post("/api/search", json!({"query": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_chat_answers_with_places() {
    let (status, body) = send(
        router(FixtureOptions::default()),
        post("/api/chat", json!({"message": "바다 카페"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["answer"], "맑은 날에는 협재 해변을 추천합니다.");
    let places = body["data"]["places"].as_array().expect("places");
    assert_eq!(places.len(), 5);
    assert_eq!(places[0]["region_label"], "한림");
    assert_eq!(places[0]["weather"]["temperature"], 23);
    assert!(places[1]["weather"].is_null());
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let (status, body) = send(
        router(FixtureOptions::default()),
        post("/api/chat", json!({"message": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_chat_generation_failure_is_unavailable() {
    let (status, body) = send(
        router(FixtureOptions {
            fail_generation: true,
            ..FixtureOptions::default()
        }),
        post("/api/chat", json!({"message": "바다 카페"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap_or_default().contains("quota"));
}

#[tokio::test]
async fn test_weather_defaults_to_city_hall() {
    let (status, body) = send(router(FixtureOptions::default()), get("/api/weather")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["latitude"], 33.4996);
    assert_eq!(body["data"]["longitude"], 126.5312);
    assert_eq!(body["data"]["weather"]["description"], "맑음");
    assert_eq!(
        body["data"]["recommendation"],
        "맑은 날씨라 야외 활동, 해변, 오름 트레킹을 추천합니다."
    );
}

#[tokio::test]
async fn test_weather_requires_both_coordinates() {
    let (status, _) = send(router(FixtureOptions::default()), get("/api/weather?lat=33.5")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_weather_rejects_out_of_range_coordinates() {
    let (status, _) = send(
        router(FixtureOptions::default()),
        get("/api/weather?lat=133.5&lon=126.5"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_weather_provider_failure_is_unavailable() {
    let (status, _) = send(
        router(FixtureOptions {
            fail_weather_latitudes: vec![33.5],
            ..FixtureOptions::default()
        }),
        get("/api/weather"),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
