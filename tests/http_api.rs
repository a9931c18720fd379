use axum::{
    body::{to_bytes, Body},
    extract::Query,
    http::{Request, StatusCode, Uri},
    response::Response,
};
use rust_decimal_macros::dec;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use billboard_pricing::config::Config;
use billboard_pricing::pricing::requests::{ExpiringQuery, PriceLookupQuery};
use billboard_pricing::pricing::PricingMode;
use billboard_pricing::{app, AppState};

fn state() -> AppState {
    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://localhost/billboards_test".to_string(),
        database_max_connections: 1,
        default_currency: "LYD".to_string(),
        default_operating_fee_rate: dec!(3),
        expiring_window_days: 30,
        cache_refresh_secs: 600,
    };
    // Never connects unless a handler touches the database
    let db = PgPoolOptions::new()
        .connect_lazy(&config.database_url)
        .unwrap();

    AppState::new(db, config)
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app(state())
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_cache_stats() {
    let response = app(state())
        .oneshot(Request::get("/health/cache").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_draft_error_body() {
    let body = r#"{"customer_name":"Al Noor","billboard_ids":[],"pricing_category":"عادي"}"#;
    let request = Request::post("/api/contracts")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = app(state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["error_type"], "empty_draft");
    assert_eq!(body["message"], "A contract needs at least one billboard");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_malformed_json_is_a_bad_request() {
    let request = Request::post("/api/pricing/quote")
        .header("content-type", "application/json")
        .body(Body::from("{\"billboard_ids\": ["))
        .unwrap();

    let response = app(state()).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error_type"], "bad_request");
}

#[tokio::test]
async fn test_lookup_without_size_is_a_bad_request() {
    let response = app(state())
        .oneshot(
            Request::get("/api/pricing/lookup?level=A&category=x")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error_type"], "bad_request");
    assert!(body["message"].as_str().unwrap().contains("size"));
}

#[test]
fn test_lookup_query_coerces_bad_numbers() {
    let uri: Uri = "/api/pricing/lookup?size=4x3&level=A&category=x&mode=Monthly&duration=abc"
        .parse()
        .unwrap();
    let Query(query) = Query::<PriceLookupQuery>::try_from_uri(&uri).unwrap();
    assert_eq!(query.duration, 0);
    assert_eq!(query.mode, PricingMode::Months);

    let uri: Uri = "/api/pricing/lookup?size=4x3&level=A&category=x&duration=-1"
        .parse()
        .unwrap();
    let Query(query) = Query::<PriceLookupQuery>::try_from_uri(&uri).unwrap();
    assert_eq!(query.duration, 0);

    let uri: Uri = "/api/pricing/lookup?size=4x3&level=A&category=x".parse().unwrap();
    let Query(query) = Query::<PriceLookupQuery>::try_from_uri(&uri).unwrap();
    assert_eq!(query.duration, 1);
}

#[test]
fn test_expiring_query_coerces_bad_days() {
    let uri: Uri = "/api/contracts/expiring?days=-5".parse().unwrap();
    let Query(query) = Query::<ExpiringQuery>::try_from_uri(&uri).unwrap();
    assert_eq!(query.days, Some(0));

    let uri: Uri = "/api/contracts/expiring?days=14".parse().unwrap();
    let Query(query) = Query::<ExpiringQuery>::try_from_uri(&uri).unwrap();
    assert_eq!(query.days, Some(14));

    let uri: Uri = "/api/contracts/expiring".parse().unwrap();
    let Query(query) = Query::<ExpiringQuery>::try_from_uri(&uri).unwrap();
    assert_eq!(query.days, None);
}
