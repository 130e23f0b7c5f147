//! `FetchClient` and `HttpSource` against a local upstream.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use search_core::catalog::SourceLabel;
use search_data::{gather, CatalogSource, FetchClient, FetchError, HttpSource, SourceStatus};
use serde_json::{json, Value};

async fn spawn_upstream() -> String {
    let app = Router::new()
        .route("/bare", get(|| async { Json(json!([{"id": 1}, {"id": 2}])) }))
        .route(
            "/paginated",
            get(|| async { Json(json!({"count": 1, "next": null, "results": [{"id": "a"}]})) }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/garbage", get(|| async { "<html>not json</html>" }))
        .route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!([]))
            }),
        )
        .route(
            "/auth",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(json!([{"id": 1, "name": auth}]))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn source(base: &str, path: &str) -> HttpSource {
    HttpSource::new(
        SourceLabel::catalog(path.trim_start_matches('/')),
        format!("{}{}", base, path),
        FetchClient::new().unwrap(),
    )
}

#[tokio::test]
async fn decodes_both_list_shapes() {
    let base = spawn_upstream().await;
    assert_eq!(source(&base, "/bare").fetch().await.unwrap().len(), 2);
    assert_eq!(
        source(&base, "/paginated").fetch().await.unwrap(),
        vec![json!({"id": "a"})]
    );
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let base = spawn_upstream().await;
    let err = source(&base, "/broken").fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 500, .. }));
}

#[tokio::test]
async fn malformed_body_is_an_error() {
    let base = spawn_upstream().await;
    let err = source(&base, "/garbage").fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Deserialization(_)));
}

#[tokio::test]
async fn request_timeout_is_reported() {
    let base = spawn_upstream().await;
    let client = FetchClient::new().unwrap();
    let err = client
        .get_json::<Value>(&format!("{}/slow", base), Duration::from_millis(100), None)
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::Timeout(Duration::from_millis(100)));
}

#[tokio::test]
async fn bearer_token_is_forwarded() {
    let base = spawn_upstream().await;
    let records = source(&base, "/auth")
        .with_auth_token("opaque-token")
        .fetch()
        .await
        .unwrap();
    assert_eq!(records[0]["name"], "Bearer opaque-token");
}

#[tokio::test]
async fn gather_keeps_healthy_sources() {
    let base = spawn_upstream().await;
    let sources: Vec<Arc<dyn CatalogSource>> = vec![
        Arc::new(source(&base, "/broken")),
        Arc::new(source(&base, "/slow").with_timeout(Duration::from_millis(100))),
        Arc::new(source(&base, "/bare")),
    ];

    let fetched = gather(&sources).await;
    assert!(!fetched[0].status.is_ok());
    assert!(!fetched[1].status.is_ok());
    assert_eq!(fetched[2].status, SourceStatus::Ok);
    assert_eq!(fetched[2].records.len(), 2);
}

#[tokio::test]
async fn connection_refused_is_an_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = FetchClient::new()
        .unwrap()
        .get_json::<Value>(&format!("http://{}/", addr), Duration::from_secs(1), None)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Connection(_) | FetchError::Request(_)));
}
