//! JSON HTTP surface.
//!
//! Responses keep the `{success, data, ...}` envelope existing storefront
//! clients already parse.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use search_core::catalog::NormalizedProduct;
use search_core::search::{Facet, Pagination, QueryParams, QuerySpec, SuggestionEntry};

use crate::service::{SearchService, SourceReport};

const SERVICE_NAME: &str = "search-service";

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<SearchService>,
    started: Instant,
}

impl AppState {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self {
            service,
            started: Instant::now(),
        }
    }
}

/// Build the router with tracing and permissive CORS.
pub fn router(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/search/", get(search))
        .route("/api/search/suggestions", get(suggestions))
        .route("/health", get(health))
        .route("/ping", get(ping))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(service))
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn serve(
    listener: tokio::net::TcpListener,
    service: Arc<SearchService>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, sources = service.source_count(), "search service listening");
    }
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Wait for Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    success: bool,
    data: Vec<NormalizedProduct>,
    pagination: Pagination,
    total: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    facets: Vec<Facet>,
    sources: Vec<SourceReport>,
}

#[derive(Debug, Serialize)]
struct SuggestionsResponse {
    success: bool,
    data: Vec<SuggestionEntry>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ErrorResponse {
        success: false,
        error: message.into(),
    };
    (status, Json(body)).into_response()
}

async fn search(State(state): State<AppState>, Query(mut params): Query<QueryParams>) -> Response {
    let limit_missing = params.get("limit").map_or(true, |v| v.trim().is_empty());
    if limit_missing {
        params.insert("limit".into(), state.service.default_page_size().to_string());
    }

    let query = match QuerySpec::from_params(&params) {
        Ok(query) => query,
        Err(e) => {
            tracing::debug!(error = %e, "rejected search parameters");
            return error(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match state.service.search(&query).await {
        Ok(outcome) => {
            let result = outcome.result;
            Json(SearchResponse {
                success: true,
                data: result.products,
                pagination: result.pagination,
                total: result.total,
                facets: result.facets,
                sources: outcome.sources,
            })
            .into_response()
        }
        Err(e) if !e.is_recoverable() => error(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "search failed");
            error(StatusCode::INTERNAL_SERVER_ERROR, "search failed")
        }
    }
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    #[serde(default)]
    q: Option<String>,
}

async fn suggestions(State(state): State<AppState>, Query(params): Query<SuggestParams>) -> Response {
    let Some(q) = params.q.filter(|q| !q.trim().is_empty()) else {
        return error(StatusCode::BAD_REQUEST, "query parameter 'q' is required");
    };

    let outcome = state.service.suggest(&q).await;
    Json(SuggestionsResponse {
        success: true,
        data: outcome.suggestions,
    })
    .into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    uptime_seconds: u64,
    timestamp: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
struct PingResponse {
    message: &'static str,
    timestamp: String,
}

async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        message: "pong",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "not found")
}
