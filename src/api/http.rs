//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use super::websocket::{handler::ws_handler, state::AppState};
use crate::config::CorsPolicy;

/// Liveness text served at `/`
pub const LIVENESS_TEXT: &str = "✅ Chat backend is live.";

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>, cors: &CorsPolicy) -> Router {
    Router::new()
        // Liveness
        .route("/", get(liveness))
        .route("/health", get(health_check))
        // Relay endpoint
        .route("/ws", get(ws_handler))
        .route("/api/stats", get(stats))
        .layer(cors.layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    clients_total: usize,
    started_at: i64,
}

async fn stats(State(state): State<Arc<AppState>>) -> Json<Stats> {
    Json(Stats {
        clients_total: state.clients_total(),
        started_at: state.started_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, HeaderValue, Request};
    use tower::util::ServiceExt;

    fn app(cors: CorsPolicy) -> (Router, Arc<AppState>) {
        let state = Arc::new(AppState::default());
        (create_router(state.clone(), &cors), state)
    }

    #[tokio::test]
    async fn test_liveness() {
        let (app, _) = app(CorsPolicy::AnyOrigin);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], LIVENESS_TEXT.as_bytes());
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = app(CorsPolicy::AnyOrigin);

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn test_stats_reports_clients_total() {
        let (app, state) = app(CorsPolicy::AnyOrigin);
        let (_id, _inbox) = state.connect();

        let response = app
            .oneshot(Request::builder().uri("/api/stats").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["clientsTotal"], 1);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let (app, _) = app(CorsPolicy::AnyOrigin);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "https://somewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("*"))
        );
    }

    #[tokio::test]
    async fn test_cors_single_origin_echoes_only_a_match() {
        let allowed = HeaderValue::from_static("https://chat.example.com");
        let (app, _) = app(CorsPolicy::Origin(allowed.clone()));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "https://chat.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&allowed)
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "https://elsewhere.example")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
