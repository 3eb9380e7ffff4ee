//! Axum router construction.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware::Limits, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, limits: Limits) -> Router {
    Router::new()
        .route("/seal", post(handlers::seal))
        .route("/open", post(handlers::open))
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(limits.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(limits.request_timeout))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use gencrypt::Galois;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(Galois::new(&[0x42u8; 32]).unwrap())
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = build(test_state(), Limits::default());
        let req = Request::builder()
            .uri("/unknown")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn health_reports_algorithm_and_key_id() {
        let state = test_state();
        let key_id = state.galois.key_id().to_owned();
        let app = build(state, Limits::default());
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 200);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["algorithm"], "aes-256-gcm");
        assert_eq!(body["key_id"], key_id);
    }

    async fn read_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn empty_seal_request_gets_json_error() {
        let app = build(test_state(), Limits::default());
        let req = Request::builder()
            .method("POST")
            .uri("/seal")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 400);
        let body = read_json(resp).await;
        assert_eq!(body["code"], "bad_request");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn oversized_body_rejected() {
        let limits = Limits {
            max_body_bytes: 16,
            ..Limits::default()
        };
        let app = build(test_state(), limits);
        let body = format!(r#"{{"plaintext":"{}"}}"#, "A".repeat(64));
        let req = Request::builder()
            .method("POST")
            .uri("/seal")
            .header("content-type", "application/json")
            .header("content-length", body.len())
            .body(Body::from(body))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), 413);
        let body = read_json(resp).await;
        assert_eq!(body["code"], "payload_too_large");
    }
}
