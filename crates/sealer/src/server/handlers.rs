//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::protocol::{
    ErrorResponse, HealthResponse, OpenRequest, OpenResponse, SealRequest, SealResponse,
};
use common::ServiceError;
use gencrypt::{armor, CipherError, Galois};
use tracing::{debug, warn, Level};

use super::state::AppState;

/// `POST /seal` - seal base64 plaintext, returning the armored payload.
pub async fn seal(
    State(state): State<AppState>,
    payload: Result<Json<SealRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => return error_response(rejection_error(rejection)),
    };
    match seal_payload(&state.galois, &req) {
        Ok(sealed) => (StatusCode::OK, Json(SealResponse { sealed })).into_response(),
        Err(e) => error_response(e),
    }
}

/// `POST /open` - verify and open an armored payload, returning base64 plaintext.
pub async fn open(
    State(state): State<AppState>,
    payload: Result<Json<OpenRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => return error_response(rejection_error(rejection)),
    };
    match open_payload(&state.galois, &req) {
        Ok(plaintext) => (StatusCode::OK, Json(OpenResponse { plaintext })).into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /health` - liveness check. The key is loaded before the server binds,
/// so a running service is always ready.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        algorithm: state.galois.algorithm().to_string(),
        key_id: state.galois.key_id().to_owned(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

fn seal_payload(galois: &Galois, req: &SealRequest) -> Result<String, ServiceError> {
    let plaintext = decode_base64(&req.plaintext, "plaintext")?;
    let aad = decode_aad(req.aad.as_deref())?;
    let sealed = galois
        .seal_with_aad(&plaintext, &aad)
        .map_err(service_error)?;
    armor::encode(&sealed, galois.nonce_size()).map_err(service_error)
}

fn open_payload(galois: &Galois, req: &OpenRequest) -> Result<String, ServiceError> {
    let sealed = armor::decode(&req.sealed, galois.nonce_size()).map_err(service_error)?;
    let aad = decode_aad(req.aad.as_deref())?;
    let plaintext = galois.open_with_aad(&sealed, &aad).map_err(service_error)?;
    Ok(STANDARD.encode(plaintext))
}

fn decode_base64(value: &str, field: &str) -> Result<Vec<u8>, ServiceError> {
    STANDARD
        .decode(value)
        .map_err(|_| ServiceError::BadRequest(format!("{field} is not valid base64")))
}

fn decode_aad(aad: Option<&str>) -> Result<Vec<u8>, ServiceError> {
    aad.map_or_else(|| Ok(Vec::new()), |a| decode_base64(a, "aad"))
}

/// Map a cipher-layer failure onto the service error taxonomy.
///
/// Every open failure after the nonce split becomes the same 400, so callers
/// cannot tell a wrong key from a corrupted payload.
fn service_error(e: CipherError) -> ServiceError {
    match e {
        CipherError::InvalidFormat(_) | CipherError::MalformedInput { .. } => {
            ServiceError::BadRequest(e.to_string())
        }
        CipherError::AuthenticationFailure => {
            ServiceError::BadRequest("authentication failed".into())
        }
        CipherError::RandomSource(_) | CipherError::SealFailure => {
            ServiceError::EncryptionFailure(e.to_string())
        }
        CipherError::InvalidKeySize { .. }
        | CipherError::ConstructionFailure
        | CipherError::UnknownMode(_) => ServiceError::Internal(e.to_string()),
    }
}

/// Body extraction failures (wrong content type, bad JSON, missing fields,
/// oversized body) get the same JSON error shape as handler failures.
fn rejection_error(rejection: JsonRejection) -> ServiceError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServiceError::PayloadTooLarge(rejection.body_text())
    } else {
        ServiceError::BadRequest(rejection.body_text())
    }
}

/// Server faults are logged at `WARN`; caller mistakes only at `DEBUG`.
fn failure_level(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::WARN
    } else {
        Level::DEBUG
    }
}

fn error_response(e: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if failure_level(status) == Level::WARN {
        warn!(error = %e, status = status.as_u16(), "request failed");
    } else {
        debug!(error = %e, status = status.as_u16(), "request rejected");
    }

    let message = match &e {
        ServiceError::BadRequest(m)
        | ServiceError::PayloadTooLarge(m)
        | ServiceError::EncryptionFailure(m)
        | ServiceError::Internal(m) => m.clone(),
    };
    (status, Json(ErrorResponse::new(e.code(), message))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::post, Router};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const KEY: &[u8; 32] = b"12345678901234561234567890123456";

    fn test_state() -> AppState {
        AppState::new(Galois::new(KEY).unwrap())
    }

    fn test_router() -> Router {
        Router::new()
            .route("/seal", post(seal))
            .route("/open", post(open))
            .with_state(test_state())
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn seal_then_open_round_trip() {
        let plaintext = STANDARD.encode(b"test data");
        let (status, body) =
            post_json(test_router(), "/seal", json!({ "plaintext": plaintext })).await;
        assert_eq!(status, StatusCode::OK);
        let sealed = body["sealed"].as_str().unwrap().to_owned();
        assert!(sealed.starts_with("v1."));

        let (status, body) = post_json(test_router(), "/open", json!({ "sealed": sealed })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plaintext"], plaintext);
    }

    #[tokio::test]
    async fn aad_must_match_on_open() {
        let (_, body) = post_json(
            test_router(),
            "/seal",
            json!({ "plaintext": "dGVzdA==", "aad": "cmVjb3JkLTQy" }),
        )
        .await;
        let sealed = body["sealed"].as_str().unwrap().to_owned();

        let (status, _) = post_json(
            test_router(),
            "/open",
            json!({ "sealed": sealed.clone(), "aad": "cmVjb3JkLTQy" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post_json(test_router(), "/open", json!({ "sealed": sealed })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "authentication failed");
    }

    #[tokio::test]
    async fn tampered_payload_rejected() {
        let galois = Galois::new(KEY).unwrap();
        let mut sealed = galois.seal(b"test data").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;
        let armored = armor::encode(&sealed, galois.nonce_size()).unwrap();

        let (status, body) = post_json(test_router(), "/open", json!({ "sealed": armored })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
        assert_eq!(body["message"], "authentication failed");
    }

    #[tokio::test]
    async fn bad_armor_rejected() {
        let (status, body) =
            post_json(test_router(), "/open", json!({ "sealed": "v2.abc.def" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("invalid format"));
    }

    #[tokio::test]
    async fn bad_base64_plaintext_rejected() {
        let (status, body) =
            post_json(test_router(), "/seal", json!({ "plaintext": "!!!" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "plaintext is not valid base64");
    }

    #[tokio::test]
    async fn missing_field_gets_json_error() {
        let (status, body) = post_json(test_router(), "/seal", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "bad_request");
        assert!(body["message"].as_str().unwrap().contains("plaintext"));
    }

    #[tokio::test]
    async fn wrong_content_type_gets_json_error() {
        let req = Request::builder()
            .method("POST")
            .uri("/open")
            .header("content-type", "text/plain")
            .body(Body::from(r#"{"sealed":"v1.a.b"}"#))
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers()["content-type"].to_str().unwrap(),
            "application/json"
        );
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "bad_request");
    }

    #[test]
    fn client_errors_log_below_warn() {
        assert_eq!(failure_level(StatusCode::BAD_REQUEST), Level::DEBUG);
        assert_eq!(failure_level(StatusCode::PAYLOAD_TOO_LARGE), Level::DEBUG);
        assert_eq!(failure_level(StatusCode::INTERNAL_SERVER_ERROR), Level::WARN);
    }

    #[test]
    fn open_failures_share_one_message() {
        let auth = service_error(CipherError::AuthenticationFailure);
        assert_eq!(auth.http_status(), 400);
        assert_eq!(auth.to_string(), "bad request: authentication failed");

        let entropy = service_error(CipherError::RandomSource("no entropy".into()));
        assert_eq!(entropy.http_status(), 500);
    }
}
