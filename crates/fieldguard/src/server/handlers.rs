//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    ErrorResponse, HealthResponse, ProtectRequest, ProtectResponse, RevealRequest,
    RevealResponse,
};
use common::ServiceError;
use tracing::warn;

use crate::crypto::CodecError;
use crate::fields::{protect_fields, reveal_fields};
use super::state::AppState;

/// `POST /protect` — encrypt the sensitive fields of a record payload.
///
/// The payload must be a JSON object (a record); anything else is rejected
/// with `400 bad_request`. Designated string fields are replaced in place
/// with base64 envelopes; everything else in the payload is returned
/// untouched. On codec failure nothing is returned: the caller must not
/// persist the record.
pub async fn protect(State(state): State<AppState>, Json(req): Json<ProtectRequest>) -> Response {
    if !req.payload.is_object() {
        return error_response(ServiceError::BadRequest(
            "payload must be a JSON object".into(),
        ));
    }
    let codec = state.codec.clone();
    let fields = state.fields.clone();
    let mut payload = req.payload;

    // PBKDF2 runs 100k hash iterations per field; keep it off the async workers.
    let result = tokio::task::spawn_blocking(move || {
        protect_fields(&mut payload, &fields, &codec).map(|()| payload)
    })
    .await;

    match result {
        Ok(Ok(payload)) => (StatusCode::OK, Json(ProtectResponse { payload })).into_response(),
        Ok(Err(e)) => {
            warn!(error = %e, "protect failed");
            error_response(ServiceError::EncryptionFailure(e.to_string()))
        }
        Err(e) => {
            warn!(error = %e, "protect task panicked");
            error_response(ServiceError::Internal("protect task failed".into()))
        }
    }
}

/// `POST /reveal` — decrypt the sensitive fields of a record payload.
///
/// Legacy unencrypted values pass through unchanged. An envelope that fails
/// tag verification aborts the request with `422 decryption_failed` rather
/// than echoing ciphertext back as if it were data.
pub async fn reveal(State(state): State<AppState>, Json(req): Json<RevealRequest>) -> Response {
    if !req.payload.is_object() {
        return error_response(ServiceError::BadRequest(
            "payload must be a JSON object".into(),
        ));
    }
    let codec = state.codec.clone();
    let fields = state.fields.clone();
    let mut payload = req.payload;

    let result = tokio::task::spawn_blocking(move || {
        reveal_fields(&mut payload, &fields, &codec).map(|()| payload)
    })
    .await;

    match result {
        Ok(Ok(payload)) => (StatusCode::OK, Json(RevealResponse { payload })).into_response(),
        Ok(Err(e @ (CodecError::DecryptionFailed | CodecError::InvalidPlaintext))) => {
            warn!(error = %e, "reveal failed authentication");
            error_response(ServiceError::DecryptionFailed(e.to_string()))
        }
        Ok(Err(e)) => {
            warn!(error = %e, "reveal failed");
            error_response(ServiceError::Internal(e.to_string()))
        }
        Err(e) => {
            warn!(error = %e, "reveal task panicked");
            error_response(ServiceError::Internal("reveal task failed".into()))
        }
    }
}

/// `GET /health` — liveness check.
///
/// The codec is ready as soon as the process is up (a missing passphrase is
/// fatal at startup), so this always reports `ok` plus the configured
/// sensitive-field count.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        sensitive_fields: state.fields.len(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Render a [`ServiceError`] as its JSON error body and mapped status code.
fn error_response(err: ServiceError) -> Response {
    let code = match &err {
        ServiceError::BadRequest(_) => "bad_request",
        ServiceError::DecryptionFailed(_) => "decryption_failed",
        ServiceError::EncryptionFailure(_) => "encryption_failure",
        ServiceError::Internal(_) => "internal_error",
    };
    let status = StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(code, err.to_string()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{FieldCodec, Passphrase};
    use crate::fields::SensitiveFields;
    use crate::server::router;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(
            FieldCodec::new(Passphrase::new("handler-test-passphrase")),
            SensitiveFields::parse("ssn,dateOfBirth"),
        )
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn response_payload(resp: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn protect_then_reveal_round_trip() {
        let app = router::build(test_state());

        let resp = app
            .clone()
            .oneshot(json_request(
                "/protect",
                json!({"payload": {"ssn": "987-65-4321", "firstName": "Alice"}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let protected = response_payload(resp).await;
        let stored_ssn = protected["payload"]["ssn"].as_str().unwrap();
        assert_ne!(stored_ssn, "987-65-4321");
        assert_eq!(protected["payload"]["firstName"], "Alice");

        let resp = app
            .oneshot(json_request(
                "/reveal",
                json!({"payload": {"ssn": stored_ssn}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let revealed = response_payload(resp).await;
        assert_eq!(revealed["payload"]["ssn"], "987-65-4321");
    }

    #[tokio::test]
    async fn reveal_passes_legacy_plaintext_through() {
        let app = router::build(test_state());
        let resp = app
            .oneshot(json_request(
                "/reveal",
                json!({"payload": {"ssn": "123-45-6789"}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = response_payload(resp).await;
        assert_eq!(body["payload"]["ssn"], "123-45-6789");
    }

    #[tokio::test]
    async fn reveal_with_wrong_key_returns_422() {
        // Envelope produced under a different passphrase.
        let foreign = FieldCodec::new(Passphrase::new("some-other-passphrase"));
        let stored = foreign.protect("987-65-4321").unwrap();

        let app = router::build(test_state());
        let resp = app
            .oneshot(json_request("/reveal", json!({"payload": {"ssn": stored}})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = response_payload(resp).await;
        assert_eq!(body["code"], "decryption_failed");
    }

    #[tokio::test]
    async fn protect_rejects_non_object_payload() {
        let app = router::build(test_state());
        let resp = app
            .oneshot(json_request("/protect", json!({"payload": "just-a-string"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = response_payload(resp).await;
        assert_eq!(body["code"], "bad_request");
    }

    #[tokio::test]
    async fn reveal_rejects_non_object_payload() {
        let app = router::build(test_state());
        let resp = app
            .oneshot(json_request("/reveal", json!({"payload": [1, 2, 3]})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = response_payload(resp).await;
        assert_eq!(body["code"], "bad_request");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = router::build(test_state());
        let resp = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = response_payload(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["sensitive_fields"], 2);
    }
}
