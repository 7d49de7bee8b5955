//! HTTP handlers and CORS middleware.

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::AttendanceError;
use crate::pipeline::attendance::try_fetch_attendance;
use crate::storage::models::{FetchRequest, ResultEnvelope};

use super::AppState;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Status code paired with a failure envelope.
pub fn status_for(error: &AttendanceError) -> StatusCode {
    match error {
        AttendanceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn envelope_response(status: StatusCode, envelope: ResultEnvelope) -> Response {
    (status, Json(envelope)).into_response()
}

pub(crate) async fn fetch_attendance_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let request: FetchRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            let error = AttendanceError::InvalidRequest(e.to_string());
            log::warn!("REQUEST_REJECTED error={}", error);
            return envelope_response(status_for(&error), ResultEnvelope::failure(&error.to_string()));
        }
    };

    match try_fetch_attendance(state.client.as_ref(), &request, &state.options).await {
        Ok(records) => envelope_response(StatusCode::OK, ResultEnvelope::success(records)),
        Err(error) => envelope_response(status_for(&error), ResultEnvelope::failure(&error.to_string())),
    }
}

pub(crate) async fn preflight_handler() -> StatusCode {
    StatusCode::OK
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static(ALLOW_ORIGIN),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}

/// Every response, errors included, carries the CORS headers.
pub(crate) async fn cors_middleware(req: Request<Body>, next: Next) -> Response {
    let mut resp = next.run(req).await;
    apply_cors_headers(resp.headers_mut());
    resp
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&AttendanceError::InvalidRequest("bad".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AttendanceError::AuthRejected(401)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&AttendanceError::FetchTimeout(Duration::from_secs(30))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_cors_headers() {
        let mut headers = HeaderMap::new();
        apply_cors_headers(&mut headers);
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(
            headers["access-control-allow-headers"],
            "authorization, x-client-info, apikey, content-type"
        );
    }
}
