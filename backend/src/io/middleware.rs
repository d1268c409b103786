//! Request logging middleware shared by the REST and RPC listeners.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::info;
use uuid::Uuid;

pub const TRACE_ID_HEADER: HeaderName = HeaderName::from_static("x-trace-id");

/// Trace id of the current request, available as a request extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(pub String);

fn trace_id_from(headers: &HeaderMap) -> String {
    headers
        .get(&TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Tag the request with a trace id and log its start and completion.
///
/// An incoming `X-Trace-Id` header is reused, otherwise a new id is
/// generated. The id is echoed on the response.
pub async fn trace_requests(mut request: Request, next: Next) -> Response {
    let trace_id = trace_id_from(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let user_agent = request
        .headers()
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    info!(
        trace_id = %trace_id,
        method = %method,
        path = %path,
        user_agent = %user_agent,
        "request started"
    );

    request.extensions_mut().insert(TraceId(trace_id.clone()));
    let started = Instant::now();

    let mut response = next.run(request).await;

    info!(
        trace_id = %trace_id,
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn router() -> Router {
        Router::new()
            .route(
                "/ping",
                get(|Extension(trace_id): Extension<TraceId>| async move { trace_id.0 }),
            )
            .layer(middleware::from_fn(trace_requests))
    }

    #[tokio::test]
    async fn test_incoming_trace_id_is_reused() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .header("X-Trace-Id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-trace-id").unwrap(), "abc-123");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"abc-123");
    }

    #[tokio::test]
    async fn test_trace_id_is_generated_when_missing() {
        let response = router()
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header = response
            .headers()
            .get("x-trace-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(Uuid::parse_str(&header).is_ok());
    }
}
