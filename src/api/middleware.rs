//! API Middleware (Rate Limiting, Logging)

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::handlers::AppState;
use super::types::ErrorBody;
use crate::core::ratelimit::client_id;
use crate::models::AppError;

fn is_exempt(path: &str) -> bool {
    matches!(
        path,
        "/health" | "/v1/health" | "/stats" | "/v1/stats"
    )
}

/// Sliding-window rate limiting, applied before any body handling. The
/// identifier comes from forwarded headers; header-less clients share one
/// budget.
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if is_exempt(request.uri().path()) {
        return next.run(request).await;
    }

    let key = client_id(request.headers());
    if state.rate_limiter.is_rate_limited(&key) {
        warn!("rate limit exceeded");
        let err = AppError::rate_limited();
        return (
            StatusCode::TOO_MANY_REQUESTS,
            axum::Json(ErrorBody::new(err.code_str(), err.message)),
        )
            .into_response();
    }

    let remaining = state.rate_limiter.remaining(&key);
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert("X-RateLimit-Remaining", remaining.into());
    response
}

/// Request logging: method, path, status and latency only. Scan inputs
/// travel in the body and never reach the log.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        latency_ms = %start.elapsed().as_millis(),
        "request completed"
    );

    response
}
