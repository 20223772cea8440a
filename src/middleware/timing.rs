use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::{Duration, Instant};

const RESPONSE_TIME_US: HeaderName = HeaderName::from_static("x-response-time-us");
const SERVER_TIMING: HeaderName = HeaderName::from_static("server-timing");

/// Stamps every response with how long the stack below took, and writes
/// one access-log line per `/api/` call. Failed requests log at `warn`;
/// the error event itself comes from `AppError`.
pub async fn timing_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = start.elapsed();

    let headers = response.headers_mut();
    headers.insert(RESPONSE_TIME_US, HeaderValue::from(elapsed.as_micros() as u64));
    if let Ok(val) = HeaderValue::from_str(&server_timing(elapsed)) {
        headers.insert(SERVER_TIMING, val);
    }

    if path.starts_with("/api/") {
        let status = response.status();
        let elapsed_us = elapsed.as_micros() as u64;
        if status.is_success() {
            tracing::info!(%method, %path, status = status.as_u16(), elapsed_us, "request");
        } else {
            tracing::warn!(%method, %path, status = status.as_u16(), elapsed_us, "request");
        }
    }

    response
}

/// `Server-Timing` value in milliseconds.
fn server_timing(elapsed: Duration) -> String {
    format!("app;dur={:.3}", elapsed.as_secs_f64() * 1000.0)
}
