//! Per-request deadline.

use axum::http::StatusCode;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

/// Fails requests running longer than `seconds` with 408 Request Timeout.
///
/// The handler future is dropped at the deadline, which cancels any service
/// call in flight. A calendar build cancelled this way writes nothing.
pub fn layer(seconds: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(seconds))
}
