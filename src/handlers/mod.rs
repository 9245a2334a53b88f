pub mod admin;
pub mod public;

use axum::http::HeaderMap;
use std::time::Duration;

use crate::config;
use crate::error::ApiError;
use crate::state::AppState;

/// Best-effort client identity for rate limit keys. Honors the usual
/// proxy headers; falls back to a shared bucket when none are present.
pub fn client_ip(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        return real_ip.trim().to_string();
    }
    "unknown".to_string()
}

/// Check the fixed-window limit for `"<purpose>:<client-ip>"`, mapping a
/// denial to 429 with Retry-After
pub fn enforce_rate_limit(
    state: &AppState,
    purpose: &str,
    headers: &HeaderMap,
    limit: u32,
    window_secs: u64,
) -> Result<(), ApiError> {
    if !config::config().rate_limit.enabled {
        return Ok(());
    }

    let key = format!("{}:{}", purpose, client_ip(headers));
    match state.limiter.check(&key, limit, Duration::from_secs(window_secs)) {
        crate::ratelimit::Decision::Allowed => Ok(()),
        crate::ratelimit::Decision::Denied { retry_after } => {
            tracing::warn!("rate limit exceeded for {}", key);
            Err(ApiError::too_many_requests(
                "Too many requests, slow down",
                retry_after.as_secs().max(1),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_client_ip_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.0.0.9, 172.16.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "10.0.0.9");
    }

    #[test]
    fn test_client_ip_falls_back() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));
        assert_eq!(client_ip(&headers), "10.0.0.2");

        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }
}
