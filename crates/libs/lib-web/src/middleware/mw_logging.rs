//! # Request/Response Logging Middleware
//!
//! Logs every HTTP request and its response with the request ID from
//! [`stamp_req`](super::stamp_req):
//! - Request method, path, query params
//! - Request headers, with credentials redacted
//! - Response status, size, duration
//!
//! Bodies are never logged. Account endpoints carry passwords.

use crate::middleware::RequestStamp;
use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Headers whose values are replaced before logging
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "x-api-key",
    "x-auth-token",
];

/// Endpoints whose requests carry credentials
const SENSITIVE_ENDPOINTS: &[&str] = &["/users", "/login"];

pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(|q| q.to_string());

    let request_id = req
        .extensions()
        .get::<RequestStamp>()
        .map(|s| s.id.clone())
        .unwrap_or_else(|| "unknown".to_string());

    let is_sensitive = is_sensitive_endpoint(&path);
    let headers = sanitize_headers(req.headers());

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        query = ?query,
        user_agent = ?user_agent,
        sensitive = is_sensitive,
        "[REQUEST] {} {}{}",
        method,
        path,
        query.as_ref().map(|q| format!("?{}", q)).unwrap_or_default()
    );

    debug!(request_id = %request_id, headers = ?headers, "[REQUEST HEADERS]");

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();
    let status_code = status.as_u16();

    let content_length = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(0);

    if status.is_server_error() {
        error!(
            request_id = %request_id,
            status = status_code,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms) [SERVER ERROR]",
            method,
            path,
            status_code,
            duration.as_millis()
        );
    } else if status.is_client_error() {
        warn!(
            request_id = %request_id,
            status = status_code,
            duration_ms = duration.as_millis(),
            "[RESPONSE] {} {} -> {} ({}ms) [CLIENT ERROR]",
            method,
            path,
            status_code,
            duration.as_millis()
        );
    } else {
        info!(
            request_id = %request_id,
            status = status_code,
            duration_ms = duration.as_millis(),
            size_bytes = content_length,
            "[RESPONSE] {} {} -> {} ({}ms, {} bytes)",
            method,
            path,
            status_code,
            duration.as_millis(),
            content_length
        );
    }

    response
}

fn is_sensitive_endpoint(path: &str) -> bool {
    SENSITIVE_ENDPOINTS
        .iter()
        .any(|ep| path == *ep || path.starts_with(&format!("{ep}/")))
}

fn sanitize_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.as_str()) {
                Some((name.to_string(), "***REDACTED***".to_string()))
            } else {
                value.to_str().ok().map(|v| (name.to_string(), v.to_string()))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_sensitive_endpoints() {
        assert!(is_sensitive_endpoint("/login"));
        assert!(is_sensitive_endpoint("/users"));
        assert!(is_sensitive_endpoint("/users/7"));
        assert!(!is_sensitive_endpoint("/health"));
        assert!(!is_sensitive_endpoint("/usersettings"));
    }

    #[test]
    fn test_sanitize_headers_redacts_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let sanitized = sanitize_headers(&headers);

        assert!(sanitized.contains(&("authorization".to_string(), "***REDACTED***".to_string())));
        assert!(sanitized.contains(&("content-type".to_string(), "application/json".to_string())));
        assert!(!format!("{:?}", sanitized).contains("abc.def.ghi"));
    }
}
