use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Duration;
use serde_json::json;

/// Operation buckets guarded by the limiter. Reads pass through unmetered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteClass {
    Vote,
    Install,
    Request,
}

impl WriteClass {
    fn name(&self) -> &'static str {
        match self {
            WriteClass::Vote => "vote",
            WriteClass::Install => "install",
            WriteClass::Request => "request",
        }
    }

    /// Budget per client address. Skill requests are the most abusable
    /// write (each one pings the admin), so they get the tightest window.
    fn budget(&self) -> (u32, Duration) {
        match self {
            WriteClass::Vote => (20, Duration::minutes(1)),
            WriteClass::Install => (30, Duration::minutes(1)),
            WriteClass::Request => (5, Duration::hours(1)),
        }
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let Some(class) = classify(req.method(), req.uri().path()) else {
        return next.run(req).await;
    };

    let ip = client_ip(req.headers());
    let key = format!("{}:{}", ip, class.name());
    let (limit, window) = class.budget();

    let verdict = state.limiter.check(&key, limit, window);
    if verdict.allowed {
        return next.run(req).await;
    }

    let retry_after = verdict.retry_after_secs(chrono::Utc::now());
    tracing::warn!("Rate limit exceeded for {} ({})", ip, class.name());

    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, retry_after.to_string())],
        Json(json!({
            "error": "Too many requests",
            "retry_after_secs": retry_after,
        })),
    )
        .into_response()
}

fn classify(method: &Method, path: &str) -> Option<WriteClass> {
    if method == Method::POST && path == "/v1/skill-requests" {
        return Some(WriteClass::Request);
    }

    if path.starts_with("/v1/skills/") {
        if method == Method::POST && path.ends_with("/install") {
            return Some(WriteClass::Install);
        }
        if (method == Method::POST || method == Method::DELETE) && path.ends_with("/vote") {
            return Some(WriteClass::Vote);
        }
    }

    None
}

/// Client address for limiter keying. `x-real-ip` is set by the fronting
/// proxy and wins; otherwise the last `x-forwarded-for` hop is the one the
/// trusted proxy appended. Requests with neither share the "unknown"
/// bucket, so an anonymizing client cannot dodge the limit.
fn client_ip(headers: &HeaderMap) -> String {
    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        let last = forwarded
            .split(',')
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .last();
        if let Some(hop) = last {
            return hop.to_string();
        }
    }

    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn real_ip_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("203.0.113.7"));
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("10.0.0.1, 203.0.113.8"),
        );
        assert_eq!(client_ip(&headers), "203.0.113.7");
    }

    #[test]
    fn forwarded_for_takes_last_hop() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("198.51.100.1, 10.0.0.1, 203.0.113.9"),
        );
        assert_eq!(client_ip(&headers), "203.0.113.9");
    }

    #[test]
    fn missing_headers_fall_back_to_unknown() {
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");

        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("  "));
        assert_eq!(client_ip(&headers), "unknown");
    }

    #[test]
    fn write_endpoints_are_classified() {
        assert_eq!(
            classify(&Method::POST, "/v1/skills/abc/vote"),
            Some(WriteClass::Vote)
        );
        assert_eq!(
            classify(&Method::DELETE, "/v1/skills/abc/vote"),
            Some(WriteClass::Vote)
        );
        assert_eq!(
            classify(&Method::POST, "/v1/skills/abc/install"),
            Some(WriteClass::Install)
        );
        assert_eq!(
            classify(&Method::POST, "/v1/skill-requests"),
            Some(WriteClass::Request)
        );
    }

    #[test]
    fn reads_are_never_limited() {
        assert_eq!(classify(&Method::GET, "/v1/skills"), None);
        assert_eq!(classify(&Method::GET, "/v1/skills/abc"), None);
        assert_eq!(classify(&Method::GET, "/v1/discover"), None);
        assert_eq!(classify(&Method::GET, "/health"), None);
    }
}
