//! One-shot upstream GET with a streamed response body.
//!
//! The hyper client never follows redirects, so 3xx responses come back
//! with their `Location` untouched. The body is handed on as the live
//! [`Incoming`] stream; nothing here reads it. Dropping the returned
//! response (for instance because the client went away) aborts the upstream
//! exchange.

use std::time::Instant;

use axum::http::{HeaderMap, Method, StatusCode};
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;

use crate::error::ProxyError;
use crate::server::HttpClient;

use super::target::UpstreamTarget;

#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Consumed exactly once, by whatever writes the downstream response.
    pub body: Incoming,
}

/// Issue `method` (GET or HEAD) against `target` with `headers`.
///
/// Connection, DNS and TLS failures come back as [`ProxyError::Upstream`].
/// There is no retry.
pub async fn forward(
    client: &HttpClient,
    method: Method,
    target: &UpstreamTarget,
    headers: HeaderMap,
) -> Result<UpstreamResponse, ProxyError> {
    let uri: hyper::Uri = target
        .as_str()
        .parse()
        .map_err(|e| ProxyError::status(StatusCode::BAD_REQUEST, format!("invalid upstream url: {e}")))?;

    let mut request = hyper::Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .map_err(ProxyError::unexpected)?;
    *request.headers_mut() = headers;

    let start = Instant::now();
    let response = client
        .request(request)
        .await
        .map_err(|e| ProxyError::upstream(target.as_str(), e))?;

    tracing::debug!(
        upstream = %target,
        status = response.status().as_u16(),
        latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        "upstream responded"
    );

    let (parts, body) = response.into_parts();
    Ok(UpstreamResponse {
        status: parts.status,
        headers: parts.headers,
        body,
    })
}
