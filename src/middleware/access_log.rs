use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

pub const RESPONSE_TIME: &str = "x-response-time";

pub async fn access_log(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let start = Instant::now();

    let mut response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_millis();
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed_ms}ms")) {
        response.headers_mut().insert(RESPONSE_TIME, value);
    }

    tracing::info!(
        status = response.status().as_u16(),
        method = %method,
        path = %path,
        query = query.as_deref().unwrap_or(""),
        elapsed_ms = u64::try_from(elapsed_ms).unwrap_or(u64::MAX),
        "request served"
    );

    response
}
