use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{error_chain, ProxyError};
use crate::server::AppState;

/// Renders errors raised by inner handlers.
///
/// Upstream and unexpected failures are logged with their full source
/// chain; clients only see detail in development mode.
pub async fn error_boundary(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let Some(err) = response.extensions_mut().remove::<Arc<ProxyError>>() else {
        return response;
    };

    match err.as_ref() {
        ProxyError::Status { status, message, .. } => {
            tracing::debug!(status = status.as_u16(), message = %message, path = %path, "handler raised status");
        }
        ProxyError::Upstream { url, .. } => {
            tracing::error!(method = %method, path = %path, upstream = %url, error = %error_chain(err.as_ref()), "upstream request failed");
        }
        ProxyError::Unexpected { .. } => {
            tracing::error!(method = %method, path = %path, error = %error_chain(err.as_ref()), error_debug = ?err, "unhandled error");
        }
    }

    (err.status_code(), Json(err.body(state.config.development))).into_response()
}
