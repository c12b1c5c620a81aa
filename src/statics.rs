//! Routes answered locally without touching an upstream.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use crate::error::ProxyError;
use crate::proxy::cache::{apply_policy, RouteClass};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Welcome {
    pub message: String,
    pub routes: WelcomeRoutes,
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeRoutes {
    pub search: String,
    pub product: String,
    pub intelligent_search: String,
    pub api: String,
}

pub async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to the VTEX Search Proxy!".into(),
        routes: WelcomeRoutes {
            search: "/:accountName/:search?qs=...".into(),
            product: "/:accountName/:linkText/p".into(),
            intelligent_search: "/:accountName/intelligent-search/*".into(),
            api: "/v2/:accountName/api/*".into(),
        },
        reference: "https://developers.vtex.com/vtex-rest-api/reference/productsearch".into(),
    })
}

/// Empty 404, for icons browsers probe but the proxy never serves.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

/// Streams the favicon from disk with the favicon cache policy.
pub async fn favicon(State(state): State<Arc<AppState>>) -> Result<Response, ProxyError> {
    let path = &state.config.favicon_path;
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "favicon missing");
            return Err(ProxyError::exposed(StatusCode::NOT_FOUND, "not found"));
        }
        Err(e) => return Err(ProxyError::unexpected(e)),
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("image/x-icon"));
    apply_policy(
        &mut headers,
        state.config.cache_profile.policy(RouteClass::Favicon),
    );
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}
