//! Shared harness for integration tests: a proxy bound on an ephemeral
//! port and mock upstreams it can be pointed at.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use search_proxy::cli::UpstreamScheme;
use search_proxy::config::ProxyConfig;
use search_proxy::server::{self, AppState};

pub struct TestProxy {
    pub addr: SocketAddr,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestProxy {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Config pointing every upstream at `upstream` over plain HTTP.
///
/// Store API targets are `{tenant}.{domain}`; with tenant [`LOOPBACK_TENANT`]
/// and domain `0.0.1:<port>` that renders as `127.0.0.1:<port>`.
pub fn config_for(upstream: SocketAddr) -> ProxyConfig {
    ProxyConfig {
        upstream_scheme: UpstreamScheme::Http,
        upstream_domain: format!("0.0.1:{}", upstream.port()),
        search_host: upstream.to_string(),
        ..ProxyConfig::default()
    }
}

pub const LOOPBACK_TENANT: &str = "127";

pub async fn start_proxy(config: ProxyConfig) -> TestProxy {
    let state = Arc::new(AppState::new(config));
    let router = server::build_router(state, Duration::from_secs(10));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    TestProxy {
        addr,
        shutdown: Some(shutdown_tx),
    }
}

/// Mock upstream. Every response echoes the request line and headers as
/// JSON; a few paths add behavior on top.
pub async fn start_mock_upstream() -> SocketAddr {
    let router = axum::Router::new().fallback(mock_handler);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn mock_handler(method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let echo = Json(serde_json::json!({
        "uri": uri.to_string(),
        "headers": headers
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), serde_json::Value::from(v.to_str().unwrap_or(""))))
            .collect::<serde_json::Map<_, _>>(),
    }));

    match uri.path() {
        "/api/partial" => (
            StatusCode::PARTIAL_CONTENT,
            AppendHeaders([
                (header::SET_COOKIE, "session=abc; Domain=127.0.0.1; Path=/"),
                (header::SET_COOKIE, "segment=xyz; Path=/"),
            ]),
            [("x-upstream-only", "kept")],
            echo,
        )
            .into_response(),
        "/api/redirect" => (
            StatusCode::FOUND,
            [(header::LOCATION, "https://elsewhere.example/login")],
        )
            .into_response(),
        "/api/catalog_system/pub/products/search/moved" => (
            StatusCode::MOVED_PERMANENTLY,
            [
                (header::LOCATION, "/api/catalog_system/pub/products/search/renamed"),
                (header::SERVER, "nginx"),
            ],
        )
            .into_response(),
        "/api/missing" => (StatusCode::NOT_FOUND, echo).into_response(),
        "/api/stream" => {
            let chunks = futures_util::stream::iter(
                ["alpha,", "beta,", "gamma"].map(|c| Ok::<_, std::io::Error>(Bytes::from_static(c.as_bytes()))),
            );
            Response::new(Body::from_stream(chunks))
        }
        _ => (
            AppendHeaders([
                ("x-vtex-cache-status", "HIT"),
                ("x-vtex-operation-id", "op-1"),
                ("server", "nginx"),
                ("x-powered-by", "vtex"),
                ("set-cookie", "leak=1; Path=/"),
                ("cache-control", "no-store"),
            ]),
            [("x-vtex-request-method", method.as_str().to_string())],
            echo,
        )
            .into_response(),
    }
}

/// Upstream that promises more body than it sends, then hangs up.
pub async fn start_truncating_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let head = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 1000\r\n\r\n";
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(b"{\"partial\":").await;
                let _ = socket.flush().await;
                tokio::time::sleep(Duration::from_millis(50)).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
