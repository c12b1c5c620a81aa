//! `search-proxy run` — start the proxy server.
//!
//! Builds the [`ProxyConfig`] from CLI / environment, validates it, and
//! serves the Axum router until Ctrl+C or SIGTERM.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::RunArgs;
use crate::config::ProxyConfig;
use crate::error::SearchProxyError;
use crate::logging;
use crate::server::{self, AppState};

pub async fn execute(args: RunArgs) -> Result<(), SearchProxyError> {
    let log_format = logging::resolve_format(args.pretty, args.json, args.development);
    logging::init(&args.log_level, log_format);

    let config = ProxyConfig::from_args(&args);
    config.validate()?;

    let public_hostname = config.public_hostname.clone();
    let state = Arc::new(AppState::new(config));

    let router = server::build_router(
        Arc::clone(&state),
        Duration::from_secs(args.request_timeout),
    );

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        development = state.config.development,
        cache_profile = state.config.cache_profile.as_str(),
        upstream_domain = %state.config.upstream_domain,
        search_host = %state.config.search_host,
        "Listening on http://{public_hostname}:{}",
        args.port
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    tracing::info!("search-proxy stopped");
    Ok(())
}
