//! Search proxy: a tenant-aware reverse proxy in front of a multi-tenant
//! e-commerce catalog and search API.
//!
//! Inbound paths are rewritten into tenant-scoped upstream URLs, hop-by-hop
//! headers are stripped, response cookies are re-scoped to the proxy's own
//! host, and responses are annotated with CDN cache directives. Bodies are
//! streamed through untouched.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, health).
//! - [`config`] -- The explicit [`ProxyConfig`](config::ProxyConfig) and its validation.
//! - [`error`] -- Per-request [`ProxyError`](error::ProxyError) taxonomy and startup errors.
//! - [`health`] -- `GET /health` endpoint handler.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`middleware`] -- Access logging and the error boundary.
//! - [`proxy`] -- The translation pipeline: routing, URL building, header
//!   sanitization, forwarding, cookie rewriting and cache annotation.
//! - [`server`] -- Axum server setup, shared state, HTTP client, and
//!   graceful shutdown.
//! - [`statics`] -- Welcome payload, favicon and icon 404s.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod middleware;
pub mod proxy;
pub mod server;
pub mod statics;
