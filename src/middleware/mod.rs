//! Tower / Axum middleware layers.
//!
//! - [`access_log`] times every request, stamps `X-Response-Time` and emits
//!   one access log event.
//! - [`error_boundary`] turns a [`ProxyError`](crate::error::ProxyError)
//!   carried by a response into the client-facing body, honoring the
//!   deployment's development flag.

pub mod access_log;
pub mod error_boundary;
