//! Error types for the search proxy.
//!
//! [`ProxyError`] is the per-request taxonomy returned by route handlers:
//! explicit HTTP-status errors, upstream network failures, and anything
//! unexpected. Rendering is deferred to the
//! [`error_boundary`](crate::middleware::error_boundary) layer, which knows
//! whether the deployment runs in development mode.
//!
//! [`SearchProxyError`] covers startup and CLI failures and never reaches a
//! client.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}: {}", self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SearchProxyError {
    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("Invalid URI: {source}")]
    UriParse {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("HTTP request failed: {source}")]
    HttpRequest {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(hyper::StatusCode),
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failure while serving a single request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Deliberately raised by a handler. `expose` allows the message to reach
    /// the client outside development mode.
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
        expose: bool,
    },

    #[error("upstream request to {url} failed")]
    Upstream {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("unexpected error")]
    Unexpected {
        #[source]
        source: BoxError,
    },
}

impl ProxyError {
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
            expose: false,
        }
    }

    pub fn exposed(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
            expose: true,
        }
    }

    pub fn upstream(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Upstream {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn unexpected(source: impl Into<BoxError>) -> Self {
        Self::Unexpected {
            source: source.into(),
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Status { status, .. } => *status,
            Self::Upstream { .. } => StatusCode::BAD_GATEWAY,
            Self::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing JSON body. `development` unlocks messages that would
    /// otherwise stay in the operational log.
    #[must_use]
    pub fn body(&self, development: bool) -> serde_json::Value {
        match self {
            Self::Status {
                status,
                message,
                expose,
            } => {
                if *expose || development {
                    serde_json::json!({ "status": status.as_u16(), "message": message })
                } else {
                    serde_json::json!({ "status": status.as_u16() })
                }
            }
            Self::Upstream { .. } | Self::Unexpected { .. } => {
                if development {
                    serde_json::json!({ "error": error_chain(self) })
                } else {
                    serde_json::json!({ "error": self.status_code().canonical_reason().unwrap_or("error") })
                }
            }
        }
    }
}

/// Joins an error and all of its sources into one line.
#[must_use]
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let mut response = self.status_code().into_response();
        response.extensions_mut().insert(Arc::new(self));
        response
    }
}
