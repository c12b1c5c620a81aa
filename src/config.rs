//! Explicit runtime configuration.
//!
//! [`ProxyConfig`] is built once from the parsed CLI / environment at
//! startup and handed to the router through
//! [`AppState`](crate::server::AppState). Handlers read it from state and
//! never consult the environment themselves.

use std::path::PathBuf;

use crate::cli::{RunArgs, UpstreamScheme};
use crate::error::{SearchProxyError, ValidationError};
use crate::proxy::cache::CacheProfile;

pub const DEV_HOSTNAME: &str = "vtex-search-proxy.local";
pub const PROD_HOSTNAME: &str = "vtex-search-proxy.deno.dev";

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub port: u16,
    pub development: bool,
    /// Hostname advertised in logs and used for cookies when a request
    /// carries no `Host`.
    pub public_hostname: String,
    pub upstream_scheme: UpstreamScheme,
    pub upstream_domain: String,
    pub search_host: String,
    pub cache_profile: CacheProfile,
    pub favicon_path: PathBuf,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            development: false,
            public_hostname: PROD_HOSTNAME.into(),
            upstream_scheme: UpstreamScheme::Https,
            upstream_domain: "vtexcommercestable.com.br".into(),
            search_host: "deco.vtexcommercestable.com.br".into(),
            cache_profile: CacheProfile::default(),
            favicon_path: PathBuf::from("public/favicon.ico"),
        }
    }
}

impl ProxyConfig {
    #[must_use]
    pub fn from_args(args: &RunArgs) -> Self {
        let public_hostname = args.public_hostname.clone().unwrap_or_else(|| {
            if args.development {
                DEV_HOSTNAME.into()
            } else {
                PROD_HOSTNAME.into()
            }
        });

        Self {
            port: args.port,
            development: args.development,
            public_hostname,
            upstream_scheme: args.upstream_scheme,
            upstream_domain: args.upstream_domain.clone(),
            search_host: args.search_host.clone(),
            cache_profile: args.cache_profile,
            favicon_path: args.favicon_path.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), SearchProxyError> {
        let mut errors = Vec::new();

        if self.public_hostname.trim().is_empty() {
            errors.push(ValidationError {
                field: "public_hostname".into(),
                message: "must not be empty".into(),
                suggestion: None,
            });
        }
        check_authority("upstream_domain", &self.upstream_domain, &mut errors);
        check_authority("search_host", &self.search_host, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SearchProxyError::ConfigValidation { errors })
        }
    }
}

/// Accepts `host` or `host:port`; anything carrying a scheme, path, query or
/// userinfo is rejected.
fn check_authority(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.is_empty() {
        errors.push(ValidationError {
            field: field.into(),
            message: "must not be empty".into(),
            suggestion: None,
        });
        return;
    }

    if value.contains("://") {
        errors.push(ValidationError {
            field: field.into(),
            message: format!("'{value}' includes a scheme"),
            suggestion: Some("pass the bare host name; use --upstream-scheme for the scheme".into()),
        });
        return;
    }

    if value.contains(['/', '?', '#', '@']) || value.contains(char::is_whitespace) {
        errors.push(ValidationError {
            field: field.into(),
            message: format!("'{value}' is not a bare host name"),
            suggestion: Some("remove any path, query or credentials".into()),
        });
        return;
    }

    if url::Url::parse(&format!("https://{value}/")).is_err() {
        errors.push(ValidationError {
            field: field.into(),
            message: format!("'{value}' is not a valid host"),
            suggestion: None,
        });
    }
}
