//! CDN cache directives for proxied responses.
//!
//! Each route class gets a fixed `cache-control` / `surrogate-control` pair
//! from the deployment's [`CacheProfile`]. Upstream diagnostic headers
//! (`x-vtex-*`) are copied first so that the explicit policy always wins a
//! name collision.

use axum::http::{HeaderMap, HeaderValue, StatusCode};
use clap::ValueEnum;

pub const DIAGNOSTIC_PREFIX: &str = "x-vtex-";

const SURROGATE_CONTROL: &str = "surrogate-control";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    StoreApi,
    IntelligentSearch,
    Search,
    Product,
    Favicon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub cache_control: &'static str,
    pub surrogate_control: &'static str,
}

/// The two policy tables a deployment can choose between. JSON routes share
/// one policy per table; the favicon policy is the same in both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CacheProfile {
    /// Browser and CDN TTL of 60s, CDN serves stale for a day while revalidating.
    #[default]
    Revalidate,
    /// Plain 60s everywhere.
    Short,
}

const FAVICON: CachePolicy = CachePolicy {
    cache_control: "max-age=60, s-maxage=60",
    surrogate_control: "max-age=30, stale-while-revalidate=86400, stale-if-error=86400",
};

impl CacheProfile {
    #[must_use]
    pub const fn policy(self, class: RouteClass) -> CachePolicy {
        match (self, class) {
            (_, RouteClass::Favicon) => FAVICON,
            (Self::Revalidate, _) => CachePolicy {
                cache_control: "public, max-age=60, s-maxage=60",
                surrogate_control: "max-age=30, stale-while-revalidate=86400",
            },
            (Self::Short, _) => CachePolicy {
                cache_control: "public, max-age=60, s-maxage=60",
                surrogate_control: "max-age=60",
            },
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revalidate => "revalidate",
            Self::Short => "short",
        }
    }
}

/// Copy every upstream header named `x-vtex-*` into `out`, all values kept.
pub fn forward_diagnostics(upstream: &HeaderMap, out: &mut HeaderMap) {
    for name in upstream.keys() {
        if name.as_str().starts_with(DIAGNOSTIC_PREFIX) {
            out.remove(name);
            for value in upstream.get_all(name) {
                out.append(name.clone(), value.clone());
            }
        }
    }
}

/// Overwrite the cache directives in `out` with `policy`.
pub fn apply_policy(out: &mut HeaderMap, policy: CachePolicy) {
    out.insert(
        hyper::header::CACHE_CONTROL,
        HeaderValue::from_static(policy.cache_control),
    );
    out.insert(SURROGATE_CONTROL, HeaderValue::from_static(policy.surrogate_control));
}

/// Diagnostics first, then the policy.
pub fn annotate(upstream: &HeaderMap, out: &mut HeaderMap, policy: CachePolicy) {
    forward_diagnostics(upstream, out);
    apply_policy(out, policy);
}

/// 206 becomes 200 so the CDN caches it; the upstream omits the range
/// headers that would make a 206 meaningful.
#[must_use]
pub fn remap_partial_content(status: StatusCode) -> StatusCode {
    if status == StatusCode::PARTIAL_CONTENT {
        StatusCode::OK
    } else {
        status
    }
}
