//! Path matching for proxied routes.
//!
//! [`match_route`] classifies an inbound path into one of the four proxied
//! route shapes. Shapes are tried in a fixed order and the first match wins:
//!
//! 1. `/v2/{tenant}/api/*` – store API passthrough
//! 2. `/{tenant}/intelligent-search/*` – intelligent search passthrough
//! 3. `/{tenant}` and `/{tenant}/{search}` – legacy product search
//! 4. `/{tenant}/{linkText}/p` – legacy product by link text
//!
//! Captured values borrow from the raw (still percent-encoded) path. A
//! single trailing slash is tolerated on the fixed-arity shapes; the
//! catch-all remainders are taken verbatim.

/// A proxied route with the parameters captured from the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMatch<'a> {
    StoreApi { tenant: &'a str, path: &'a str },
    IntelligentSearch { tenant: &'a str, facets: &'a str },
    Search { tenant: &'a str, term: Option<&'a str> },
    Product { tenant: &'a str, link_text: &'a str },
}

impl<'a> RouteMatch<'a> {
    #[must_use]
    pub const fn tenant(&self) -> &'a str {
        match self {
            Self::StoreApi { tenant, .. }
            | Self::IntelligentSearch { tenant, .. }
            | Self::Search { tenant, .. }
            | Self::Product { tenant, .. } => tenant,
        }
    }

    /// Short label used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StoreApi { .. } => "store-api",
            Self::IntelligentSearch { .. } => "intelligent-search",
            Self::Search { .. } => "search",
            Self::Product { .. } => "product",
        }
    }
}

#[must_use]
pub fn match_route(path: &str) -> Option<RouteMatch<'_>> {
    let rest = path.strip_prefix('/')?;

    if let Some(m) = match_store_api(rest) {
        return Some(m);
    }
    if let Some(m) = match_intelligent_search(rest) {
        return Some(m);
    }

    let trimmed = rest.strip_suffix('/').unwrap_or(rest);
    let segments: Vec<&str> = trimmed.split('/').collect();
    if segments.iter().any(|s| s.is_empty()) {
        return None;
    }

    match *segments.as_slice() {
        [tenant] => Some(RouteMatch::Search { tenant, term: None }),
        [tenant, term] => Some(RouteMatch::Search {
            tenant,
            term: Some(term),
        }),
        [tenant, link_text, "p"] => Some(RouteMatch::Product { tenant, link_text }),
        _ => None,
    }
}

fn match_store_api(rest: &str) -> Option<RouteMatch<'_>> {
    let after_v2 = rest.strip_prefix("v2/")?;
    let (tenant, after_tenant) = after_v2.split_once('/')?;
    let path = after_tenant.strip_prefix("api/")?;
    (!tenant.is_empty()).then_some(RouteMatch::StoreApi { tenant, path })
}

fn match_intelligent_search(rest: &str) -> Option<RouteMatch<'_>> {
    let (tenant, after_tenant) = rest.split_once('/')?;
    let facets = after_tenant.strip_prefix("intelligent-search/")?;
    (!tenant.is_empty()).then_some(RouteMatch::IntelligentSearch { tenant, facets })
}
