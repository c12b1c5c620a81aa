//! Upstream URL construction.
//!
//! Every proxied route shape maps to exactly one fixed template. The tenant
//! is interpolated only into the host label (store APIs) or the `an` query
//! parameter (legacy catalog search), so a malformed tenant can only yield a
//! malformed URL against the same upstream. Path segments arrive here still
//! percent-encoded, exactly as they appeared on the inbound request line;
//! nothing is decoded or escaped on the way through.

use crate::cli::UpstreamScheme;

use super::routing::RouteMatch;

/// Hosts the templates are rendered against.
#[derive(Debug, Clone, Copy)]
pub struct Upstreams<'a> {
    pub scheme: UpstreamScheme,
    /// Tenants become a subdomain of this (`{tenant}.{domain}`).
    pub domain: &'a str,
    /// Fixed host of the legacy catalog search API.
    pub search_host: &'a str,
}

/// Fully-qualified upstream URL for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget(String);

impl UpstreamTarget {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders the upstream URL for a matched route.
///
/// `query` is the raw inbound query string without the leading `?`.
#[must_use]
pub fn build_target(route: &RouteMatch<'_>, query: Option<&str>, upstreams: &Upstreams<'_>) -> UpstreamTarget {
    let scheme = upstreams.scheme.as_str();
    let url = match route {
        RouteMatch::StoreApi { tenant, path } => format!(
            "{scheme}://{tenant}.{domain}/api/{path}{search}",
            domain = upstreams.domain,
            search = verbatim_search(query),
        ),
        RouteMatch::IntelligentSearch { tenant, facets } => format!(
            "{scheme}://{tenant}.{domain}/api/io/_v/api/intelligent-search/{facets}{search}",
            domain = upstreams.domain,
            search = verbatim_search(query),
        ),
        RouteMatch::Search { tenant, term } => format!(
            "{scheme}://{host}/api/catalog_system/pub/products/search/{term}?an={tenant}&{rest}",
            host = upstreams.search_host,
            term = term.unwrap_or(""),
            rest = reserialize_query(query),
        ),
        RouteMatch::Product { tenant, link_text } => format!(
            "{scheme}://{host}/api/catalog_system/pub/products/search/{link_text}/p?an={tenant}",
            host = upstreams.search_host,
        ),
    };
    UpstreamTarget(url)
}

/// `?query` when the inbound request carried one, empty otherwise.
fn verbatim_search(query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("?{q}"),
        _ => String::new(),
    }
}

/// Parses the inbound query into pairs and serializes them again in
/// `application/x-www-form-urlencoded` form.
fn reserialize_query(query: Option<&str>) -> String {
    let Some(query) = query else {
        return String::new();
    };
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(url::form_urlencoded::parse(query.as_bytes()))
        .finish()
}
