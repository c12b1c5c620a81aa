//! Request/response translation pipeline.
//!
//! [`proxy_handler`] is the Axum fallback that receives every request not
//! answered locally. It classifies the path ([`routing`]), renders the
//! upstream URL ([`target`]), prepares outbound headers ([`headers`]),
//! issues the call ([`forward`]), and then shapes the response with
//! [`cookies`] and [`cache`] according to the route.
//!
//! Two response treatments exist:
//!
//! - **Passthrough** (store API): upstream headers are forwarded minus the
//!   hop-by-hop set. Cookies are rewritten to the proxy host and then
//!   dropped entirely, since the CDN in front refuses to cache responses
//!   that set cookies. 206 is reported as 200.
//! - **Annotated** (intelligent search, legacy search, product): only
//!   `x-vtex-*` diagnostics, a JSON `content-type`, the cache directives,
//!   and on 3xx the upstream `Location` reach the client. Nothing from the
//!   client is forwarded upstream beyond the forced origin/host headers.

pub mod cache;
pub mod cookies;
pub mod forward;
pub mod headers;
pub mod routing;
pub mod target;

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::error::ProxyError;
use crate::server::AppState;

use self::cache::RouteClass;
use self::forward::UpstreamResponse;
use self::headers::TargetAuthority;
use self::routing::RouteMatch;
use self::target::{UpstreamTarget, Upstreams};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub async fn proxy_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    req_headers: HeaderMap,
) -> Result<Response, ProxyError> {
    let Some(route) = routing::match_route(uri.path()) else {
        tracing::debug!(path = %uri.path(), "no route matched");
        return Ok(StatusCode::NOT_FOUND.into_response());
    };

    if method != Method::GET && method != Method::HEAD {
        return Ok((
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, HeaderValue::from_static("GET, HEAD"))],
        )
            .into_response());
    }

    let config = &state.config;
    let forwarded_host = request_host(&uri, &req_headers).unwrap_or(config.public_hostname.as_str());
    let upstreams = Upstreams {
        scheme: config.upstream_scheme,
        domain: &config.upstream_domain,
        search_host: &config.search_host,
    };

    let target = target::build_target(&route, uri.query(), &upstreams);
    let authority = authority_of(&target)?;

    tracing::info!(
        route = route.name(),
        tenant = route.tenant(),
        upstream = %target,
        "PROXY"
    );

    let policy = config.cache_profile.policy(route_class(&route));

    if let RouteMatch::StoreApi { .. } = route {
        let outbound = headers::build_outbound_headers(&req_headers, &authority, forwarded_host);
        let upstream = forward::forward(&state.http_client, method, &target, outbound).await?;

        let mut resp_headers = upstream.headers;
        headers::strip_hop_by_hop(&mut resp_headers);
        let rewritten = cookies::rewrite_set_cookies(&mut resp_headers, cookies::hostname_of(forwarded_host));
        // The CDN does not cache responses carrying cookies.
        resp_headers.remove(header::SET_COOKIE);
        if rewritten > 0 {
            tracing::debug!(cookies = rewritten, "dropped set-cookie for cacheability");
        }
        cache::apply_policy(&mut resp_headers, policy);

        return Ok(build_response(
            cache::remap_partial_content(upstream.status),
            resp_headers,
            upstream.body,
        ));
    }

    let outbound = headers::build_bare_headers(&authority, forwarded_host);
    let UpstreamResponse {
        status,
        headers: upstream_headers,
        body,
    } = forward::forward(&state.http_client, method, &target, outbound).await?;

    let mut resp_headers = HeaderMap::new();
    resp_headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    if status.is_redirection() {
        for location in upstream_headers.get_all(header::LOCATION) {
            resp_headers.append(header::LOCATION, location.clone());
        }
    }
    cache::annotate(&upstream_headers, &mut resp_headers, policy);

    Ok(build_response(status, resp_headers, body))
}

const fn route_class(route: &RouteMatch<'_>) -> RouteClass {
    match route {
        RouteMatch::StoreApi { .. } => RouteClass::StoreApi,
        RouteMatch::IntelligentSearch { .. } => RouteClass::IntelligentSearch,
        RouteMatch::Search { .. } => RouteClass::Search,
        RouteMatch::Product { .. } => RouteClass::Product,
    }
}

/// The `host[:port]` the client addressed.
fn request_host<'a>(uri: &'a Uri, headers: &'a HeaderMap) -> Option<&'a str> {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|h| !h.is_empty())
        .or_else(|| uri.authority().map(axum::http::uri::Authority::as_str))
}

fn authority_of(target: &UpstreamTarget) -> Result<TargetAuthority, ProxyError> {
    url::Url::parse(target.as_str())
        .map(|url| TargetAuthority::from_url(&url))
        .map_err(|e| {
            ProxyError::status(
                StatusCode::BAD_REQUEST,
                format!("cannot build upstream url {target}: {e}"),
            )
        })
}

fn build_response(status: StatusCode, headers: HeaderMap, body: hyper::body::Incoming) -> Response {
    let mut response = Response::new(Body::new(body));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
