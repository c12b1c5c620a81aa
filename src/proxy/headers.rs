//! Outbound header sanitization and hop-by-hop stripping.
//!
//! [`build_outbound_headers`] copies the inbound request headers, removes
//! the hop-by-hop deny-list, and then forces `origin`, `host` and
//! `x-forwarded-host`. Removal always runs before insertion and none of the
//! forced names appear in the deny-list, so the result does not depend on
//! what the client sent for those three.

use std::sync::LazyLock;

use axum::http::{HeaderMap, HeaderName, HeaderValue};

static HOP_BY_HOP: LazyLock<Vec<HeaderName>> = LazyLock::new(|| {
    [
        "keep-alive",
        "transfer-encoding",
        "te",
        "connection",
        "trailer",
        "upgrade",
        "proxy-authorization",
        "proxy-authenticate",
    ]
    .iter()
    .filter_map(|name| name.parse::<HeaderName>().ok())
    .collect()
});

const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");

/// Origin and host of an upstream URL as they should appear in headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetAuthority {
    pub origin: String,
    pub host: String,
}

impl TargetAuthority {
    #[must_use]
    pub fn from_url(url: &url::Url) -> Self {
        let host = url.host_str().map_or_else(String::new, |host| {
            url.port()
                .map_or_else(|| host.to_string(), |port| format!("{host}:{port}"))
        });
        Self {
            origin: url.origin().ascii_serialization(),
            host,
        }
    }
}

/// Remove every hop-by-hop header in place.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP.iter() {
        headers.remove(name);
    }
}

/// Build the header set sent upstream.
///
/// `forwarded_host` is the host the client addressed (`host[:port]`).
/// The inbound map is left untouched.
#[must_use]
pub fn build_outbound_headers(
    inbound: &HeaderMap,
    target: &TargetAuthority,
    forwarded_host: &str,
) -> HeaderMap {
    let mut headers = inbound.clone();

    strip_hop_by_hop(&mut headers);

    force(&mut headers, hyper::header::ORIGIN, &target.origin);
    force(&mut headers, hyper::header::HOST, &target.host);
    force(&mut headers, X_FORWARDED_HOST, forwarded_host);

    headers
}

/// Headers for routes that forward nothing from the client: only the forced
/// trio is sent.
#[must_use]
pub fn build_bare_headers(target: &TargetAuthority, forwarded_host: &str) -> HeaderMap {
    build_outbound_headers(&HeaderMap::new(), target, forwarded_host)
}

fn force(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(val) => {
            headers.insert(name, val);
        }
        Err(_) => {
            // Never forward a stale client value under a forced name.
            headers.remove(&name);
            tracing::warn!(header = %name, value = %value, "invalid forced header value, dropping");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> TargetAuthority {
        let url = url::Url::parse("https://acme.vtexcommercestable.com.br/api/catalog").unwrap();
        TargetAuthority::from_url(&url)
    }

    #[test]
    fn authority_from_url() {
        let t = target();
        assert_eq!(t.origin, "https://acme.vtexcommercestable.com.br");
        assert_eq!(t.host, "acme.vtexcommercestable.com.br");

        let url = url::Url::parse("http://127.0.0.1:9000/api").unwrap();
        let t = TargetAuthority::from_url(&url);
        assert_eq!(t.origin, "http://127.0.0.1:9000");
        assert_eq!(t.host, "127.0.0.1:9000");
    }

    #[test]
    fn strips_deny_list_regardless_of_case() {
        let mut original = HeaderMap::new();
        for (name, value) in [
            ("Keep-Alive", "timeout=5"),
            ("TRANSFER-ENCODING", "chunked"),
            ("te", "trailers"),
            ("Connection", "keep-alive"),
            ("Trailer", "Expires"),
            ("UpGrade", "websocket"),
            ("Proxy-Authorization", "Basic Zm9vOmJhcg=="),
            ("proxy-authenticate", "Basic"),
        ] {
            original.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_static(value),
            );
        }
        original.insert("accept", "application/json".parse().unwrap());

        let result = build_outbound_headers(&original, &target(), "proxy.example");

        for name in HOP_BY_HOP.iter() {
            assert!(result.get(name).is_none(), "{name} leaked");
        }
        assert_eq!(result.get("accept").unwrap(), "application/json");
    }

    #[test]
    fn forces_origin_host_and_forwarded_host() {
        let mut original = HeaderMap::new();
        original.insert("host", "proxy.example:8080".parse().unwrap());
        original.insert("origin", "https://attacker.example".parse().unwrap());
        original.insert("x-forwarded-host", "spoofed.example".parse().unwrap());

        let result = build_outbound_headers(&original, &target(), "proxy.example:8080");

        assert_eq!(result.get("origin").unwrap(), "https://acme.vtexcommercestable.com.br");
        assert_eq!(result.get("host").unwrap(), "acme.vtexcommercestable.com.br");
        assert_eq!(result.get("x-forwarded-host").unwrap(), "proxy.example:8080");
        assert_eq!(result.get_all("host").iter().count(), 1);
    }

    #[test]
    fn leaves_inbound_untouched() {
        let mut original = HeaderMap::new();
        original.insert("connection", "close".parse().unwrap());
        original.insert("host", "proxy.example".parse().unwrap());
        let snapshot = original.clone();

        let _ = build_outbound_headers(&original, &target(), "proxy.example");

        assert_eq!(original, snapshot);
    }

    #[test]
    fn keeps_multi_valued_headers() {
        let mut original = HeaderMap::new();
        original.append("accept-language", "pt-BR".parse().unwrap());
        original.append("accept-language", "en".parse().unwrap());

        let result = build_outbound_headers(&original, &target(), "proxy.example");
        assert_eq!(result.get_all("accept-language").iter().count(), 2);
    }

    #[test]
    fn bare_headers_carry_only_forced_trio() {
        let result = build_bare_headers(&target(), "proxy.example");
        assert_eq!(result.len(), 3);
        assert!(result.contains_key("origin"));
        assert!(result.contains_key("host"));
        assert!(result.contains_key("x-forwarded-host"));
    }

    #[test]
    fn forced_names_are_not_in_deny_list() {
        for forced in ["origin", "host", "x-forwarded-host"] {
            assert!(!HOP_BY_HOP.iter().any(|n| n.as_str() == forced));
        }
    }
}
