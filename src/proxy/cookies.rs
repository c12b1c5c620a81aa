//! `Set-Cookie` domain rewriting.
//!
//! Upstream cookies are scoped to the upstream host. [`rewrite_set_cookies`]
//! re-scopes every one of them to the host the client addressed, setting a
//! `Domain` even when the upstream sent none. Every other attribute value is
//! kept byte-for-byte; attributes are re-emitted in a fixed order:
//!
//! `name=value; Secure; HttpOnly; Max-Age; Domain; SameSite; Path; Expires; <others>`
//!
//! Whether the rewritten cookies are finally sent is a per-route decision
//! made by the caller.

use axum::http::{HeaderMap, HeaderValue};
use hyper::header::SET_COOKIE;

/// One parsed `Set-Cookie` entry. Attribute values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    pub expires: Option<String>,
    pub max_age: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: Option<String>,
    /// Attributes this parser does not model (`Partitioned`, `Priority=High`, ...).
    pub extensions: Vec<String>,
}

impl SetCookie {
    /// Parses a raw header value. Returns `None` when the leading
    /// `name=value` pair is missing or has an empty name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self {
            name: name.to_string(),
            value: value.trim().to_string(),
            ..Self::default()
        };

        for attr in parts {
            let attr = attr.trim();
            if attr.is_empty() {
                continue;
            }
            let (key, val) = attr
                .split_once('=')
                .map_or((attr, None), |(k, v)| (k.trim_end(), Some(v.trim_start())));

            match (key.to_ascii_lowercase().as_str(), val) {
                ("domain", Some(v)) => cookie.domain = Some(v.to_string()),
                ("path", Some(v)) => cookie.path = Some(v.to_string()),
                ("expires", Some(v)) => cookie.expires = Some(v.to_string()),
                ("max-age", Some(v)) => cookie.max_age = Some(v.to_string()),
                ("samesite", Some(v)) => cookie.same_site = Some(v.to_string()),
                ("secure", _) => cookie.secure = true,
                ("httponly", _) => cookie.http_only = true,
                _ => cookie.extensions.push(attr.to_string()),
            }
        }

        Some(cookie)
    }
}

impl std::fmt::Display for SetCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        if let Some(ref max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        if let Some(ref domain) = self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if let Some(ref same_site) = self.same_site {
            write!(f, "; SameSite={same_site}")?;
        }
        if let Some(ref path) = self.path {
            write!(f, "; Path={path}")?;
        }
        if let Some(ref expires) = self.expires {
            write!(f, "; Expires={expires}")?;
        }
        for ext in &self.extensions {
            write!(f, "; {ext}")?;
        }
        Ok(())
    }
}

/// Replaces every `Set-Cookie` in `headers` with a copy scoped to
/// `hostname`. Returns the number of cookies written back.
///
/// Entries that cannot be parsed, or that are not valid UTF-8, are dropped
/// rather than forwarded with the upstream's scope.
pub fn rewrite_set_cookies(headers: &mut HeaderMap, hostname: &str) -> usize {
    let originals: Vec<HeaderValue> = headers.get_all(SET_COOKIE).iter().cloned().collect();
    if originals.is_empty() {
        return 0;
    }
    headers.remove(SET_COOKIE);

    let mut written = 0;
    for original in originals {
        let Some(mut cookie) = original.to_str().ok().and_then(SetCookie::parse) else {
            tracing::warn!(value = ?original, "dropping unparseable set-cookie");
            continue;
        };
        cookie.domain = Some(hostname.to_string());

        match HeaderValue::from_str(&cookie.to_string()) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
                written += 1;
            }
            Err(e) => {
                tracing::warn!(cookie = %cookie.name, error = %e, "dropping rewritten set-cookie");
            }
        }
    }
    written
}

/// Strips the port from a `host[:port]` authority, leaving IPv6 literals
/// bracketed.
#[must_use]
pub fn hostname_of(authority: &str) -> &str {
    if authority.starts_with('[') {
        return authority
            .find(']')
            .map_or(authority, |end| &authority[..=end]);
    }
    authority
        .rsplit_once(':')
        .map_or(authority, |(host, _port)| host)
}
