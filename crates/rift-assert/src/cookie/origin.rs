//! Cookie origin derived from a request URI, and the visibility rules that
//! decide whether a stored cookie is sent to it.

use super::types::Cookie;
use std::net::IpAddr;
use url::Url;

/// Port assumed when the request URI carries none.
pub const DEFAULT_PORT: u16 = 80;

/// The (host, port, path, secure) tuple of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOrigin {
    host: String,
    port: u16,
    path: String,
    secure: bool,
}

impl CookieOrigin {
    pub fn new(host: impl Into<String>, port: u16, path: impl Into<String>, secure: bool) -> Self {
        let path = path.into();
        Self {
            host: host.into().to_ascii_lowercase(),
            port,
            path: if path.is_empty() { "/".to_string() } else { path },
            secure,
        }
    }

    /// Origin of a request URI. `None` for URIs without a host.
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        let secure = matches!(url.scheme(), "https" | "wss");
        Some(Self::new(
            host,
            url.port().unwrap_or(DEFAULT_PORT),
            url.path(),
            secure,
        ))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Whether `cookie` may be sent to this origin.
    pub fn matches(&self, cookie: &Cookie) -> bool {
        if cookie.is_secure() && !self.secure {
            return false;
        }
        let domain_ok = match cookie.domain() {
            Some(domain) => domain_matches(&self.host, domain),
            None => false,
        };
        domain_ok && path_matches(&self.path, cookie.path().unwrap_or("/"))
    }
}

/// Suffix match on label boundaries. A leading dot on the cookie domain is
/// ignored. IP address hosts only match themselves.
pub fn domain_matches(host: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }
    let host = host.to_ascii_lowercase();
    if host == domain {
        return true;
    }
    !is_ip_address(&host)
        && host.len() > domain.len()
        && host.ends_with(&domain)
        && host.as_bytes()[host.len() - domain.len() - 1] == b'.'
}

fn is_ip_address(host: &str) -> bool {
    host.trim_start_matches('[')
        .trim_end_matches(']')
        .parse::<IpAddr>()
        .is_ok()
}

/// Prefix match on segment boundaries.
pub fn path_matches(request_path: &str, cookie_path: &str) -> bool {
    if cookie_path.is_empty() || cookie_path == "/" {
        return true;
    }
    if request_path == cookie_path {
        return true;
    }
    request_path.starts_with(cookie_path)
        && (cookie_path.ends_with('/') || request_path[cookie_path.len()..].starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(uri: &str) -> CookieOrigin {
        CookieOrigin::from_url(&Url::parse(uri).unwrap()).unwrap()
    }

    #[test]
    fn test_origin_from_url() {
        let o = origin("https://Example.com/path/item?x=1");
        assert_eq!(o.host(), "example.com");
        assert_eq!(o.port(), DEFAULT_PORT);
        assert_eq!(o.path(), "/path/item");
        assert!(o.is_secure());

        let o = origin("http://localhost:8080");
        assert_eq!(o.port(), 8080);
        assert_eq!(o.path(), "/");
        assert!(!o.is_secure());
    }

    #[test]
    fn test_domain_matches() {
        assert!(domain_matches("test.com", ".test.com"));
        assert!(domain_matches("api.test.com", ".test.com"));
        assert!(domain_matches("api.test.com", "test.com"));
        assert!(!domain_matches("mytest.com", "test.com"));
        assert!(!domain_matches("b.com", "a.com"));
        assert!(!domain_matches("a.com", "."));
    }

    #[test]
    fn test_ip_hosts_match_exactly() {
        assert!(domain_matches("10.0.0.1", "10.0.0.1"));
        assert!(!domain_matches("10.0.0.1", "0.0.1"));
        assert!(!domain_matches("10.0.0.1", ".0.1"));
        assert!(domain_matches("[::1]", "[::1]"));

        let cookie = Cookie::builder("id", Some("1".into()))
            .domain("0.0.1")
            .path("/")
            .build();
        assert!(!origin("http://10.0.0.1/").matches(&cookie));
    }

    #[test]
    fn test_path_matches() {
        assert!(path_matches("/path", "/path"));
        assert!(path_matches("/path/child", "/path"));
        assert!(path_matches("/path/child", "/path/"));
        assert!(path_matches("/anything", "/"));
        assert!(!path_matches("/pathology", "/path"));
        assert!(!path_matches("/other", "/path"));
    }

    #[test]
    fn test_secure_cookie_only_to_secure_origin() {
        let cookie = Cookie::builder("id", Some("1".into()))
            .domain("a.com")
            .path("/")
            .secure(true)
            .build();
        assert!(origin("https://a.com/").matches(&cookie));
        assert!(!origin("http://a.com/").matches(&cookie));
    }

    #[test]
    fn test_visibility_by_host_and_path() {
        let cookie = Cookie::builder("id", Some("1".into()))
            .domain("a.com")
            .path("/path")
            .build();
        assert!(origin("https://a.com/path/x").matches(&cookie));
        assert!(!origin("https://a.com/other").matches(&cookie));
        assert!(!origin("https://b.com/path").matches(&cookie));
    }
}
