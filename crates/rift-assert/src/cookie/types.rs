//! Cookie value type and the ordered cookie collection carried by requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version reported for cookies whose `Set-Cookie` header carries no
/// `Version` attribute.
pub const UNDEFINED_VERSION: i32 = -1;

/// An HTTP cookie.
///
/// Immutable once built. `max_age` is stored exactly as received: a negative
/// or zero value does not mark the cookie as expired, and `expiry` is never
/// enforced by the jar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    name: String,
    value: Option<String>,
    domain: Option<String>,
    path: Option<String>,
    max_age: Option<i64>,
    expiry: Option<DateTime<Utc>>,
    secure: bool,
    http_only: bool,
    same_site: Option<String>,
    version: i32,
    comment: Option<String>,
}

impl Cookie {
    /// A plain `name=value` cookie without attributes.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        CookieBuilder::new(name, Some(value.into())).build()
    }

    pub fn builder(name: impl Into<String>, value: Option<String>) -> CookieBuilder {
        CookieBuilder::new(name, value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn max_age(&self) -> Option<i64> {
        self.max_age
    }

    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    pub fn same_site(&self) -> Option<&str> {
        self.same_site.as_deref()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Render as it appears in a `Cookie` request header.
    pub fn to_request_pair(&self) -> String {
        match &self.value {
            Some(value) => format!("{}={}", self.name, value),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Cookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_request_pair())?;
        if let Some(comment) = &self.comment {
            write!(f, ";Comment={comment}")?;
        }
        if let Some(path) = &self.path {
            write!(f, ";Path={path}")?;
        }
        if let Some(domain) = &self.domain {
            write!(f, ";Domain={domain}")?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, ";Max-Age={max_age}")?;
        }
        if self.secure {
            f.write_str(";Secure")?;
        }
        if let Some(expiry) = &self.expiry {
            write!(f, ";Expires={}", expiry.format("%a, %d %b %Y %H:%M:%S GMT"))?;
        }
        if self.version != UNDEFINED_VERSION {
            write!(f, ";Version={}", self.version)?;
        }
        if self.http_only {
            f.write_str(";HttpOnly")?;
        }
        if let Some(same_site) = &self.same_site {
            write!(f, ";SameSite={same_site}")?;
        }
        Ok(())
    }
}

/// Builds a [`Cookie`] one attribute at a time.
#[derive(Debug, Clone)]
pub struct CookieBuilder {
    cookie: Cookie,
}

impl CookieBuilder {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            cookie: Cookie {
                name: name.into(),
                value,
                domain: None,
                path: None,
                max_age: None,
                expiry: None,
                secure: false,
                http_only: false,
                same_site: None,
                version: UNDEFINED_VERSION,
                comment: None,
            },
        }
    }

    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie.domain = Some(domain.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.cookie.path = Some(path.into());
        self
    }

    pub fn max_age(mut self, max_age: i64) -> Self {
        self.cookie.max_age = Some(max_age);
        self
    }

    pub fn expiry(mut self, expiry: DateTime<Utc>) -> Self {
        self.cookie.expiry = Some(expiry);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.cookie.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.cookie.http_only = http_only;
        self
    }

    pub fn same_site(mut self, same_site: impl Into<String>) -> Self {
        self.cookie.same_site = Some(same_site.into());
        self
    }

    pub fn version(mut self, version: i32) -> Self {
        self.cookie.version = version;
        self
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.cookie.comment = Some(comment.into());
        self
    }

    pub fn has_domain(&self) -> bool {
        self.cookie.domain.is_some()
    }

    pub fn has_path(&self) -> bool {
        self.cookie.path.is_some()
    }

    pub fn build(self) -> Cookie {
        self.cookie
    }
}

/// Ordered cookie collection. Several cookies may share a name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookies {
    cookies: Vec<Cookie>,
}

impl Cookies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, cookie: Cookie) {
        self.cookies.push(cookie);
    }

    pub fn has_cookie_with_name(&self, name: &str) -> bool {
        self.cookies.iter().any(|c| c.name == name)
    }

    /// First cookie with the given name.
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    pub fn get_value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Cookie::value)
    }

    pub fn get_all(&self, name: &str) -> Vec<&Cookie> {
        self.cookies.iter().filter(|c| c.name == name).collect()
    }

    /// Drop every cookie with the given name.
    pub fn remove(&mut self, name: &str) {
        self.cookies.retain(|c| c.name != name);
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cookie> {
        self.cookies.iter()
    }

    /// Value for a `Cookie` request header, if any cookie is present.
    pub fn to_header_value(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(Cookie::to_request_pair)
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

impl fmt::Display for Cookies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.cookies.iter().map(Cookie::to_string).collect();
        f.write_str(&rendered.join("\n"))
    }
}

impl FromIterator<Cookie> for Cookies {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        Self {
            cookies: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Cookies {
    type Item = &'a Cookie;
    type IntoIter = std::slice::Iter<'a, Cookie>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.iter()
    }
}
