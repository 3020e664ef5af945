//! The request handed through the filter chain.
//!
//! Filters may change headers and cookies. The metadata captured when the
//! chain starts stays readable through [`RequestMeta`].

use crate::cookie::{Cookie, Cookies};
use crate::error::{require_non_empty, Error, Result};
use http::header::{HeaderName, HeaderValue, COOKIE};
use http::{HeaderMap, Method};
use url::Url;

/// A mutable outgoing request.
#[derive(Debug, Clone)]
pub struct FilterableRequest {
    method: Method,
    uri: Url,
    original_path: String,
    headers: HeaderMap,
    cookies: Cookies,
}

impl FilterableRequest {
    /// Request for a fully-qualified URI.
    pub fn new(method: Method, uri: &str) -> Result<Self> {
        require_non_empty(uri, "URI")?;
        let uri = parse_uri(uri)?;
        let original_path = uri.path().to_string();
        Ok(Self {
            method,
            uri,
            original_path,
            headers: HeaderMap::new(),
            cookies: Cookies::new(),
        })
    }

    /// Request whose path is a template such as `/users/{id}`. Each `{name}`
    /// is replaced by the percent-encoded value from `params`; the template
    /// itself stays available as [`original_path`](Self::original_path).
    pub fn with_path_template(
        method: Method,
        base_uri: &str,
        template: &str,
        params: &[(&str, &str)],
    ) -> Result<Self> {
        require_non_empty(base_uri, "Base URI")?;
        let mut path = template.to_string();
        for (name, value) in params {
            path = path.replace(&format!("{{{name}}}"), &urlencoding::encode(value));
        }
        let base = parse_uri(base_uri)?;
        let uri = base.join(&path).map_err(|source| Error::InvalidUri {
            uri: path.clone(),
            source,
        })?;
        Ok(Self {
            method,
            uri,
            original_path: template.to_string(),
            headers: HeaderMap::new(),
            cookies: Cookies::new(),
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Path as given before template expansion.
    pub fn original_path(&self) -> &str {
        &self.original_path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Append a header.
    pub fn header(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::Config(format!("invalid header name '{name}'")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::Config(format!("invalid value for header '{name}'")))?;
        self.headers.append(name, value);
        Ok(self)
    }

    pub fn cookies(&self) -> &Cookies {
        &self.cookies
    }

    pub fn cookies_mut(&mut self) -> &mut Cookies {
        &mut self.cookies
    }

    pub fn cookie(&mut self, name: &str, value: &str) -> &mut Self {
        self.cookies.add(Cookie::new(name, value));
        self
    }

    pub fn add_cookie(&mut self, cookie: Cookie) -> &mut Self {
        self.cookies.add(cookie);
        self
    }

    /// Set the session cookie `session_id_name` unless the request already
    /// carries one.
    pub fn session_id(&mut self, session_id_name: &str, value: &str) -> &mut Self {
        if !self.cookies.has_cookie_with_name(session_id_name) {
            self.cookie(session_id_name, value);
        }
        self
    }

    /// Headers as they go on the wire: explicit headers plus a `Cookie`
    /// header rendered from the cookie collection.
    pub fn wire_headers(&self) -> HeaderMap {
        let mut headers = self.headers.clone();
        if let Some(value) = self.cookies.to_header_value() {
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.append(COOKIE, value);
            }
        }
        headers
    }

    pub fn meta(&self) -> RequestMeta {
        RequestMeta {
            method: self.method.clone(),
            path: self.path().to_string(),
            uri: self.uri.to_string(),
            original_path: self.original_path.clone(),
        }
    }
}

fn parse_uri(uri: &str) -> Result<Url> {
    Url::parse(uri).map_err(|source| Error::InvalidUri {
        uri: uri.to_string(),
        source,
    })
}

/// Read-only request metadata captured when the chain starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMeta {
    pub method: Method,
    pub path: String,
    pub uri: String,
    pub original_path: String,
}
