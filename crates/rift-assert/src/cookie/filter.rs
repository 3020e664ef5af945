//! Cookie jar filter.

use super::origin::{domain_matches, CookieOrigin};
use super::parse::parse_set_cookie;
use super::store::{CookieStore, InMemoryCookieStore};
use crate::config::CookieConfig;
use crate::error::Result;
use crate::filter::{Filter, FilterContext};
use crate::request::FilterableRequest;
use crate::response::Response;
use crate::response_spec::ResponseSpec;
use std::sync::Arc;

/// Replays stored cookies on origin-matching requests and stores the cookies
/// every response sets.
///
/// The filter is cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct CookieFilter {
    store: Arc<dyn CookieStore>,
    allow_duplicate_names: bool,
}

impl CookieFilter {
    pub fn new() -> Self {
        Self::with_store(Arc::new(InMemoryCookieStore::new()))
    }

    pub fn with_store(store: Arc<dyn CookieStore>) -> Self {
        Self {
            store,
            allow_duplicate_names: false,
        }
    }

    pub fn from_config(config: &CookieConfig) -> Self {
        Self::new().allow_duplicate_names(config.allow_duplicate_names)
    }

    /// Attach stored cookies even when the request already carries a cookie
    /// with the same name.
    pub fn allow_duplicate_names(mut self, allow: bool) -> Self {
        self.allow_duplicate_names = allow;
        self
    }

    pub fn store(&self) -> &Arc<dyn CookieStore> {
        &self.store
    }

    fn attach_matching(&self, request: &mut FilterableRequest, origin: &CookieOrigin) {
        for cookie in self.store.matching(origin) {
            if !self.allow_duplicate_names && request.cookies().has_cookie_with_name(cookie.name())
            {
                tracing::trace!(cookie = cookie.name(), "Cookie already set on request");
                continue;
            }
            request.add_cookie(cookie);
        }
    }

    fn store_response_cookies(&self, response: &Response, origin: &CookieOrigin) {
        for header in response.set_cookie_values() {
            let cookie = match parse_set_cookie(header, Some(origin)) {
                Ok(cookie) => cookie,
                Err(e) => {
                    tracing::warn!("Ignoring malformed Set-Cookie header: {}", e);
                    continue;
                }
            };
            if let Some(domain) = cookie.domain() {
                if !domain_matches(origin.host(), domain) {
                    tracing::warn!(
                        cookie = cookie.name(),
                        "Ignoring cookie for domain '{}' set by host '{}'",
                        domain,
                        origin.host()
                    );
                    continue;
                }
            }
            self.store.add(cookie);
        }
    }
}

impl Default for CookieFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CookieFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CookieFilter")
            .field("stored", &self.store.len())
            .field("allow_duplicate_names", &self.allow_duplicate_names)
            .finish()
    }
}

impl Filter for CookieFilter {
    fn apply(
        &self,
        request: &mut FilterableRequest,
        response_spec: &ResponseSpec,
        ctx: &mut FilterContext<'_>,
    ) -> Result<Response> {
        let Some(origin) = CookieOrigin::from_url(request.uri()) else {
            tracing::debug!(uri = %request.uri(), "No cookie origin for request");
            return ctx.proceed(request, response_spec);
        };

        self.attach_matching(request, &origin);
        let response = ctx.proceed(request, response_spec)?;
        self.store_response_cookies(&response, &origin);
        Ok(response)
    }

    fn name(&self) -> &str {
        "cookie-filter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterChain, Transport};
    use bytes::Bytes;
    use http::{HeaderMap, HeaderValue, Method, StatusCode};
    use parking_lot::Mutex;
    use tracing_test::traced_test;

    /// Transport that answers with fixed Set-Cookie headers and records the
    /// Cookie header of every request.
    fn transport(
        set_cookies: &'static [&'static str],
        seen: Arc<Mutex<Vec<String>>>,
    ) -> Arc<dyn Transport> {
        Arc::new(move |request: &FilterableRequest| -> Result<Response> {
            seen.lock().push(request.cookies().to_header_value().unwrap_or_default());
            let mut headers = HeaderMap::new();
            for value in set_cookies {
                headers.append("set-cookie", HeaderValue::from_static(value));
            }
            Ok(Response::new(StatusCode::OK, headers, Bytes::new()))
        })
    }

    #[test]
    fn test_replays_cookies_for_matching_origin() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let jar = CookieFilter::new();
        let mut chain = FilterChain::new(transport(&["session=abc", "lang=en"], seen.clone()));
        chain.register(jar.clone());

        let spec = ResponseSpec::new();
        chain
            .execute_all(FilterableRequest::new(Method::GET, "https://a.com/path").unwrap(), &spec)
            .unwrap();
        chain
            .execute_all(FilterableRequest::new(Method::GET, "https://a.com/path/x").unwrap(), &spec)
            .unwrap();
        chain
            .execute_all(FilterableRequest::new(Method::GET, "https://b.com/path").unwrap(), &spec)
            .unwrap();

        let seen = seen.lock();
        assert_eq!(seen[0], "");
        assert_eq!(seen[1], "session=abc; lang=en");
        assert_eq!(seen[2], "");
        assert_eq!(jar.store().len(), 2);
    }

    #[test]
    fn test_explicit_cookie_wins_over_stored() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let jar = CookieFilter::new();
        let mut chain = FilterChain::new(transport(&["foo=stored"], seen.clone()));
        chain.register(jar);

        let spec = ResponseSpec::new();
        chain
            .execute_all(FilterableRequest::new(Method::GET, "http://a.com/").unwrap(), &spec)
            .unwrap();
        let mut request = FilterableRequest::new(Method::GET, "http://a.com/").unwrap();
        request.cookie("foo", "explicit");
        let execution = chain.execute_all(request, &spec).unwrap();

        assert_eq!(execution.request.cookies().get_all("foo").len(), 1);
        assert_eq!(seen.lock()[1], "foo=explicit");
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut chain = FilterChain::new(transport(&["foo=stored"], seen.clone()));
        chain.register(CookieFilter::new().allow_duplicate_names(true));

        let spec = ResponseSpec::new();
        chain
            .execute_all(FilterableRequest::new(Method::GET, "http://a.com/").unwrap(), &spec)
            .unwrap();
        let mut request = FilterableRequest::new(Method::GET, "http://a.com/").unwrap();
        request.cookie("foo", "explicit");
        chain.execute_all(request, &spec).unwrap();

        assert_eq!(seen.lock()[1], "foo=explicit; foo=stored");
    }

    #[test]
    fn test_stored_same_name_cookies_with_different_paths() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let jar = CookieFilter::new();
        let mut chain = FilterChain::new(transport(
            &["cookieName=xxx; Path=/bar", "cookieName=yyy; Path=/"],
            seen.clone(),
        ));
        chain.register(jar.clone());

        let spec = ResponseSpec::new();
        chain
            .execute_all(FilterableRequest::new(Method::GET, "http://localhost/bar").unwrap(), &spec)
            .unwrap();
        assert_eq!(jar.store().len(), 2);

        let execution = chain
            .execute_all(FilterableRequest::new(Method::GET, "http://localhost/bar").unwrap(), &spec)
            .unwrap();
        // Longest path first; the second one shares its name
        assert_eq!(execution.request.cookies().get_value("cookieName"), Some("xxx"));
        assert_eq!(execution.request.cookies().len(), 1);

        let mut chain = FilterChain::new(transport(&[], Arc::new(Mutex::new(Vec::new()))));
        chain.register(CookieFilter::with_store(Arc::clone(jar.store())).allow_duplicate_names(true));
        let execution = chain
            .execute_all(FilterableRequest::new(Method::GET, "http://localhost/bar").unwrap(), &spec)
            .unwrap();
        assert_eq!(execution.request.cookies().len(), 2);
    }

    #[test]
    fn test_secure_cookie_only_sent_over_https() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut chain = FilterChain::new(transport(&["token=t; Secure"], seen.clone()));
        chain.register(CookieFilter::new());

        let spec = ResponseSpec::new();
        for uri in ["https://a.com/", "http://a.com/", "https://a.com/"] {
            chain
                .execute_all(FilterableRequest::new(Method::GET, uri).unwrap(), &spec)
                .unwrap();
        }

        let seen = seen.lock();
        assert_eq!(seen[1], "");
        assert_eq!(seen[2], "token=t");
    }

    #[traced_test]
    #[test]
    fn test_cookie_for_foreign_domain_is_not_stored() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let jar = CookieFilter::new();
        let mut chain = FilterChain::new(transport(
            &["sid=evil; Domain=b.com; Path=/", "lang=en; Domain=.a.com; Path=/"],
            seen.clone(),
        ));
        chain.register(jar.clone());

        let spec = ResponseSpec::new();
        chain
            .execute_all(FilterableRequest::new(Method::GET, "https://a.com/path").unwrap(), &spec)
            .unwrap();
        assert_eq!(jar.store().len(), 1);

        for uri in ["https://b.com/", "https://www.a.com/"] {
            chain
                .execute_all(FilterableRequest::new(Method::GET, uri).unwrap(), &spec)
                .unwrap();
        }

        let seen = seen.lock();
        assert_eq!(seen[1], "");
        assert_eq!(seen[2], "lang=en");
        assert!(logs_contain("Ignoring cookie for domain 'b.com' set by host 'a.com'"));
    }

    #[traced_test]
    #[test]
    fn test_malformed_set_cookie_is_skipped() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let jar = CookieFilter::new();
        let mut chain = FilterChain::new(transport(&["=nameless", "ok=1"], seen));
        chain.register(jar.clone());

        let execution = chain.execute_all(
            FilterableRequest::new(Method::GET, "http://a.com/").unwrap(),
            &ResponseSpec::new(),
        );

        assert!(execution.is_ok());
        assert_eq!(jar.store().len(), 1);
        assert!(logs_contain("Ignoring malformed Set-Cookie header"));
    }
}
