//! Cookie storage shared across requests.
//!
//! A jar usually serves many requests, possibly from several threads at once,
//! so stores take `&self` and synchronize internally.

use super::origin::CookieOrigin;
use super::types::Cookie;
use parking_lot::RwLock;

/// Backend-agnostic cookie storage.
pub trait CookieStore: Send + Sync {
    /// Add a cookie, replacing a stored cookie with the same name, domain
    /// and path.
    fn add(&self, cookie: Cookie);

    /// Cookies visible to `origin`, longest path first.
    fn matching(&self, origin: &CookieOrigin) -> Vec<Cookie>;

    /// Snapshot of every stored cookie in insertion order.
    fn cookies(&self) -> Vec<Cookie>;

    fn clear(&self);

    fn len(&self) -> usize {
        self.cookies().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory store guarded by a read/write lock.
#[derive(Debug, Default)]
pub struct InMemoryCookieStore {
    cookies: RwLock<Vec<Cookie>>,
}

impl InMemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_identity(a: &Cookie, b: &Cookie) -> bool {
    fn domain_key(cookie: &Cookie) -> String {
        cookie
            .domain()
            .unwrap_or_default()
            .trim_start_matches('.')
            .to_ascii_lowercase()
    }
    a.name() == b.name()
        && domain_key(a) == domain_key(b)
        && a.path().unwrap_or("/") == b.path().unwrap_or("/")
}

impl CookieStore for InMemoryCookieStore {
    fn add(&self, cookie: Cookie) {
        let mut cookies = self.cookies.write();
        match cookies.iter_mut().find(|stored| same_identity(stored, &cookie)) {
            Some(stored) => *stored = cookie,
            None => cookies.push(cookie),
        }
    }

    fn matching(&self, origin: &CookieOrigin) -> Vec<Cookie> {
        let mut matched: Vec<Cookie> = self
            .cookies
            .read()
            .iter()
            .filter(|cookie| origin.matches(cookie))
            .cloned()
            .collect();
        // Stable: equal path lengths keep insertion order
        matched.sort_by_key(|cookie| std::cmp::Reverse(cookie.path().map_or(0, str::len)));
        matched
    }

    fn cookies(&self) -> Vec<Cookie> {
        self.cookies.read().clone()
    }

    fn clear(&self) {
        self.cookies.write().clear();
    }

    fn len(&self) -> usize {
        self.cookies.read().len()
    }
}
