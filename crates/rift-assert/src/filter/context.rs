//! Per-request filter state.

use super::{Filter, Transport};
use crate::error::Result;
use crate::request::{FilterableRequest, RequestMeta};
use crate::response::Response;
use crate::response_spec::ResponseSpec;
use http::Method;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// String-keyed bag of arbitrary values shared by the filters of one request.
#[derive(Default)]
pub struct FilterValues {
    values: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl FilterValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Box::new(value));
    }

    /// Value stored under `key`, if present and of type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|value| value.downcast_ref::<T>())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for FilterValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("FilterValues").field("keys", &keys).finish()
    }
}

/// Shared state and continuation handle for one filter invocation.
pub struct FilterContext<'a> {
    remaining: &'a [Arc<dyn Filter>],
    transport: &'a dyn Transport,
    values: &'a mut FilterValues,
    meta: &'a RequestMeta,
}

impl<'a> FilterContext<'a> {
    pub(crate) fn new(
        remaining: &'a [Arc<dyn Filter>],
        transport: &'a dyn Transport,
        values: &'a mut FilterValues,
        meta: &'a RequestMeta,
    ) -> Self {
        Self {
            remaining,
            transport,
            values,
            meta,
        }
    }

    /// Run the rest of the chain and return its response. The last link
    /// sends the request through the transport.
    pub fn proceed(
        &mut self,
        request: &mut FilterableRequest,
        response_spec: &ResponseSpec,
    ) -> Result<Response> {
        match self.remaining.split_first() {
            Some((next, rest)) => {
                tracing::trace!(filter = next.name(), "Invoking filter");
                let mut ctx =
                    FilterContext::new(rest, self.transport, &mut *self.values, self.meta);
                next.apply(request, response_spec, &mut ctx)
            }
            None => {
                tracing::debug!(
                    method = %request.method(),
                    uri = %request.uri(),
                    "Sending request"
                );
                self.transport.send(request)
            }
        }
    }

    pub fn set<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.set(key, value);
    }

    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.has(key)
    }

    pub fn values(&self) -> &FilterValues {
        self.values
    }

    pub fn method(&self) -> &Method {
        &self.meta.method
    }

    pub fn path(&self) -> &str {
        &self.meta.path
    }

    /// Fully-qualified request URI.
    pub fn uri(&self) -> &str {
        &self.meta.uri
    }

    /// Path before template expansion.
    pub fn original_path(&self) -> &str {
        &self.meta.original_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_typed_access() {
        let mut values = FilterValues::new();
        values.set("elapsed", 42u64);
        values.set("label", "fast".to_string());

        assert!(values.has("elapsed"));
        assert_eq!(values.get::<u64>("elapsed"), Some(&42));
        assert_eq!(values.get::<String>("label").map(String::as_str), Some("fast"));
        // Wrong type reads as absent
        assert_eq!(values.get::<i32>("elapsed"), None);
        assert!(!values.has("missing"));

        assert!(values.remove("elapsed"));
        assert_eq!(values.len(), 1);
    }
}
