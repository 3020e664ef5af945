//! Request/response filter pipeline.
//!
//! Filters run in ascending priority order. Each filter receives a
//! [`FilterContext`] whose [`proceed`](FilterContext::proceed) invokes the rest
//! of the chain; the last link hands the request to the [`Transport`]. A
//! filter that returns a response without calling `proceed` stops the chain.
//!
//! # Module Structure
//!
//! - `chain` - Priority-ordered filter registration and execution
//! - `context` - Per-request value bag and continuation handle
//! - `timing` - Response time measurement
//! - `session` - Session id replay
//! - `logging` - Request/response logging through `tracing`

mod chain;
mod context;
mod logging;
mod session;
mod timing;

pub use chain::{Execution, FilterChain};
pub use context::{FilterContext, FilterValues};
pub use logging::{
    render_request, render_response, LogDetail, RequestLoggingFilter, ResponseLoggingFilter,
};
pub use session::SessionFilter;
pub use timing::TimingFilter;

use crate::error::Result;
use crate::request::FilterableRequest;
use crate::response::Response;
use crate::response_spec::ResponseSpec;

/// Priority of filters that do not declare one.
pub const DEFAULT_PRIORITY: i32 = 1000;

/// A pluggable interceptor in the request/response pipeline.
pub trait Filter: Send + Sync {
    fn apply(
        &self,
        request: &mut FilterableRequest,
        response_spec: &ResponseSpec,
        ctx: &mut FilterContext<'_>,
    ) -> Result<Response>;

    /// Execution priority; lower runs earlier.
    fn priority(&self) -> i32 {
        DEFAULT_PRIORITY
    }

    /// Name used in diagnostics.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Give this filter an explicit priority.
    fn with_priority(self, priority: i32) -> Ordered<Self>
    where
        Self: Sized,
    {
        Ordered {
            inner: self,
            priority,
        }
    }
}

/// A filter with an explicit priority.
#[derive(Debug, Clone)]
pub struct Ordered<F> {
    inner: F,
    priority: i32,
}

impl<F> Ordered<F> {
    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: Filter> Filter for Ordered<F> {
    fn apply(
        &self,
        request: &mut FilterableRequest,
        response_spec: &ResponseSpec,
        ctx: &mut FilterContext<'_>,
    ) -> Result<Response> {
        self.inner.apply(request, response_spec, ctx)
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Filter built from a closure.
pub struct FilterFn<F> {
    name: String,
    f: F,
}

/// Wrap a closure as a filter.
pub fn filter_fn<F>(name: impl Into<String>, f: F) -> FilterFn<F>
where
    F: Fn(&mut FilterableRequest, &ResponseSpec, &mut FilterContext<'_>) -> Result<Response>
        + Send
        + Sync,
{
    FilterFn {
        name: name.into(),
        f,
    }
}

impl<F> Filter for FilterFn<F>
where
    F: Fn(&mut FilterableRequest, &ResponseSpec, &mut FilterContext<'_>) -> Result<Response>
        + Send
        + Sync,
{
    fn apply(
        &self,
        request: &mut FilterableRequest,
        response_spec: &ResponseSpec,
        ctx: &mut FilterContext<'_>,
    ) -> Result<Response> {
        (self.f)(request, response_spec, ctx)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Terminal link of the chain: sends the request over the network.
pub trait Transport: Send + Sync {
    fn send(&self, request: &FilterableRequest) -> Result<Response>;
}

impl<F> Transport for F
where
    F: Fn(&FilterableRequest) -> Result<Response> + Send + Sync,
{
    fn send(&self, request: &FilterableRequest) -> Result<Response> {
        self(request)
    }
}
