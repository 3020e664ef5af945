//! Priority-ordered filter chain.

use super::context::{FilterContext, FilterValues};
use super::{Filter, Transport};
use crate::error::Result;
use crate::request::FilterableRequest;
use crate::response::Response;
use crate::response_spec::ResponseSpec;
use std::sync::Arc;

/// Filters kept sorted by ascending priority. Equal priorities keep their
/// registration order.
pub struct FilterChain {
    filters: Vec<Arc<dyn Filter>>,
    transport: Arc<dyn Transport>,
}

/// Outcome of one chain execution.
#[derive(Debug)]
pub struct Execution {
    pub response: Response,
    /// The request as the last filter left it.
    pub request: FilterableRequest,
    /// Values written by filters during the execution.
    pub values: FilterValues,
}

impl FilterChain {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            filters: Vec::new(),
            transport,
        }
    }

    pub fn register<F: Filter + 'static>(&mut self, filter: F) -> &mut Self {
        self.register_shared(Arc::new(filter))
    }

    /// Register a filter that is also held elsewhere, such as a cookie jar
    /// shared by several chains.
    pub fn register_shared(&mut self, filter: Arc<dyn Filter>) -> &mut Self {
        self.filters.push(filter);
        self.sort();
        self
    }

    pub fn register_all<I>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = Arc<dyn Filter>>,
    {
        self.filters.extend(filters);
        self.sort();
        self
    }

    /// Drop every registered filter and register `filters` in their place.
    pub fn replace_all<I>(&mut self, filters: I) -> &mut Self
    where
        I: IntoIterator<Item = Arc<dyn Filter>>,
    {
        self.filters = filters.into_iter().collect();
        self.sort();
        self
    }

    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    fn sort(&mut self) {
        // `sort_by_key` is stable
        self.filters.sort_by_key(|filter| filter.priority());
    }

    /// Run `request` through every filter and the transport.
    pub fn execute_all(
        &self,
        mut request: FilterableRequest,
        response_spec: &ResponseSpec,
    ) -> Result<Execution> {
        let meta = request.meta();
        let mut values = FilterValues::new();
        tracing::debug!(
            method = %meta.method,
            uri = %meta.uri,
            filters = self.filters.len(),
            "Executing filter chain"
        );

        let response = {
            let mut ctx =
                FilterContext::new(&self.filters, self.transport.as_ref(), &mut values, &meta);
            ctx.proceed(&mut request, response_spec)?
        };

        tracing::debug!(status = response.status_code(), "Filter chain completed");
        Ok(Execution {
            response,
            request,
            values,
        })
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filters: Vec<(&str, i32)> = self
            .filters
            .iter()
            .map(|filter| (filter.name(), filter.priority()))
            .collect();
        f.debug_struct("FilterChain").field("filters", &filters).finish()
    }
}
