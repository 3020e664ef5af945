use super::{Filter, FilterContext};
use crate::error::Result;
use crate::request::FilterableRequest;
use crate::response::Response;
use crate::response_spec::ResponseSpec;
use std::time::Instant;

/// Measures the time spent in the rest of the chain.
///
/// The elapsed milliseconds are stored as a `u64` under
/// [`TimingFilter::RESPONSE_TIME_MILLIS`] once the response is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingFilter;

impl TimingFilter {
    pub const RESPONSE_TIME_MILLIS: &'static str = "rift_assert.response_time_millis";

    pub fn new() -> Self {
        Self
    }
}

impl Filter for TimingFilter {
    fn apply(
        &self,
        request: &mut FilterableRequest,
        response_spec: &ResponseSpec,
        ctx: &mut FilterContext<'_>,
    ) -> Result<Response> {
        let start = Instant::now();
        let response = ctx.proceed(request, response_spec)?;
        let elapsed = start.elapsed().as_millis() as u64;
        ctx.set(Self::RESPONSE_TIME_MILLIS, elapsed);
        tracing::debug!(elapsed_ms = elapsed, uri = %request.uri(), "Response received");
        Ok(response)
    }

    fn name(&self) -> &str {
        "timing-filter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterChain;
    use bytes::Bytes;
    use http::{HeaderMap, Method, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_records_elapsed_millis() {
        let mut chain = FilterChain::new(Arc::new(|_: &FilterableRequest| -> Result<Response> {
            std::thread::sleep(Duration::from_millis(20));
            Ok(Response::new(StatusCode::OK, HeaderMap::new(), Bytes::new()))
        }));
        chain.register(TimingFilter::new());

        let execution = chain
            .execute_all(
                FilterableRequest::new(Method::GET, "http://localhost/slow").unwrap(),
                &ResponseSpec::new(),
            )
            .unwrap();

        let elapsed = execution
            .values
            .get::<u64>(TimingFilter::RESPONSE_TIME_MILLIS)
            .copied()
            .unwrap();
        assert!(elapsed >= 20, "elapsed was {elapsed}");
    }

    #[test]
    fn test_no_value_when_transport_fails() {
        let mut chain = FilterChain::new(Arc::new(|_: &FilterableRequest| -> Result<Response> {
            Err(crate::Error::Transport("refused".into()))
        }));
        chain.register(TimingFilter::new());

        let result = chain.execute_all(
            FilterableRequest::new(Method::GET, "http://localhost/").unwrap(),
            &ResponseSpec::new(),
        );
        assert!(result.is_err());
    }
}
