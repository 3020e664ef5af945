//! HTTP response assertion toolkit for Rift.
//!
//! The crate provides the pieces a test client needs between "send a
//! request" and "report what was wrong with the response":
//!
//! - a priority-ordered [`FilterChain`] that intercepts requests and
//!   responses, hosting the cookie jar, timing, session and logging filters;
//! - a [`CookieFilter`] that replays stored cookies on origin-matching
//!   requests;
//! - a [`ContentTypeRegistry`] that picks a body parser from the
//!   `Content-Type` header;
//! - [`BodyMatcher`]s and [`CookieAssertion`]s that validate the response and
//!   report failures as [`ValidationResult`]s.
//!
//! # Example
//!
//! ```no_run
//! use rift_assert::matcher::equal_to;
//! use rift_assert::{
//!     AssertConfig, BodyMatcher, ContentTypeRegistry, CookieFilter, FilterChain,
//!     FilterableRequest, Response, ResponseSpec,
//! };
//!
//! # fn send(_: &FilterableRequest) -> rift_assert::Result<Response> { unimplemented!() }
//! let mut chain = FilterChain::new(std::sync::Arc::new(send));
//! chain.register(CookieFilter::new());
//!
//! let spec = ResponseSpec::new()
//!     .status_code(200)
//!     .body(BodyMatcher::path("user.name", equal_to("Ann"))?);
//!
//! let request = FilterableRequest::new(http::Method::GET, "http://localhost:8080/users/1")?;
//! let execution = chain.execute_all(request, &spec)?;
//! let results = spec.validate(
//!     &execution.response,
//!     &ContentTypeRegistry::new(),
//!     &AssertConfig::default(),
//! );
//! # Ok::<(), rift_assert::Error>(())
//! ```

pub mod assertion;
pub mod config;
pub mod content;
pub mod cookie;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod request;
pub mod response;
pub mod response_spec;

pub use assertion::{
    BodyMatcher, BodyMatcherGroup, CookieAssertion, Expectations, MatchMode, ValidationResult,
};
pub use config::{AssertConfig, ErrorStyle};
pub use content::{ContentType, ContentTypeRegistry, ParsedBody};
pub use cookie::{Cookie, CookieFilter, Cookies};
pub use error::{Error, Result};
pub use filter::{Filter, FilterChain, FilterContext, Transport};
pub use request::FilterableRequest;
pub use response::Response;
pub use response_spec::ResponseSpec;
