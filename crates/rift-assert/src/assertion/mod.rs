//! Declarative response assertions.
//!
//! A [`BodyMatcher`] runs in one of three modes fixed when it is built:
//! against the raw body text, against the body parsed as an XML document, or
//! against a value extracted from the parsed body by a path expression.
//! Failures are reported as [`ValidationResult`]s in the configured
//! [`ErrorStyle`](crate::config::ErrorStyle), never as errors.
//!
//! # Module Structure
//!
//! - `result` - Per-assertion outcome
//! - `body` - Single body assertion and its match modes
//! - `group` - Ordered body assertions
//! - `path` - Path evaluation against parsed bodies
//! - `cookie` - Response cookie assertions
//! - `expectations` - Expectations loaded from YAML/JSON

mod body;
mod cookie;
mod expectations;
mod group;
mod path;
mod result;

pub use body::{BodyMatcher, MatchMode};
pub use cookie::CookieAssertion;
pub use expectations::{BodyExpectation, CookieExpectation, Expectations};
pub use group::BodyMatcherGroup;
pub use path::{DefaultPathEvaluator, PathError, PathEvaluator};
pub use result::{failure_messages, ValidationResult};
