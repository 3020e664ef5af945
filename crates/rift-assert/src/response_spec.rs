//! Declared expectations for one request.

use crate::assertion::{
    BodyMatcher, BodyMatcherGroup, CookieAssertion, DefaultPathEvaluator, PathEvaluator,
    ValidationResult,
};
use crate::config::AssertConfig;
use crate::content::ContentTypeRegistry;
use crate::filter::{render_response, LogDetail};
use crate::response::Response;

/// What a response is expected to look like: status code, body assertions
/// and cookie assertions.
#[derive(Debug, Clone, Default)]
pub struct ResponseSpec {
    status: Option<u16>,
    body: BodyMatcherGroup,
    cookies: Vec<CookieAssertion>,
}

impl ResponseSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_code(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn body(mut self, matcher: BodyMatcher) -> Self {
        self.body.push(matcher);
        self
    }

    pub fn cookie(mut self, assertion: CookieAssertion) -> Self {
        self.cookies.push(assertion);
        self
    }

    pub fn expected_status(&self) -> Option<u16> {
        self.status
    }

    pub fn body_matchers(&self) -> &BodyMatcherGroup {
        &self.body
    }

    pub fn cookie_assertions(&self) -> &[CookieAssertion] {
        &self.cookies
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.body.is_empty() && self.cookies.is_empty()
    }

    pub fn validate(
        &self,
        response: &Response,
        registry: &ContentTypeRegistry,
        config: &AssertConfig,
    ) -> Vec<ValidationResult> {
        self.validate_with(response, registry, config, &DefaultPathEvaluator)
    }

    /// Validate `response`: status first, then body matchers in order, then
    /// cookies. The body is parsed only when a keyed matcher needs it.
    pub fn validate_with(
        &self,
        response: &Response,
        registry: &ContentTypeRegistry,
        config: &AssertConfig,
        evaluator: &dyn PathEvaluator,
    ) -> Vec<ValidationResult> {
        let mut results = Vec::with_capacity(1 + self.body.len() + self.cookies.len());

        if let Some(expected) = self.status {
            let actual = response.status_code();
            results.push(if actual == expected {
                ValidationResult::success()
            } else {
                ValidationResult::failure(format!(
                    "Expected status code <{expected}> but was <{actual}>.\n"
                ))
            });
        }

        let parsed = self
            .body
            .requires_path_parsing()
            .then(|| registry.parse(response, config));
        results.extend(
            self.body
                .validate_with(response, parsed.as_ref(), config, evaluator),
        );
        results.extend(self.cookies.iter().map(|cookie| cookie.validate(response)));

        let failures = results.iter().filter(|result| !result.success).count();
        if failures > 0 {
            tracing::debug!(failures, "Response validation failed");
            if config.log.log_if_validation_fails {
                tracing::warn!(
                    target: "rift_assert::log",
                    "Validation failed for response:\n{}",
                    render_response(response, LogDetail::All)
                );
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::{contains_string, equal_to};
    use bytes::Bytes;
    use tracing_test::traced_test;

    fn response(status: u16) -> Response {
        http::Response::builder()
            .status(status)
            .header("Content-Type", "application/json; charset=utf-8")
            .header("Set-Cookie", "token=abc; Path=/")
            .body(Bytes::from_static(br#"{"order":{"id":42}}"#))
            .unwrap()
            .into()
    }

    fn spec() -> ResponseSpec {
        ResponseSpec::new()
            .status_code(200)
            .body(BodyMatcher::path("order.id", equal_to(42)).unwrap())
            .body(BodyMatcher::whole_body(contains_string("order")))
            .cookie(CookieAssertion::new("token", equal_to("abc")).unwrap())
    }

    #[test]
    fn test_all_pass() {
        let results = spec().validate(
            &response(200),
            &ContentTypeRegistry::new(),
            &AssertConfig::default(),
        );
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|result| result.success));
    }

    #[test]
    fn test_status_mismatch() {
        let results = spec().validate(
            &response(404),
            &ContentTypeRegistry::new(),
            &AssertConfig::default(),
        );
        assert_eq!(
            results[0].error_message,
            "Expected status code <200> but was <404>.\n"
        );
        assert!(results[1..].iter().all(|result| result.success));
    }

    #[traced_test]
    #[test]
    fn test_logs_response_when_validation_fails() {
        let mut config = AssertConfig::default();
        config.log.log_if_validation_fails = true;
        let spec = ResponseSpec::new().status_code(201);
        let results = spec.validate(&response(200), &ContentTypeRegistry::new(), &config);
        assert!(!results[0].success);
        assert!(logs_contain("Validation failed for response"));
    }

    #[test]
    fn test_empty_spec() {
        let spec = ResponseSpec::new();
        assert!(spec.is_empty());
        assert!(spec
            .validate(&response(500), &ContentTypeRegistry::new(), &AssertConfig::default())
            .is_empty());
    }
}
