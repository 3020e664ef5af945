use super::body::BodyMatcher;
use super::path::{DefaultPathEvaluator, PathEvaluator};
use super::result::ValidationResult;
use crate::config::AssertConfig;
use crate::content::ParsedBody;
use crate::response::Response;

/// Ordered body assertions evaluated against one response.
///
/// Order only affects the order of the results.
#[derive(Debug, Clone, Default)]
pub struct BodyMatcherGroup {
    matchers: Vec<BodyMatcher>,
}

impl BodyMatcherGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, matcher: BodyMatcher) {
        self.matchers.push(matcher);
    }

    pub fn with(mut self, matcher: BodyMatcher) -> Self {
        self.push(matcher);
        self
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BodyMatcher> {
        self.matchers.iter()
    }

    /// Whether any matcher needs the raw body (whole-body text or XPath).
    pub fn requires_text_parsing(&self) -> bool {
        self.matchers.iter().any(BodyMatcher::requires_text_parsing)
    }

    /// Whether any matcher needs the body parsed into a structured tree.
    pub fn requires_path_parsing(&self) -> bool {
        self.matchers.iter().any(BodyMatcher::requires_path_parsing)
    }

    pub fn validate(
        &self,
        response: &Response,
        parsed: Option<&ParsedBody>,
        config: &AssertConfig,
    ) -> Vec<ValidationResult> {
        self.validate_with(response, parsed, config, &DefaultPathEvaluator)
    }

    /// One result per matcher, in registration order.
    pub fn validate_with(
        &self,
        response: &Response,
        parsed: Option<&ParsedBody>,
        config: &AssertConfig,
        evaluator: &dyn PathEvaluator,
    ) -> Vec<ValidationResult> {
        self.matchers
            .iter()
            .map(|matcher| matcher.validate(response, parsed, config, evaluator))
            .collect()
    }
}

impl Extend<BodyMatcher> for BodyMatcherGroup {
    fn extend<I: IntoIterator<Item = BodyMatcher>>(&mut self, iter: I) {
        self.matchers.extend(iter);
    }
}

impl FromIterator<BodyMatcher> for BodyMatcherGroup {
    fn from_iter<I: IntoIterator<Item = BodyMatcher>>(iter: I) -> Self {
        Self {
            matchers: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BodyMatcherGroup {
    type Item = &'a BodyMatcher;
    type IntoIter = std::slice::Iter<'a, BodyMatcher>;

    fn into_iter(self) -> Self::IntoIter {
        self.matchers.iter()
    }
}
