//! A single declarative assertion on a response body.

use super::path::{PathError, PathEvaluator};
use super::result::ValidationResult;
use crate::config::{AssertConfig, ErrorStyle};
use crate::content::{ParsedBody, XmlDocument};
use crate::error::{require_non_empty, Result};
use crate::matcher::{describe_value, Actual, Matcher, SharedMatcher};
use crate::response::Response;
use serde_json::Value;
use std::fmt;

/// How a [`BodyMatcher`] obtains the value it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchMode {
    /// The raw body text.
    WholeBodyText,
    /// The body parsed into an XML document.
    WholeBodyXPath,
    /// A value extracted from the parsed body by a path expression.
    KeyedPath(String),
}

impl MatchMode {
    pub fn key(&self) -> Option<&str> {
        match self {
            MatchMode::KeyedPath(key) => Some(key),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BodyMatcher {
    mode: MatchMode,
    matcher: SharedMatcher,
}

impl BodyMatcher {
    pub fn whole_body(matcher: SharedMatcher) -> Self {
        Self {
            mode: MatchMode::WholeBodyText,
            matcher,
        }
    }

    /// Whole-body matcher applied to the body parsed as XML.
    pub fn xpath(matcher: SharedMatcher) -> Self {
        Self {
            mode: MatchMode::WholeBodyXPath,
            matcher,
        }
    }

    pub fn path(key: impl Into<String>, matcher: SharedMatcher) -> Result<Self> {
        let key = key.into();
        require_non_empty(&key, "key")?;
        Ok(Self {
            mode: MatchMode::KeyedPath(key),
            matcher,
        })
    }

    pub fn mode(&self) -> &MatchMode {
        &self.mode
    }

    pub fn matcher(&self) -> &SharedMatcher {
        &self.matcher
    }

    pub fn requires_text_parsing(&self) -> bool {
        !matches!(self.mode, MatchMode::KeyedPath(_))
    }

    pub fn requires_path_parsing(&self) -> bool {
        matches!(self.mode, MatchMode::KeyedPath(_))
    }

    /// Validate `response`.
    ///
    /// `parsed` is the body after content-type dispatch; keyed matchers fall
    /// back to the raw body text when it is `None`.
    pub fn validate(
        &self,
        response: &Response,
        parsed: Option<&ParsedBody>,
        config: &AssertConfig,
        evaluator: &dyn PathEvaluator,
    ) -> ValidationResult {
        let style = config.matcher.error_style;
        match &self.mode {
            MatchMode::WholeBodyText => self.validate_text(response, style),
            MatchMode::WholeBodyXPath => self.validate_xpath(response, config, style),
            MatchMode::KeyedPath(key) => {
                self.validate_path(key, response, parsed, style, evaluator)
            }
        }
    }

    fn validate_text(&self, response: &Response, style: ErrorStyle) -> ValidationResult {
        let body = response.body_as_string();
        let actual = Actual::Text(&body);
        if self.matcher.matches(&actual) {
            return ValidationResult::success();
        }
        ValidationResult::failure(match style {
            ErrorStyle::Compact => format!(
                "Response body doesn't match expectation.\nExpected: {}\n  Actual: {}\n",
                self.matcher, body
            ),
            ErrorStyle::Delegated => format!(
                "Response body doesn't match expectation.\n{}",
                delegated_description(self.matcher.as_ref(), &actual)
            ),
        })
    }

    fn validate_xpath(
        &self,
        response: &Response,
        config: &AssertConfig,
        style: ErrorStyle,
    ) -> ValidationResult {
        let body = response.body_as_string();
        let document = match XmlDocument::parse(&body, &config.xml) {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!("Response body is not an XML document: {}", e);
                return ValidationResult::failure(format!(
                    "Cannot evaluate {} because the response body is not an XML document: {}.",
                    self.matcher.to_string().trim(),
                    e
                ));
            }
        };
        let actual = Actual::Document(&document);
        if self.matcher.matches(&actual) {
            return ValidationResult::success();
        }
        ValidationResult::failure(match style {
            ErrorStyle::Compact => format!(
                "Expected: {}\n  Actual: {}\n",
                self.matcher.to_string().trim(),
                body
            ),
            ErrorStyle::Delegated => delegated_description(self.matcher.as_ref(), &actual),
        })
    }

    fn validate_path(
        &self,
        key: &str,
        response: &Response,
        parsed: Option<&ParsedBody>,
        style: ErrorStyle,
        evaluator: &dyn PathEvaluator,
    ) -> ValidationResult {
        let parsed = match parsed {
            Some(parsed) if parsed.is_structured() => parsed,
            other => {
                let text = other
                    .and_then(ParsedBody::as_text)
                    .map(|text| text.into_owned())
                    .unwrap_or_else(|| response.body_as_string().into_owned());
                return ValidationResult::failure(self.unstructured_message(key, &text));
            }
        };

        let result = match evaluator.evaluate(parsed, key) {
            Ok(value) => value,
            Err(PathError::NotFound(_)) => Value::Null,
            Err(e) => {
                return ValidationResult::failure(format!(
                    "{} {} doesn't match.\nCannot evaluate path: {}\n",
                    parsed.path_description(),
                    key,
                    e
                ))
            }
        };

        let actual = Actual::Value(&result);
        if self.matcher.matches(&actual) {
            return ValidationResult::success();
        }
        let subject = format!("{} {} doesn't match.", parsed.path_description(), key);
        ValidationResult::failure(match style {
            ErrorStyle::Compact => format!(
                "{subject}\nExpected: {}\n  Actual: {}\n",
                strip_quotes(&self.matcher.to_string()),
                strip_quotes(&describe_value(&result))
            ),
            ErrorStyle::Delegated => format!(
                "{subject}\n{}",
                delegated_description(self.matcher.as_ref(), &actual)
            ),
        })
    }

    fn unstructured_message(&self, key: &str, text: &str) -> String {
        if text.is_empty() {
            format!(
                "Cannot assert that path \"{key}\" matches {} because the response body is empty.",
                self.matcher
            )
        } else {
            format!(
                "Cannot assert that path \"{key}\" matches {} because the response body is equal to \"{text}\".",
                self.matcher
            )
        }
    }
}

impl fmt::Display for BodyMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mode {
            MatchMode::KeyedPath(key) => write!(f, "{key} {}", self.matcher),
            _ => write!(f, "body {}", self.matcher),
        }
    }
}

fn delegated_description(matcher: &dyn Matcher, actual: &Actual<'_>) -> String {
    format!(
        "\nExpected: {}\n  Actual: {}",
        matcher.describe_expectation(),
        matcher.describe_mismatch(actual)
    )
}

fn strip_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}
