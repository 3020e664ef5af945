//! Serializable matcher definitions.

use super::{
    all_of, any_of, contains_string, ends_with, equal_to, equal_to_ignoring_case, exists,
    has_item, has_size, has_xpath, has_xpath_matching, matches_pattern, not, null_value,
    starts_with, SharedMatcher,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A matcher as written in an expectations file.
///
/// ```yaml
/// allOf:
///   - startsWith: "order-"
///   - not:
///       equals: "order-0"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum MatcherSpec {
    Equals(Value),
    EqualsIgnoringCase(String),
    Contains(String),
    StartsWith(String),
    EndsWith(String),
    /// Regular expression searched anywhere in the value.
    Matches(String),
    /// `true` for "present and not null", `false` for "missing or null".
    Exists(bool),
    HasSize(usize),
    HasItem(Box<MatcherSpec>),
    Not(Box<MatcherSpec>),
    AllOf(Vec<MatcherSpec>),
    AnyOf(Vec<MatcherSpec>),
    #[serde(rename = "xpath")]
    XPath {
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matcher: Option<Box<MatcherSpec>>,
    },
}

impl MatcherSpec {
    /// Compile into a runtime matcher.
    pub fn compile(&self) -> Result<SharedMatcher, regex::Error> {
        Ok(match self {
            MatcherSpec::Equals(v) => equal_to(v.clone()),
            MatcherSpec::EqualsIgnoringCase(v) => equal_to_ignoring_case(v.as_str()),
            MatcherSpec::Contains(v) => contains_string(v.as_str()),
            MatcherSpec::StartsWith(v) => starts_with(v.as_str()),
            MatcherSpec::EndsWith(v) => ends_with(v.as_str()),
            MatcherSpec::Matches(pattern) => matches_pattern(pattern)?,
            MatcherSpec::Exists(true) => exists(),
            MatcherSpec::Exists(false) => null_value(),
            MatcherSpec::HasSize(size) => has_size(*size),
            MatcherSpec::HasItem(item) => has_item(item.compile()?),
            MatcherSpec::Not(inner) => not(inner.compile()?),
            MatcherSpec::AllOf(specs) => {
                let compiled: Result<Vec<_>, _> = specs.iter().map(Self::compile).collect();
                all_of(compiled?)
            }
            MatcherSpec::AnyOf(specs) => {
                let compiled: Result<Vec<_>, _> = specs.iter().map(Self::compile).collect();
                any_of(compiled?)
            }
            MatcherSpec::XPath { path, matcher: None } => has_xpath(path.as_str()),
            MatcherSpec::XPath {
                path,
                matcher: Some(inner),
            } => has_xpath_matching(path.as_str(), inner.compile()?),
        })
    }

    /// Whether this matcher, or one nested in a logical operator, evaluates
    /// XPath against a whole document.
    pub fn targets_document(&self) -> bool {
        match self {
            MatcherSpec::XPath { .. } => true,
            MatcherSpec::Not(inner) => inner.targets_document(),
            MatcherSpec::AllOf(specs) | MatcherSpec::AnyOf(specs) => {
                specs.iter().any(Self::targets_document)
            }
            _ => false,
        }
    }
}
