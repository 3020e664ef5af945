//! Matchers used by body and cookie assertions.
//!
//! A [`Matcher`] decides whether an [`Actual`] value is acceptable and can
//! describe both its expectation and a mismatch. Descriptions follow the
//! familiar Hamcrest wording so failure messages read the same way callers
//! know from other assertion libraries.
//!
//! # Module Structure
//!
//! - `string` - String matchers (equality ignoring case, contains, prefix, suffix, regex)
//! - `value` - Matchers over structured values (equality, null, size, item)
//! - `logical` - Logical operators (not, all of, any of)
//! - `xpath` - XPath matchers evaluated against XML documents
//! - `spec` - Serde definitions compiled into matchers

mod logical;
mod spec;
mod string;
mod value;
mod xpath;

pub use logical::{AllOf, AnyOf, Not};
pub use spec::MatcherSpec;
pub use string::{StringMatcher, StringOp};
pub use value::{EqualTo, HasItem, HasSize, IsNull, NotNull};
pub use xpath::HasXPath;

use crate::content::XmlDocument;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// The value a matcher is applied to.
#[derive(Debug, Clone, Copy)]
pub enum Actual<'a> {
    /// Raw text, such as a whole response body or a cookie value.
    Text(&'a str),
    /// A value extracted from a structured body.
    Value(&'a Value),
    /// A parsed XML document.
    Document(&'a XmlDocument),
}

impl<'a> Actual<'a> {
    /// The actual value as a string, when it is one.
    pub fn as_str(&self) -> Option<&'a str> {
        match *self {
            Actual::Text(text) => Some(text),
            Actual::Value(Value::String(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Hamcrest-style rendering: strings quoted, other scalars in angle
    /// brackets.
    pub fn describe(&self) -> String {
        match self {
            Actual::Text(text) => quote(text),
            Actual::Value(value) => describe_value(value),
            Actual::Document(document) => format!("<{}>", document.source()),
        }
    }
}

impl fmt::Display for Actual<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actual::Text(text) => f.write_str(text),
            Actual::Value(Value::String(text)) => f.write_str(text),
            Actual::Value(value) => write!(f, "{value}"),
            Actual::Document(document) => f.write_str(document.source()),
        }
    }
}

pub(crate) fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Hamcrest-style rendering of a JSON value.
pub fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(text) => quote(text),
        Value::Bool(_) | Value::Number(_) => format!("<{value}>"),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(describe_value).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(_) => format!("<{value}>"),
    }
}

/// A predicate over [`Actual`] values that can explain itself.
pub trait Matcher: fmt::Display + fmt::Debug + Send + Sync {
    fn matches(&self, actual: &Actual<'_>) -> bool;

    /// Description of what this matcher expects.
    fn describe_expectation(&self) -> String {
        self.to_string()
    }

    /// Why `actual` did not match.
    fn describe_mismatch(&self, actual: &Actual<'_>) -> String {
        format!("was {}", actual.describe())
    }
}

pub type SharedMatcher = Arc<dyn Matcher>;

pub fn equal_to(expected: impl Into<Value>) -> SharedMatcher {
    Arc::new(EqualTo::new(expected))
}

pub fn equal_to_ignoring_case(expected: impl Into<String>) -> SharedMatcher {
    Arc::new(StringMatcher::new(StringOp::EqualsIgnoringCase, expected))
}

pub fn contains_string(expected: impl Into<String>) -> SharedMatcher {
    Arc::new(StringMatcher::new(StringOp::Contains, expected))
}

pub fn starts_with(expected: impl Into<String>) -> SharedMatcher {
    Arc::new(StringMatcher::new(StringOp::StartsWith, expected))
}

pub fn ends_with(expected: impl Into<String>) -> SharedMatcher {
    Arc::new(StringMatcher::new(StringOp::EndsWith, expected))
}

pub fn matches_pattern(pattern: &str) -> Result<SharedMatcher, regex::Error> {
    Ok(Arc::new(StringMatcher::pattern(pattern)?))
}

pub fn null_value() -> SharedMatcher {
    Arc::new(IsNull)
}

pub fn exists() -> SharedMatcher {
    Arc::new(NotNull)
}

pub fn has_size(size: usize) -> SharedMatcher {
    Arc::new(HasSize::new(size))
}

pub fn has_item(item: SharedMatcher) -> SharedMatcher {
    Arc::new(HasItem::new(item))
}

pub fn not(inner: SharedMatcher) -> SharedMatcher {
    Arc::new(Not::new(inner))
}

pub fn all_of(matchers: Vec<SharedMatcher>) -> SharedMatcher {
    Arc::new(AllOf::new(matchers))
}

pub fn any_of(matchers: Vec<SharedMatcher>) -> SharedMatcher {
    Arc::new(AnyOf::new(matchers))
}

pub fn has_xpath(expression: impl Into<String>) -> SharedMatcher {
    Arc::new(HasXPath::new(expression))
}

/// XPath matcher whose string result must satisfy `inner`.
pub fn has_xpath_matching(expression: impl Into<String>, inner: SharedMatcher) -> SharedMatcher {
    Arc::new(HasXPath::with_matcher(expression, inner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_value() {
        assert_eq!(describe_value(&json!("a\"b")), r#""a\"b""#);
        assert_eq!(describe_value(&json!(5)), "<5>");
        assert_eq!(describe_value(&json!(true)), "<true>");
        assert_eq!(describe_value(&Value::Null), "null");
        assert_eq!(describe_value(&json!([1, "x"])), r#"[<1>, "x"]"#);
        assert_eq!(describe_value(&json!({"a": 1})), r#"<{"a":1}>"#);
    }

    #[test]
    fn test_actual_rendering() {
        let value = json!("plain");
        assert_eq!(Actual::Value(&value).to_string(), "plain");
        assert_eq!(Actual::Value(&value).describe(), "\"plain\"");
        assert_eq!(Actual::Text("body").describe(), "\"body\"");
        assert_eq!(Actual::Value(&value).as_str(), Some("plain"));
        assert_eq!(Actual::Value(&json!(1)).as_str(), None);
    }

    #[test]
    fn test_default_mismatch_description() {
        let matcher = equal_to("expected");
        assert_eq!(matcher.describe_expectation(), "\"expected\"");
        assert_eq!(
            matcher.describe_mismatch(&Actual::Text("other")),
            "was \"other\""
        );
    }
}
