//! Matchers over values extracted from structured bodies.

use super::{describe_value, Actual, Matcher, SharedMatcher};
use serde_json::{Number, Value};
use std::fmt;

/// Equality with an expected value. Numbers compare by value, so `5` equals
/// `5.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualTo {
    expected: Value,
}

impl EqualTo {
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(a, b)| values_equal(a, b))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, value)| b.get(key).is_some_and(|other| values_equal(value, other)))
        }
        _ => actual == expected,
    }
}

/// Integers compare exactly; only a float on either side falls back to `f64`.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a == b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a == b;
    }
    if !a.is_f64() && !b.is_f64() {
        // One side is negative and the other above i64::MAX
        return false;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a == b,
        _ => a == b,
    }
}

impl fmt::Display for EqualTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&describe_value(&self.expected))
    }
}

impl Matcher for EqualTo {
    fn matches(&self, actual: &Actual<'_>) -> bool {
        match actual {
            Actual::Text(text) => self.expected.as_str() == Some(*text),
            Actual::Value(value) => values_equal(value, &self.expected),
            Actual::Document(_) => false,
        }
    }
}

/// Matches a missing or `null` value.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsNull;

impl fmt::Display for IsNull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("null")
    }
}

impl Matcher for IsNull {
    fn matches(&self, actual: &Actual<'_>) -> bool {
        matches!(actual, Actual::Value(Value::Null))
    }
}

/// Matches anything that is present and not `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotNull;

impl fmt::Display for NotNull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not null")
    }
}

impl Matcher for NotNull {
    fn matches(&self, actual: &Actual<'_>) -> bool {
        !IsNull.matches(actual)
    }
}

/// Matches arrays, objects and strings of a given size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HasSize {
    size: usize,
}

impl HasSize {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    fn size_of(actual: &Actual<'_>) -> Option<usize> {
        match actual {
            Actual::Value(Value::Array(items)) => Some(items.len()),
            Actual::Value(Value::Object(map)) => Some(map.len()),
            _ => actual.as_str().map(|text| text.chars().count()),
        }
    }
}

impl fmt::Display for HasSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a collection with size <{}>", self.size)
    }
}

impl Matcher for HasSize {
    fn matches(&self, actual: &Actual<'_>) -> bool {
        Self::size_of(actual) == Some(self.size)
    }

    fn describe_mismatch(&self, actual: &Actual<'_>) -> String {
        match Self::size_of(actual) {
            Some(size) => format!("collection size was <{size}>"),
            None => format!("was {}", actual.describe()),
        }
    }
}

/// Matches arrays with at least one element satisfying the inner matcher.
#[derive(Debug, Clone)]
pub struct HasItem {
    item: SharedMatcher,
}

impl HasItem {
    pub fn new(item: SharedMatcher) -> Self {
        Self { item }
    }
}

impl fmt::Display for HasItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a collection containing {}", self.item)
    }
}

impl Matcher for HasItem {
    fn matches(&self, actual: &Actual<'_>) -> bool {
        match actual {
            Actual::Value(Value::Array(items)) => items
                .iter()
                .any(|item| self.item.matches(&Actual::Value(item))),
            _ => false,
        }
    }

    fn describe_mismatch(&self, actual: &Actual<'_>) -> String {
        match actual {
            Actual::Value(Value::Array(items)) if items.is_empty() => "was empty".to_string(),
            Actual::Value(Value::Array(items)) => {
                let mismatches: Vec<String> = items
                    .iter()
                    .map(|item| self.item.describe_mismatch(&Actual::Value(item)))
                    .collect();
                format!("mismatches were: [{}]", mismatches.join(", "))
            }
            _ => format!("was {}", actual.describe()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::equal_to;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_equal_to() {
        let matcher = EqualTo::new(5);
        assert!(matcher.matches(&Actual::Value(&json!(5.0))));
        assert!(!matcher.matches(&Actual::Value(&json!("5"))));
        assert_eq!(matcher.to_string(), "<5>");

        let text = EqualTo::new("hello world");
        assert!(text.matches(&Actual::Text("hello world")));
        assert!(!text.matches(&Actual::Text("goodbye")));

        let nested = EqualTo::new(json!({"a": [1, 2.0]}));
        assert!(nested.matches(&Actual::Value(&json!({"a": [1.0, 2]}))));
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let big = EqualTo::new(9_007_199_254_740_993_u64);
        assert!(big.matches(&Actual::Value(&json!(9_007_199_254_740_993_u64))));
        assert!(!big.matches(&Actual::Value(&json!(9_007_199_254_740_992_u64))));

        let max = EqualTo::new(u64::MAX);
        assert!(!max.matches(&Actual::Value(&json!(-1))));
        assert!(EqualTo::new(-3).matches(&Actual::Value(&json!(-3.0))));
    }

    #[test]
    fn test_null_matchers() {
        assert!(IsNull.matches(&Actual::Value(&Value::Null)));
        assert!(!IsNull.matches(&Actual::Text("")));
        assert!(NotNull.matches(&Actual::Value(&json!(0))));
        assert!(!NotNull.matches(&Actual::Value(&Value::Null)));
    }

    #[test]
    fn test_has_size() {
        let matcher = HasSize::new(2);
        assert!(matcher.matches(&Actual::Value(&json!([1, 2]))));
        assert!(matcher.matches(&Actual::Value(&json!({"a": 1, "b": 2}))));
        assert!(!matcher.matches(&Actual::Value(&json!([1]))));
        assert_eq!(
            matcher.describe_mismatch(&Actual::Value(&json!([1]))),
            "collection size was <1>"
        );
    }

    #[test]
    fn test_has_item() {
        let matcher = HasItem::new(equal_to("b"));
        assert!(matcher.matches(&Actual::Value(&json!(["a", "b"]))));
        assert!(!matcher.matches(&Actual::Value(&json!(["a"]))));
        assert_eq!(matcher.to_string(), "a collection containing \"b\"");
        assert_eq!(
            matcher.describe_mismatch(&Actual::Value(&json!(["a"]))),
            "mismatches were: [was \"a\"]"
        );
        let empty = HasItem::new(Arc::new(NotNull));
        assert_eq!(empty.describe_mismatch(&Actual::Value(&json!([]))), "was empty");
    }
}
