//! String matchers.

use super::{quote, Actual, Matcher};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringOp {
    EqualsIgnoringCase,
    Contains,
    StartsWith,
    EndsWith,
}

impl StringOp {
    fn apply(self, actual: &str, expected: &str) -> bool {
        match self {
            StringOp::EqualsIgnoringCase => actual == expected,
            StringOp::Contains => actual.contains(expected),
            StringOp::StartsWith => actual.starts_with(expected),
            StringOp::EndsWith => actual.ends_with(expected),
        }
    }
}

#[derive(Debug, Clone)]
enum Inner {
    /// `lower` is `expected` lowercased once for case-insensitive matching.
    Op {
        op: StringOp,
        expected: String,
        lower: String,
    },
    Pattern(Arc<Regex>),
}

/// Matches string actuals. Non-string values never match.
#[derive(Debug, Clone)]
pub struct StringMatcher {
    inner: Inner,
    case_sensitive: bool,
}

impl StringMatcher {
    pub fn new(op: StringOp, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        Self {
            inner: Inner::Op {
                op,
                lower: expected.to_lowercase(),
                expected,
            },
            case_sensitive: op != StringOp::EqualsIgnoringCase,
        }
    }

    /// Matches when `pattern` is found anywhere in the actual string.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            inner: Inner::Pattern(Arc::new(Regex::new(pattern)?)),
            case_sensitive: true,
        })
    }

    /// Compare ignoring case.
    pub fn ignoring_case(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    fn matches_str(&self, value: &str) -> bool {
        match &self.inner {
            Inner::Op { op, expected, .. } if self.case_sensitive => op.apply(value, expected),
            Inner::Op { op, lower, .. } => op.apply(&value.to_lowercase(), lower),
            Inner::Pattern(regex) => regex.is_match(value),
        }
    }
}

impl fmt::Display for StringMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (verb, expected) = match &self.inner {
            Inner::Op {
                op: StringOp::EqualsIgnoringCase,
                expected,
                ..
            } => {
                return write!(f, "a string equal to {} ignoring case", quote(expected));
            }
            Inner::Op { op, expected, .. } => (
                match op {
                    StringOp::Contains => "containing",
                    StringOp::StartsWith => "starting with",
                    StringOp::EndsWith => "ending with",
                    StringOp::EqualsIgnoringCase => "equal to",
                },
                expected,
            ),
            Inner::Pattern(regex) => {
                return write!(f, "a string matching the pattern '{}'", regex.as_str());
            }
        };
        write!(f, "a string {verb} {}", quote(expected))?;
        if !self.case_sensitive {
            f.write_str(" ignoring case")?;
        }
        Ok(())
    }
}

impl Matcher for StringMatcher {
    fn matches(&self, actual: &Actual<'_>) -> bool {
        actual.as_str().is_some_and(|value| self.matches_str(value))
    }
}
