//! Logical operators for combining matchers.

use super::{Actual, Matcher, SharedMatcher};
use std::fmt;

/// Negates the inner matcher.
#[derive(Debug, Clone)]
pub struct Not {
    inner: SharedMatcher,
}

impl Not {
    pub fn new(inner: SharedMatcher) -> Self {
        Self { inner }
    }
}

impl fmt::Display for Not {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not {}", self.inner)
    }
}

impl Matcher for Not {
    fn matches(&self, actual: &Actual<'_>) -> bool {
        !self.inner.matches(actual)
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, matchers: &[SharedMatcher], op: &str) -> fmt::Result {
    f.write_str("(")?;
    for (i, matcher) in matchers.iter().enumerate() {
        if i > 0 {
            write!(f, " {op} ")?;
        }
        write!(f, "{matcher}")?;
    }
    f.write_str(")")
}

/// Matches if every inner matcher matches.
#[derive(Debug, Clone)]
pub struct AllOf {
    matchers: Vec<SharedMatcher>,
}

impl AllOf {
    pub fn new(matchers: Vec<SharedMatcher>) -> Self {
        Self { matchers }
    }
}

impl fmt::Display for AllOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.matchers, "and")
    }
}

impl Matcher for AllOf {
    fn matches(&self, actual: &Actual<'_>) -> bool {
        self.matchers.iter().all(|m| m.matches(actual))
    }

    /// Explains the first inner matcher that failed.
    fn describe_mismatch(&self, actual: &Actual<'_>) -> String {
        match self.matchers.iter().find(|m| !m.matches(actual)) {
            Some(failed) => format!("{} {}", failed, failed.describe_mismatch(actual)),
            None => format!("was {}", actual.describe()),
        }
    }
}

/// Matches if any inner matcher matches.
#[derive(Debug, Clone)]
pub struct AnyOf {
    matchers: Vec<SharedMatcher>,
}

impl AnyOf {
    pub fn new(matchers: Vec<SharedMatcher>) -> Self {
        Self { matchers }
    }
}

impl fmt::Display for AnyOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.matchers, "or")
    }
}

impl Matcher for AnyOf {
    fn matches(&self, actual: &Actual<'_>) -> bool {
        self.matchers.iter().any(|m| m.matches(actual))
    }
}
