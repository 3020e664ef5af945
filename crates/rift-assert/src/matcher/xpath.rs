use super::{Actual, Matcher, SharedMatcher};
use crate::config::XmlConfig;
use crate::content::{XmlDocument, XmlError};
use std::fmt;

/// Matches XML documents in which an XPath expression selects something.
///
/// With an inner matcher, the string value of the expression must also
/// satisfy it. Text actuals are parsed with the default XML settings first.
#[derive(Debug, Clone)]
pub struct HasXPath {
    expression: String,
    inner: Option<SharedMatcher>,
}

enum Evaluation {
    Matched,
    NoResults,
    Value(String),
    Invalid(String),
}

impl HasXPath {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            inner: None,
        }
    }

    pub fn with_matcher(expression: impl Into<String>, inner: SharedMatcher) -> Self {
        Self {
            expression: expression.into(),
            inner: Some(inner),
        }
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    fn evaluate_document(&self, document: &XmlDocument) -> Result<Evaluation, XmlError> {
        if !document.has_match(&self.expression)? {
            return Ok(Evaluation::NoResults);
        }
        match &self.inner {
            None => Ok(Evaluation::Matched),
            Some(_) => Ok(Evaluation::Value(document.string_value(&self.expression)?)),
        }
    }

    fn evaluate(&self, actual: &Actual<'_>) -> Evaluation {
        let result = match actual {
            Actual::Document(document) => self.evaluate_document(document),
            _ => match actual.as_str() {
                Some(text) => XmlDocument::parse(text, &XmlConfig::default())
                    .and_then(|document| self.evaluate_document(&document)),
                None => return Evaluation::Invalid("not an XML document".to_string()),
            },
        };
        result.unwrap_or_else(|e| Evaluation::Invalid(e.to_string()))
    }
}

impl fmt::Display for HasXPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an XML document with XPath {}", self.expression)?;
        if let Some(inner) = &self.inner {
            write!(f, " {inner}")?;
        }
        Ok(())
    }
}

impl Matcher for HasXPath {
    fn matches(&self, actual: &Actual<'_>) -> bool {
        match self.evaluate(actual) {
            Evaluation::Matched => true,
            Evaluation::Value(value) => self
                .inner
                .as_ref()
                .is_some_and(|inner| inner.matches(&Actual::Text(&value))),
            Evaluation::NoResults | Evaluation::Invalid(_) => false,
        }
    }

    fn describe_mismatch(&self, actual: &Actual<'_>) -> String {
        match self.evaluate(actual) {
            Evaluation::NoResults => "xpath returned no results.".to_string(),
            Evaluation::Invalid(reason) => reason,
            Evaluation::Value(value) => match &self.inner {
                Some(inner) => inner.describe_mismatch(&Actual::Text(&value)),
                None => format!("was {}", actual.describe()),
            },
            Evaluation::Matched => format!("was {}", actual.describe()),
        }
    }
}
