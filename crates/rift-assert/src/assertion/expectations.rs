//! Expectations loaded from YAML or JSON files.
//!
//! ```yaml
//! status: 200
//! body:
//!   - path: order.id
//!     matcher:
//!       equals: 42
//!   - matcher:
//!       contains: "order"
//! cookies:
//!   - name: SESSION
//!     matcher:
//!       exists: true
//! ```

use super::body::BodyMatcher;
use super::cookie::CookieAssertion;
use crate::error::Result;
use crate::matcher::MatcherSpec;
use crate::response_spec::ResponseSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Expectations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default)]
    pub body: Vec<BodyExpectation>,
    #[serde(default)]
    pub cookies: Vec<CookieExpectation>,
}

/// A body assertion. Without a `path` the matcher applies to the whole body.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct BodyExpectation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub matcher: MatcherSpec,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CookieExpectation {
    pub name: String,
    pub matcher: MatcherSpec,
}

impl Expectations {
    /// Load expectations from a file. `.json` files are read as JSON,
    /// anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(serde_json::from_str(&contents)?)
        } else {
            Self::from_yaml(&contents)
        }
    }

    /// Parse YAML. Matcher definitions go through the JSON data model so that
    /// `equals: 42` and `not: {...}` read the same in both formats.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Compile every matcher and build the response spec.
    pub fn into_response_spec(self) -> Result<ResponseSpec> {
        let mut spec = ResponseSpec::new();
        if let Some(status) = self.status {
            spec = spec.status_code(status);
        }
        for expectation in self.body {
            let matcher = expectation.matcher.compile()?;
            spec = spec.body(match expectation.path {
                Some(path) => BodyMatcher::path(path, matcher)?,
                None if expectation.matcher.targets_document() => BodyMatcher::xpath(matcher),
                None => BodyMatcher::whole_body(matcher),
            });
        }
        for expectation in self.cookies {
            spec = spec.cookie(CookieAssertion::new(
                expectation.name,
                expectation.matcher.compile()?,
            )?);
        }
        Ok(spec)
    }
}
