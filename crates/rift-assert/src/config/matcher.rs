//! Matcher error-reporting configuration.

use serde::{Deserialize, Serialize};

/// How failed body assertions are rendered.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorStyle {
    /// `Expected: <matcher>` / `Actual: <value>` built from the matcher's
    /// display form and the raw actual value.
    #[default]
    Compact,
    /// The matcher describes its own expectation and the mismatch.
    Delegated,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct MatcherConfig {
    #[serde(default)]
    pub error_style: ErrorStyle,
}

impl MatcherConfig {
    pub fn with_error_style(error_style: ErrorStyle) -> Self {
        Self { error_style }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_style_serde() {
        let config: MatcherConfig = serde_yaml::from_str("error_style: delegated").unwrap();
        assert_eq!(config.error_style, ErrorStyle::Delegated);

        let config: MatcherConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.error_style, ErrorStyle::Compact);
    }
}
