//! Error types shared by every component of the crate.
//!
//! Only misuse and infrastructure failures surface as [`Error`]. Body and
//! cookie assertions never fail through this type; they produce
//! [`ValidationResult`](crate::assertion::ValidationResult)s instead.

/// Error types for the assertion toolkit
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required argument was missing or empty.
    #[error("{0} cannot be empty")]
    InvalidArgument(&'static str),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The terminal link of the filter chain could not produce a response.
    #[error("Transport failed: {0}")]
    Transport(String),

    /// A matcher definition could not be compiled.
    #[error("Invalid matcher: {0}")]
    InvalidMatcher(#[from] regex::Error),

    /// A request URI could not be parsed.
    #[error("Invalid URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Reject empty strings for required parameters.
pub(crate) fn require_non_empty(value: &str, what: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidArgument(what));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty("application/json", "Content-Type").is_ok());
        let err = require_non_empty("  ", "Content-Type").unwrap_err();
        assert_eq!(err.to_string(), "Content-Type cannot be empty");
    }

    #[test]
    fn test_invalid_matcher_from_regex() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err: Error = regex_err.into();
        assert!(err.to_string().starts_with("Invalid matcher:"));
    }
}
