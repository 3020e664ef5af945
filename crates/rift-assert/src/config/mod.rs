//! Configuration types for rift-assert.
//!
//! Every component receives its configuration explicitly. [`AssertConfig::default()`]
//! is the zero-value configuration used when nothing is specified.

mod matcher;
mod xml;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::content::ContentType;
use crate::error::{Error, Result};

pub use matcher::{ErrorStyle, MatcherConfig};
pub use xml::{XmlConfig, FEATURE_DISALLOW_DOCTYPE, FEATURE_NAMESPACES};

/// Cookie jar behavior.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CookieConfig {
    /// Attach stored cookies even when the request already carries a cookie
    /// with the same name.
    #[serde(default)]
    pub allow_duplicate_names: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SessionConfig {
    #[serde(default = "default_session_id_name")]
    pub session_id_name: String,
}

fn default_session_id_name() -> String {
    SessionConfig::DEFAULT_SESSION_ID_NAME.to_string()
}

impl SessionConfig {
    pub const DEFAULT_SESSION_ID_NAME: &'static str = "JSESSIONID";
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id_name: default_session_id_name(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct LogConfig {
    /// Log the response at WARN level when any assertion on it fails.
    #[serde(default)]
    pub log_if_validation_fails: bool,
}

/// Parser registrations applied on top of the built-in content-type families.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ParserConfig {
    /// Family used for content types that match nothing else.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_parser: Option<ContentType>,

    /// Extra MIME strings mapped onto a family.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub additional: BTreeMap<String, ContentType>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AssertConfig {
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub xml: XmlConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub parsers: ParserConfig,
}

impl AssertConfig {
    /// Load a configuration file. `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: AssertConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents)?
        } else {
            serde_yaml::from_str(&contents)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_error_style(mut self, error_style: ErrorStyle) -> Self {
        self.matcher.error_style = error_style;
        self
    }

    pub fn with_xml(mut self, xml: XmlConfig) -> Self {
        self.xml = xml;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.xml.validate().map_err(Error::Config)?;

        if self.session.session_id_name.trim().is_empty() {
            return Err(Error::Config("session.session_id_name cannot be empty".into()));
        }

        for mime in self.parsers.additional.keys() {
            if mime.trim().is_empty() {
                return Err(Error::Config(
                    "parsers.additional contains an empty content type".into(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_config() {
        let yaml = r#"
matcher:
  error_style: delegated
xml:
  namespace_aware: false
  declared_namespaces:
    ns: "http://example.com/ns"
cookies:
  allow_duplicate_names: true
session:
  session_id_name: SESSION
log:
  log_if_validation_fails: true
parsers:
  default_parser: json
  additional:
    "application/vnd.custom": xml
"#;

        let config: AssertConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.matcher.error_style, ErrorStyle::Delegated);
        assert!(!config.xml.namespace_aware);
        assert_eq!(
            config.xml.declared_namespaces.get("ns").map(String::as_str),
            Some("http://example.com/ns")
        );
        assert!(config.cookies.allow_duplicate_names);
        assert_eq!(config.session.session_id_name, "SESSION");
        assert!(config.log.log_if_validation_fails);
        assert_eq!(config.parsers.default_parser, Some(ContentType::Json));
        assert_eq!(
            config.parsers.additional.get("application/vnd.custom"),
            Some(&ContentType::Xml)
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config() {
        let config: AssertConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, AssertConfig::default());
        assert_eq!(config.matcher.error_style, ErrorStyle::Compact);
        assert!(config.xml.namespace_aware);
        assert!(!config.cookies.allow_duplicate_names);
        assert_eq!(config.session.session_id_name, "JSESSIONID");
    }

    #[test]
    fn test_validate_rejects_empty_session_name() {
        let mut config = AssertConfig::default();
        config.session.session_id_name = String::new();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file_yaml_and_json() {
        let mut yaml = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml, "matcher:\n  error_style: delegated").unwrap();
        let config = AssertConfig::from_file(yaml.path()).unwrap();
        assert_eq!(config.matcher.error_style, ErrorStyle::Delegated);

        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        writeln!(json, r#"{{"cookies": {{"allow_duplicate_names": true}}}}"#).unwrap();
        let config = AssertConfig::from_file(json.path()).unwrap();
        assert!(config.cookies.allow_duplicate_names);
    }

    #[test]
    fn test_from_file_missing() {
        let result = AssertConfig::from_file("/nonexistent/rift-assert.yaml");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
