//! XML parsing configuration used by whole-body XPath assertions and the
//! XML body parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Parser feature toggling namespace processing. Overrides `namespace_aware`.
pub const FEATURE_NAMESPACES: &str = "http://xml.org/sax/features/namespaces";

/// Parser feature rejecting documents that carry a `<!DOCTYPE`. Overrides
/// `allow_doctype_declaration` (inverted).
pub const FEATURE_DISALLOW_DOCTYPE: &str = "http://apache.org/xml/features/disallow-doctype-decl";

/// XML parser settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct XmlConfig {
    /// Keep element and attribute namespaces. When false, every name is
    /// reduced to its local part before XPath evaluation.
    #[serde(default = "default_namespace_aware")]
    pub namespace_aware: bool,

    #[serde(default)]
    pub allow_doctype_declaration: bool,

    /// Prefix to namespace URI bindings available to XPath expressions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub declared_namespaces: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub features: BTreeMap<String, bool>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

fn default_namespace_aware() -> bool {
    true
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            namespace_aware: true,
            allow_doctype_declaration: false,
            declared_namespaces: BTreeMap::new(),
            features: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }
}

impl XmlConfig {
    pub fn namespace_aware(mut self, namespace_aware: bool) -> Self {
        self.namespace_aware = namespace_aware;
        self
    }

    pub fn allow_doctype_declaration(mut self, allow: bool) -> Self {
        self.allow_doctype_declaration = allow;
        self
    }

    pub fn declare_namespace(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        self.declared_namespaces.insert(prefix.into(), uri.into());
        self
    }

    pub fn feature(mut self, name: impl Into<String>, enabled: bool) -> Self {
        self.features.insert(name.into(), enabled);
        self
    }

    pub fn property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Namespace awareness after applying [`FEATURE_NAMESPACES`].
    pub fn effective_namespace_aware(&self) -> bool {
        self.features
            .get(FEATURE_NAMESPACES)
            .copied()
            .unwrap_or(self.namespace_aware)
    }

    /// Doctype policy after applying [`FEATURE_DISALLOW_DOCTYPE`].
    pub fn effective_allow_doctype(&self) -> bool {
        self.features
            .get(FEATURE_DISALLOW_DOCTYPE)
            .map(|disallow| !disallow)
            .unwrap_or(self.allow_doctype_declaration)
    }

    /// Features other than the ones this parser understands.
    pub fn unsupported_features(&self) -> impl Iterator<Item = &str> {
        self.features
            .keys()
            .map(String::as_str)
            .filter(|name| *name != FEATURE_NAMESPACES && *name != FEATURE_DISALLOW_DOCTYPE)
    }

    /// Reject empty namespace bindings. Unsupported features and properties
    /// are logged here and ignored by the parser.
    pub fn validate(&self) -> Result<(), String> {
        for feature in self.unsupported_features() {
            tracing::warn!("Ignoring unsupported XML parser feature: {}", feature);
        }
        for property in self.properties.keys() {
            tracing::warn!("Ignoring unsupported XML parser property: {}", property);
        }
        for (prefix, uri) in &self.declared_namespaces {
            if prefix.trim().is_empty() {
                return Err(format!("namespace prefix for '{uri}' cannot be empty"));
            }
            if uri.trim().is_empty() {
                return Err(format!("namespace URI for prefix '{prefix}' cannot be empty"));
            }
        }
        Ok(())
    }
}
