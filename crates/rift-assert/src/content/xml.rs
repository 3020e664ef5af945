//! XML documents parsed with `sxd-document` and queried with `sxd-xpath`.

use crate::config::XmlConfig;
use serde_json::Value;
use sxd_document::dom::{ChildOfElement, ChildOfRoot, Element};
use sxd_document::Package;
use sxd_xpath::{Context, Factory, Value as XPathValue};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    #[error("DOCTYPE is disallowed when allow_doctype_declaration is false")]
    DoctypeNotAllowed,
    #[error("Failed to parse XML: {0}")]
    Parse(String),
    #[error("Invalid XPath expression '{expression}': {reason}")]
    InvalidXPath { expression: String, reason: String },
}

/// A parsed XML body.
pub struct XmlDocument {
    source: String,
    package: Package,
    namespaces: BTreeMap<String, String>,
}

impl XmlDocument {
    /// Parse `source` honoring the namespace and doctype settings of
    /// `config`.
    pub fn parse(source: &str, config: &XmlConfig) -> Result<Self, XmlError> {
        if !config.effective_allow_doctype() && contains_doctype(source) {
            return Err(XmlError::DoctypeNotAllowed);
        }
        Self::from_markup(source.to_string(), source, config)
    }

    /// Build a document from `markup` while reporting `source` as the body
    /// it came from. The doctype policy is not applied.
    pub(crate) fn from_markup(
        source: String,
        markup: &str,
        config: &XmlConfig,
    ) -> Result<Self, XmlError> {
        let package = sxd_document::parser::parse(markup)
            .map_err(|e| XmlError::Parse(format!("{e:?}")))?;

        if !config.effective_namespace_aware() {
            let document = package.as_document();
            for child in document.root().children() {
                if let ChildOfRoot::Element(element) = child {
                    strip_namespaces(element);
                }
            }
        }

        Ok(Self {
            source,
            package,
            namespaces: config.declared_namespaces.clone(),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name of the document element.
    pub fn root_name(&self) -> Option<String> {
        self.package
            .as_document()
            .root()
            .children()
            .into_iter()
            .find_map(|child| match child {
                ChildOfRoot::Element(element) => Some(element.name().local_part().to_string()),
                _ => None,
            })
    }

    /// Evaluate `expression` against the document.
    ///
    /// Node sets map to `null` when empty, to the string value of the node
    /// when there is exactly one, and to an array of string values otherwise.
    pub fn evaluate(&self, expression: &str) -> Result<Value, XmlError> {
        let value = self.evaluate_raw(expression)?;
        Ok(match value {
            XPathValue::Boolean(b) => Value::Bool(b),
            XPathValue::Number(n) => number_value(n),
            XPathValue::String(s) => Value::String(s),
            XPathValue::Nodeset(nodes) => {
                let mut values: Vec<Value> = nodes
                    .document_order()
                    .into_iter()
                    .map(|node| Value::String(node.string_value()))
                    .collect();
                match values.len() {
                    0 => Value::Null,
                    1 => values.remove(0),
                    _ => Value::Array(values),
                }
            }
        })
    }

    /// Whether `expression` selects anything: a non-empty node set, `true`,
    /// or any number or string.
    pub fn has_match(&self, expression: &str) -> Result<bool, XmlError> {
        Ok(match self.evaluate_raw(expression)? {
            XPathValue::Boolean(b) => b,
            XPathValue::Nodeset(nodes) => nodes.size() > 0,
            XPathValue::Number(_) | XPathValue::String(_) => true,
        })
    }

    /// String value of `expression` as XPath's `string()` would compute it.
    pub fn string_value(&self, expression: &str) -> Result<String, XmlError> {
        Ok(self.evaluate_raw(expression)?.string())
    }

    fn evaluate_raw(&self, expression: &str) -> Result<XPathValue<'_>, XmlError> {
        let invalid = |reason: String| XmlError::InvalidXPath {
            expression: expression.to_string(),
            reason,
        };
        let xpath = Factory::new()
            .build(expression)
            .map_err(|e| invalid(format!("{e:?}")))?
            .ok_or_else(|| invalid("no XPath was compiled".to_string()))?;

        let mut context = Context::new();
        for (prefix, uri) in &self.namespaces {
            context.set_namespace(prefix, uri);
        }

        let document = self.package.as_document();
        xpath
            .evaluate(&context, document.root())
            .map_err(|e| invalid(format!("{e:?}")))
    }
}

impl fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlDocument")
            .field("source", &self.source)
            .field("namespaces", &self.namespaces)
            .finish()
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn contains_doctype(source: &str) -> bool {
    source.to_ascii_uppercase().contains("<!DOCTYPE")
}

/// Rename every element and attribute to its local part.
fn strip_namespaces(element: Element<'_>) {
    let local = element.name().local_part().to_string();
    element.set_name(local.as_str());

    for attribute in element.attributes() {
        let name = attribute.name();
        if name.namespace_uri().is_none() {
            continue;
        }
        let local = name.local_part().to_string();
        let value = attribute.value().to_string();
        element.remove_attribute(name);
        element.set_attribute_value(local.as_str(), &value);
    }

    for child in element.children() {
        if let ChildOfElement::Element(child) = child {
            strip_namespaces(child);
        }
    }
}

fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}
