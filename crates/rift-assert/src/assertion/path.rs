//! Structured path evaluation against parsed bodies.
//!
//! JSON bodies accept RFC 9535 JSONPath (`$.items[0].id`) and dotted keys
//! (`items[0].id`, `items.id`). A dotted key applied to an array collects the
//! key from every element. XML bodies accept XPath (`/order/item`) and dotted
//! keys whose first segment is the root element (`order.item[0].@sku`).
//! Form bodies are keyed by field name.

use crate::content::{ParsedBody, XmlDocument, XmlError};
use serde_json::Value;
use serde_json_path::JsonPath;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path \"{0}\" was not found")]
    NotFound(String),

    #[error("invalid path \"{path}\": {reason}")]
    Invalid { path: String, reason: String },

    #[error("paths cannot be evaluated against {0} content")]
    Unsupported(&'static str),
}

/// Extracts a value from a parsed body.
pub trait PathEvaluator: Send + Sync {
    fn evaluate(&self, body: &ParsedBody, path: &str) -> Result<Value, PathError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPathEvaluator;

impl PathEvaluator for DefaultPathEvaluator {
    fn evaluate(&self, body: &ParsedBody, path: &str) -> Result<Value, PathError> {
        match body {
            ParsedBody::Json(json) => evaluate_json(json, path),
            ParsedBody::Xml(document) => evaluate_xml(document, path),
            ParsedBody::Form(pairs) => evaluate_form(pairs, path),
            ParsedBody::Text(_) => Err(PathError::Unsupported("text")),
            ParsedBody::Binary(_) => Err(PathError::Unsupported("binary")),
        }
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> PathError {
    PathError::Invalid {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// A dotted-path segment such as `items[0][-1]`.
#[derive(Debug, PartialEq)]
struct Segment<'a> {
    name: &'a str,
    indices: Vec<i64>,
}

fn parse_segments(path: &str) -> Result<Vec<Segment<'_>>, PathError> {
    path.split('.')
        .map(|raw| {
            let (name, mut rest) = match raw.find('[') {
                Some(pos) => (&raw[..pos], &raw[pos..]),
                None => (raw, ""),
            };
            let mut indices = Vec::new();
            while !rest.is_empty() {
                let end = rest
                    .find(']')
                    .filter(|_| rest.starts_with('['))
                    .ok_or_else(|| invalid(path, format!("malformed segment '{raw}'")))?;
                let index = rest[1..end]
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| invalid(path, format!("'{}' is not an index", &rest[1..end])))?;
                indices.push(index);
                rest = &rest[end + 1..];
            }
            if name.is_empty() && indices.is_empty() {
                return Err(invalid(path, "empty segment"));
            }
            Ok(Segment { name, indices })
        })
        .collect()
}

fn evaluate_json(json: &Value, path: &str) -> Result<Value, PathError> {
    if path.starts_with('$') {
        let json_path = JsonPath::parse(path).map_err(|e| invalid(path, e.to_string()))?;
        let mut nodes = json_path.query(json).all();
        return match nodes.len() {
            0 => Err(PathError::NotFound(path.to_string())),
            1 => Ok(nodes.remove(0).clone()),
            _ => Ok(Value::Array(nodes.into_iter().cloned().collect())),
        };
    }

    let mut current = json.clone();
    for segment in parse_segments(path)? {
        if !segment.name.is_empty() {
            current = property(&current, segment.name)
                .ok_or_else(|| PathError::NotFound(path.to_string()))?;
        }
        for index in segment.indices {
            current = element(&current, index)
                .ok_or_else(|| PathError::NotFound(path.to_string()))?;
        }
    }
    Ok(current)
}

/// Property lookup; arrays collect the property from each element.
fn property(value: &Value, name: &str) -> Option<Value> {
    match value {
        Value::Object(map) => map.get(name).cloned(),
        Value::Array(items) => Some(Value::Array(
            items.iter().filter_map(|item| property(item, name)).collect(),
        )),
        _ => None,
    }
}

fn element(value: &Value, index: i64) -> Option<Value> {
    let items = value.as_array()?;
    let index = if index < 0 {
        items.len().checked_sub(index.unsigned_abs() as usize)?
    } else {
        index as usize
    };
    items.get(index).cloned()
}

fn evaluate_xml(document: &XmlDocument, path: &str) -> Result<Value, PathError> {
    let expression = if is_xpath(path) {
        path.to_string()
    } else {
        dotted_to_xpath(path)?
    };
    let value = document.evaluate(&expression).map_err(|e| match e {
        XmlError::InvalidXPath { reason, .. } => invalid(path, reason),
        other => invalid(path, other.to_string()),
    })?;
    if value.is_null() {
        return Err(PathError::NotFound(path.to_string()));
    }
    Ok(value)
}

fn is_xpath(path: &str) -> bool {
    path.starts_with('/') || path.starts_with('(') || path.contains("::") || path.contains('(')
}

/// `order.item[0].@sku` becomes `/order/item[1]/@sku`.
fn dotted_to_xpath(path: &str) -> Result<String, PathError> {
    let mut xpath = String::new();
    for segment in parse_segments(path)? {
        xpath.push('/');
        xpath.push_str(if segment.name.is_empty() { "*" } else { segment.name });
        for index in segment.indices {
            if index < 0 {
                let offset = index.unsigned_abs() - 1;
                if offset == 0 {
                    xpath.push_str("[last()]");
                } else {
                    xpath.push_str(&format!("[last()-{offset}]"));
                }
            } else {
                xpath.push_str(&format!("[{}]", index + 1));
            }
        }
    }
    Ok(xpath)
}

fn evaluate_form(pairs: &[(String, String)], path: &str) -> Result<Value, PathError> {
    let mut values: Vec<Value> = pairs
        .iter()
        .filter(|(name, _)| name == path)
        .map(|(_, value)| Value::String(value.clone()))
        .collect();
    match values.len() {
        0 => Err(PathError::NotFound(path.to_string())),
        1 => Ok(values.remove(0)),
        _ => Ok(Value::Array(values)),
    }
}
