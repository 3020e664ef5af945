use super::xml::XmlDocument;
use bytes::Bytes;
use serde_json::Value;
use std::borrow::Cow;

/// A response body after content-type dispatch.
///
/// Bodies that cannot be parsed as their declared type degrade to
/// [`ParsedBody::Text`].
#[derive(Debug)]
pub enum ParsedBody {
    Json(Value),
    Xml(XmlDocument),
    /// Decoded `application/x-www-form-urlencoded` pairs in body order.
    Form(Vec<(String, String)>),
    Text(String),
    Binary(Bytes),
}

impl ParsedBody {
    /// Whether path expressions can be evaluated against this body.
    pub fn is_structured(&self) -> bool {
        matches!(self, ParsedBody::Json(_) | ParsedBody::Xml(_) | ParsedBody::Form(_))
    }

    /// Name of the path kind used in assertion messages.
    pub fn path_description(&self) -> &'static str {
        match self {
            ParsedBody::Json(_) => "JSON path",
            ParsedBody::Xml(_) => "XML path",
            ParsedBody::Form(_) => "Form parameter",
            ParsedBody::Text(_) | ParsedBody::Binary(_) => "Path",
        }
    }

    /// The body as text for unstructured content.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            ParsedBody::Text(text) => Some(Cow::Borrowed(text)),
            ParsedBody::Binary(bytes) => Some(String::from_utf8_lossy(bytes)),
            _ => None,
        }
    }
}
