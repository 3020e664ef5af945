//! Built-in body parsers, one per content-type family.

use super::content_type::ContentType;
use super::html::parse_html;
use super::parsed::ParsedBody;
use super::xml::XmlDocument;
use crate::config::AssertConfig;
use bytes::Bytes;

/// Turns raw body bytes into a [`ParsedBody`]. Parsers never fail; content
/// they cannot read degrades to text.
pub trait BodyParser: Send + Sync {
    /// Family this parser was written for.
    fn family(&self) -> ContentType;

    fn parse(&self, body: &[u8], config: &AssertConfig) -> ParsedBody;
}

fn lossy(body: &[u8]) -> String {
    String::from_utf8_lossy(body).into_owned()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl BodyParser for JsonParser {
    fn family(&self) -> ContentType {
        ContentType::Json
    }

    fn parse(&self, body: &[u8], _config: &AssertConfig) -> ParsedBody {
        if body.iter().all(u8::is_ascii_whitespace) {
            return ParsedBody::Text(lossy(body));
        }
        match serde_json::from_slice(body) {
            Ok(value) => ParsedBody::Json(value),
            Err(e) => {
                tracing::debug!("Body is not valid JSON, keeping it as text: {}", e);
                ParsedBody::Text(lossy(body))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

impl BodyParser for XmlParser {
    fn family(&self) -> ContentType {
        ContentType::Xml
    }

    fn parse(&self, body: &[u8], config: &AssertConfig) -> ParsedBody {
        parse_markup(body, config)
    }
}

/// Reads HTML leniently. Doctypes, void elements and unclosed tags are
/// accepted and the result is queried like an XML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlParser;

impl BodyParser for HtmlParser {
    fn family(&self) -> ContentType {
        ContentType::Html
    }

    fn parse(&self, body: &[u8], config: &AssertConfig) -> ParsedBody {
        let text = lossy(body);
        if text.trim().is_empty() {
            return ParsedBody::Text(text);
        }
        match parse_html(&text, &config.xml) {
            Ok(document) => ParsedBody::Xml(document),
            Err(e) => {
                tracing::debug!("Body is not readable HTML, keeping it as text: {}", e);
                ParsedBody::Text(text)
            }
        }
    }
}

fn parse_markup(body: &[u8], config: &AssertConfig) -> ParsedBody {
    let text = lossy(body);
    if text.trim().is_empty() {
        return ParsedBody::Text(text);
    }
    match XmlDocument::parse(&text, &config.xml) {
        Ok(document) => ParsedBody::Xml(document),
        Err(e) => {
            tracing::debug!("Body is not well-formed markup, keeping it as text: {}", e);
            ParsedBody::Text(text)
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextParser;

impl BodyParser for TextParser {
    fn family(&self) -> ContentType {
        ContentType::Text
    }

    fn parse(&self, body: &[u8], _config: &AssertConfig) -> ParsedBody {
        ParsedBody::Text(lossy(body))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormParser;

impl BodyParser for FormParser {
    fn family(&self) -> ContentType {
        ContentType::UrlEnc
    }

    fn parse(&self, body: &[u8], _config: &AssertConfig) -> ParsedBody {
        let text = lossy(body);
        if text.trim().is_empty() {
            return ParsedBody::Text(text);
        }
        let pairs = text
            .trim()
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_form_component(name), decode_form_component(value))
            })
            .collect();
        ParsedBody::Form(pairs)
    }
}

fn decode_form_component(raw: &str) -> String {
    let raw = raw.replace('+', " ");
    match urlencoding::decode(&raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw,
    }
}

/// Keeps the body as raw bytes. Serves the binary family and every content
/// type nothing else claims.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawParser;

impl BodyParser for RawParser {
    fn family(&self) -> ContentType {
        ContentType::Binary
    }

    fn parse(&self, body: &[u8], _config: &AssertConfig) -> ParsedBody {
        ParsedBody::Binary(Bytes::copy_from_slice(body))
    }
}
