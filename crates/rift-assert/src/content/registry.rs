//! Content-type driven parser dispatch.

use super::content_type::{normalize_mime, ContentType};
use super::parsed::ParsedBody;
use super::parser::{
    BodyParser, FormParser, HtmlParser, JsonParser, RawParser, TextParser, XmlParser,
};
use crate::config::{AssertConfig, ParserConfig};
use crate::error::{require_non_empty, Result};
use crate::response::Response;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Maps content types to body parsers.
///
/// Parsers are held per family, so replacing the parser of a family takes
/// effect for every MIME string of that family at once.
#[derive(Clone)]
pub struct ContentTypeRegistry {
    parsers: HashMap<ContentType, Arc<dyn BodyParser>>,
    additional: BTreeMap<String, ContentType>,
    default_family: Option<ContentType>,
    fallback: Arc<dyn BodyParser>,
}

impl ContentTypeRegistry {
    pub fn new() -> Self {
        let raw: Arc<dyn BodyParser> = Arc::new(RawParser);
        let mut parsers: HashMap<ContentType, Arc<dyn BodyParser>> = HashMap::new();
        parsers.insert(ContentType::Json, Arc::new(JsonParser));
        parsers.insert(ContentType::Xml, Arc::new(XmlParser));
        parsers.insert(ContentType::Html, Arc::new(HtmlParser));
        parsers.insert(ContentType::Text, Arc::new(TextParser));
        parsers.insert(ContentType::UrlEnc, Arc::new(FormParser));
        parsers.insert(ContentType::Binary, Arc::clone(&raw));
        Self {
            parsers,
            additional: BTreeMap::new(),
            default_family: None,
            fallback: raw,
        }
    }

    /// Registry with the registrations of `config` applied.
    pub fn from_config(config: &ParserConfig) -> Result<Self> {
        let mut registry = Self::new();
        for (mime, family) in &config.additional {
            registry.register_parser(mime, *family)?;
        }
        if let Some(family) = config.default_parser {
            registry.register_default_parser(family);
        }
        Ok(registry)
    }

    /// Family handling `content_type`, if any. Parameters are ignored.
    pub fn family_for(&self, content_type: &str) -> Option<ContentType> {
        let mime = normalize_mime(content_type);
        self.additional
            .get(&mime)
            .copied()
            .or_else(|| ContentType::from_mime(&mime))
    }

    /// Parser for a `Content-Type` header value. Never fails: content types
    /// nothing claims get the default parser.
    pub fn parser_for(&self, content_type: &str) -> Arc<dyn BodyParser> {
        if let Some(family) = self.family_for(content_type) {
            if let Some(parser) = self.parsers.get(&family) {
                return Arc::clone(parser);
            }
        }
        tracing::warn!(
            "Cannot find a parser for content type '{}', using the default parser",
            content_type
        );
        self.default_parser()
    }

    /// Parser used for content types nothing else claims.
    pub fn default_parser(&self) -> Arc<dyn BodyParser> {
        self.default_family
            .and_then(|family| self.parsers.get(&family))
            .map_or_else(|| Arc::clone(&self.fallback), Arc::clone)
    }

    /// Parser serving `family`.
    pub fn family_parser(&self, family: ContentType) -> Arc<dyn BodyParser> {
        self.parsers
            .get(&family)
            .map_or_else(|| Arc::clone(&self.fallback), Arc::clone)
    }

    /// Replace the parser of a whole family.
    pub fn register_family_parser(&mut self, family: ContentType, parser: Arc<dyn BodyParser>) {
        tracing::debug!(family = %family, "Registering family parser");
        self.parsers.insert(family, parser);
    }

    /// Parse bodies of `mime` with the parser of `family`.
    pub fn register_parser(&mut self, mime: &str, family: ContentType) -> Result<()> {
        require_non_empty(mime, "Content-Type")?;
        self.additional.insert(normalize_mime(mime), family);
        Ok(())
    }

    /// Remove a registration made with [`register_parser`](Self::register_parser).
    pub fn unregister_parser(&mut self, mime: &str) -> Option<ContentType> {
        self.additional.remove(&normalize_mime(mime))
    }

    /// Use the parser of `family` for unknown content types.
    pub fn register_default_parser(&mut self, family: ContentType) {
        self.default_family = Some(family);
    }

    pub fn has_additional_parser(&self, mime: &str) -> bool {
        self.additional.contains_key(&normalize_mime(mime))
    }

    /// Parse the body of `response` according to its `Content-Type`.
    pub fn parse(&self, response: &Response, config: &AssertConfig) -> ParsedBody {
        let parser = match response.content_type() {
            Some(content_type) => self.parser_for(content_type),
            None => {
                tracing::debug!("Response has no Content-Type, using the default parser");
                self.default_parser()
            }
        };
        parser.parse(response.body(), config)
    }
}

impl Default for ContentTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContentTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut families: Vec<_> = self.parsers.keys().collect();
        families.sort();
        f.debug_struct("ContentTypeRegistry")
            .field("families", &families)
            .field("additional", &self.additional)
            .field("default_family", &self.default_family)
            .finish()
    }
}
