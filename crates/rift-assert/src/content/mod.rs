//! Content-type driven body parsing.
//!
//! The `Content-Type` header of a response selects a family, and the
//! family's parser turns the body into a [`ParsedBody`]. Unknown content
//! types fall back to a raw parser with a warning and never fail.
//!
//! # Module Structure
//!
//! - `content_type` - Families and their MIME strings
//! - `html` - Lenient HTML reading into XML documents
//! - `parser` - Built-in parsers for each family
//! - `parsed` - The parsed body tree handed to assertions
//! - `registry` - MIME lookup and parser registration
//! - `xml` - XML documents and XPath evaluation

mod content_type;
mod html;
mod parsed;
mod parser;
mod registry;
mod xml;

pub use content_type::{normalize_mime, ContentType};
pub use parsed::ParsedBody;
pub use parser::{
    BodyParser, FormParser, HtmlParser, JsonParser, RawParser, TextParser, XmlParser,
};
pub use registry::ContentTypeRegistry;
pub use xml::{XmlDocument, XmlError};
