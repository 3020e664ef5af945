//! Content-type families and their MIME strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A group of MIME strings that share one body parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Json,
    Xml,
    Html,
    Text,
    #[serde(alias = "urlencoded")]
    UrlEnc,
    Binary,
}

const JSON: &[&str] = &[
    "application/json",
    "application/javascript",
    "text/javascript",
    "text/json",
];
const XML: &[&str] = &["application/xml", "text/xml", "application/xhtml+xml"];
const HTML: &[&str] = &["text/html"];
const TEXT: &[&str] = &["text/plain"];
const URLENC: &[&str] = &["application/x-www-form-urlencoded"];
const BINARY: &[&str] = &["application/octet-stream"];

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        ContentType::Json,
        ContentType::Xml,
        ContentType::Html,
        ContentType::Text,
        ContentType::UrlEnc,
        ContentType::Binary,
    ];

    /// MIME strings registered for this family out of the box.
    pub fn mime_types(self) -> &'static [&'static str] {
        match self {
            ContentType::Json => JSON,
            ContentType::Xml => XML,
            ContentType::Html => HTML,
            ContentType::Text => TEXT,
            ContentType::UrlEnc => URLENC,
            ContentType::Binary => BINARY,
        }
    }

    /// Family of a normalized MIME string, including the `+json`, `+xml`
    /// and `+html` suffix rules.
    pub fn from_mime(mime: &str) -> Option<ContentType> {
        if let Some(family) = Self::ALL
            .into_iter()
            .find(|family| family.mime_types().contains(&mime))
        {
            return Some(family);
        }
        if mime.ends_with("+json") {
            Some(ContentType::Json)
        } else if mime.ends_with("+xml") {
            Some(ContentType::Xml)
        } else if mime.ends_with("+html") {
            Some(ContentType::Html)
        } else {
            None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Json => "json",
            ContentType::Xml => "xml",
            ContentType::Html => "html",
            ContentType::Text => "text",
            ContentType::UrlEnc => "urlenc",
            ContentType::Binary => "binary",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ContentType::Json),
            "xml" => Ok(ContentType::Xml),
            "html" => Ok(ContentType::Html),
            "text" => Ok(ContentType::Text),
            "urlenc" | "urlencoded" => Ok(ContentType::UrlEnc),
            "binary" => Ok(ContentType::Binary),
            other => Err(format!("Unknown content type family: {other}")),
        }
    }
}

/// Drop parameters such as `charset` and normalize case and whitespace.
pub fn normalize_mime(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mime() {
        assert_eq!(normalize_mime("application/json; charset=utf-8"), "application/json");
        assert_eq!(normalize_mime("  Text/HTML "), "text/html");
        assert_eq!(normalize_mime(""), "");
    }

    #[test]
    fn test_families() {
        assert_eq!(ContentType::from_mime("application/javascript"), Some(ContentType::Json));
        assert_eq!(ContentType::from_mime("text/json"), Some(ContentType::Json));
        assert_eq!(ContentType::from_mime("application/hal+json"), Some(ContentType::Json));
        assert_eq!(ContentType::from_mime("application/rss+xml"), Some(ContentType::Xml));
        assert_eq!(ContentType::from_mime("application/xhtml+xml"), Some(ContentType::Xml));
        assert_eq!(ContentType::from_mime("application/vnd+html"), Some(ContentType::Html));
        assert_eq!(
            ContentType::from_mime("application/x-www-form-urlencoded"),
            Some(ContentType::UrlEnc)
        );
        assert_eq!(ContentType::from_mime("x/unknown"), None);
    }

    #[test]
    fn test_parse_family_name() {
        assert_eq!("JSON".parse::<ContentType>(), Ok(ContentType::Json));
        assert_eq!("urlencoded".parse::<ContentType>(), Ok(ContentType::UrlEnc));
        assert!("yaml".parse::<ContentType>().is_err());
        assert_eq!(ContentType::UrlEnc.to_string(), "urlenc");
    }
}
