//! Lenient HTML reading.
//!
//! HTML is tokenized with `tl`, which accepts doctypes, void elements and
//! unclosed tags, and then rewritten as well-formed XML so the same XPath
//! and dotted-path evaluation used for XML bodies applies.

use super::xml::{XmlDocument, XmlError};
use crate::config::XmlConfig;
use std::collections::HashSet;
use tl::{HTMLTag, Node, NodeHandle, Parser, ParserOptions};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Parse an HTML page into an [`XmlDocument`].
///
/// Markup that is not a tag is dropped at the top level. When the page has
/// more than one top-level element they are wrapped in `<html>`.
pub fn parse_html(source: &str, config: &XmlConfig) -> Result<XmlDocument, XmlError> {
    let body = without_doctype(source);
    let dom = tl::parse(&body, ParserOptions::default())
        .map_err(|e| XmlError::Parse(format!("{e:?}")))?;
    let parser = dom.parser();

    let roots: Vec<NodeHandle> = dom
        .children()
        .iter()
        .copied()
        .filter(|handle| matches!(handle.get(parser), Some(Node::Tag(_))))
        .collect();

    let mut markup = String::with_capacity(source.len());
    let single_root = roots.len() == 1
        && roots[0]
            .get(parser)
            .and_then(Node::as_tag)
            .and_then(element_name)
            .is_some();
    if !single_root {
        markup.push_str("<html>");
    }
    for handle in &roots {
        write_node(*handle, parser, &mut markup);
    }
    if !single_root {
        markup.push_str("</html>");
    }

    XmlDocument::from_markup(source.to_string(), &markup, config)
}

/// `source` with its `<!DOCTYPE ...>` declaration removed.
fn without_doctype(source: &str) -> String {
    let Some(start) = source.to_ascii_lowercase().find("<!doctype") else {
        return source.to_string();
    };
    match source[start..].find('>') {
        Some(end) => format!("{}{}", &source[..start], &source[start + end + 1..]),
        None => source[..start].to_string(),
    }
}

fn write_node(handle: NodeHandle, parser: &Parser<'_>, out: &mut String) {
    match handle.get(parser) {
        Some(Node::Tag(tag)) => write_tag(tag, parser, out),
        Some(Node::Raw(text)) => escape_into(&decode_entities(&text.as_utf8_str()), out, false),
        Some(Node::Comment(_)) | None => {}
    }
}

fn write_tag(tag: &HTMLTag<'_>, parser: &Parser<'_>, out: &mut String) {
    let children = tag.children();
    let Some(name) = element_name(tag) else {
        // Not a usable element name, keep what it contains
        for child in children.top().iter() {
            write_node(*child, parser, out);
        }
        return;
    };

    out.push('<');
    out.push_str(&name);
    let mut seen = HashSet::new();
    for (attribute, value) in tag.attributes().iter() {
        let Some(attribute) = xml_name(&attribute) else {
            continue;
        };
        let namespace = attribute == "xmlns" || attribute.starts_with("xmlns:");
        if namespace || !seen.insert(attribute.clone()) {
            continue;
        }
        out.push(' ');
        out.push_str(&attribute);
        out.push_str("=\"");
        if let Some(value) = value {
            escape_into(&decode_entities(&value), out, true);
        }
        out.push('"');
    }

    if VOID_ELEMENTS.contains(&name.as_str()) {
        out.push_str("/>");
        // A void element never has children; anything attached to it follows it
        for child in children.top().iter() {
            write_node(*child, parser, out);
        }
        return;
    }

    out.push('>');
    for child in children.top().iter() {
        write_node(*child, parser, out);
    }
    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn element_name(tag: &HTMLTag<'_>) -> Option<String> {
    xml_name(&tag.name().as_utf8_str())
}

/// Lowercased name when it is usable as an XML name without a prefix.
fn xml_name(raw: &str) -> Option<String> {
    let name = raw.trim().to_ascii_lowercase();
    let mut chars = name.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() && first != '_' {
        return None;
    }
    chars
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .then_some(name)
}

fn escape_into(text: &str, out: &mut String, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// Resolve character references and the common named entities. Anything
/// else is kept as written.
fn decode_entities(raw: &str) -> String {
    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        rest = &rest[start..];
        let resolved = rest[1..].find(';').and_then(|end| {
            let entity = &rest[1..=end];
            resolve_entity(entity).map(|c| (c, end + 2))
        });
        match resolved {
            Some((c, consumed)) => {
                decoded.push(c);
                rest = &rest[consumed..];
            }
            None => {
                decoded.push('&');
                rest = &rest[1..];
            }
        }
    }
    decoded.push_str(rest);
    decoded
}

fn resolve_entity(entity: &str) -> Option<char> {
    if let Some(number) = entity.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => number.parse().ok()?,
        };
        return char::from_u32(code);
    }
    Some(match entity {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "euro" => '\u{20ac}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "hellip" => '\u{2026}',
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset=utf-8>
    <title>Home</title>
    <link rel="stylesheet" href="site.css">
  </head>
  <body>
    <p class="intro">Fish &amp; Chips<br>daily</p>
    <ul><li>one</li><li>two</li></ul>
  </body>
</html>"#;

    #[test]
    fn test_doctype_page() {
        let doc = parse_html(PAGE, &XmlConfig::default()).unwrap();
        assert_eq!(doc.root_name().as_deref(), Some("html"));
        assert_eq!(doc.evaluate("/html/head/title").unwrap(), Value::from("Home"));
        assert_eq!(doc.evaluate("/html/@lang").unwrap(), Value::from("en"));
        assert_eq!(doc.source(), PAGE);
    }

    #[test]
    fn test_void_elements() {
        let doc = parse_html(PAGE, &XmlConfig::default()).unwrap();
        assert_eq!(doc.evaluate("count(/html/head/*)").unwrap(), Value::from(3));
        assert_eq!(
            doc.evaluate("/html/body/p").unwrap(),
            Value::from("Fish & Chipsdaily")
        );
        assert_eq!(
            doc.evaluate("/html/body/ul/li").unwrap(),
            serde_json::json!(["one", "two"])
        );
    }

    #[test]
    fn test_fragment_is_wrapped() {
        let doc = parse_html("<p>a</p><p>b</p>", &XmlConfig::default()).unwrap();
        assert_eq!(doc.root_name().as_deref(), Some("html"));
        assert_eq!(doc.evaluate("/html/p").unwrap(), serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_xhtml_namespace_is_dropped() {
        let page = r#"<html xmlns="http://www.w3.org/1999/xhtml"><body><h1 id="t">Hi</h1></body></html>"#;
        let doc = parse_html(page, &XmlConfig::default()).unwrap();
        assert_eq!(doc.evaluate("/html/body/h1").unwrap(), Value::from("Hi"));
        assert_eq!(doc.evaluate("/html/body/h1/@id").unwrap(), Value::from("t"));
    }

    #[test]
    fn test_without_doctype() {
        assert_eq!(without_doctype("<!doctype html>\n<p>x</p>"), "\n<p>x</p>");
        assert_eq!(without_doctype("<p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("a &lt;b&gt; &#65;&#x42; &bogus; & c"), "a <b> AB &bogus; & c");
    }
}
