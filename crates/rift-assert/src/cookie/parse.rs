//! `Set-Cookie` header parsing.
//!
//! Grammar: `name=value; Attr1=Val1; Flag; ...`. Attribute names are matched
//! case-insensitively. Attributes with unusable values are dropped one by one
//! with a warning; only a header without a cookie name is rejected outright.

use super::origin::CookieOrigin;
use super::types::{Cookie, CookieBuilder};
use chrono::{DateTime, NaiveDateTime, Utc};

const DOMAIN: &str = "domain";
const PATH: &str = "path";
const MAX_AGE: &str = "max-age";
const EXPIRES: &str = "expires";
const SECURE: &str = "secure";
const HTTP_ONLY: &str = "httponly";
const SAME_SITE: &str = "samesite";
const VERSION: &str = "version";
const COMMENT: &str = "comment";

/// Fallback formats for `Expires` values that are not RFC 1123.
const EXPIRES_FORMATS: &[&str] = &[
    "%a, %d-%b-%Y %H:%M:%S GMT",
    "%a, %d-%b-%y %H:%M:%S GMT",
    "%A, %d-%b-%y %H:%M:%S GMT",
    "%a %b %e %H:%M:%S %Y",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieParseError {
    #[error("Set-Cookie header is empty")]
    Empty,
    #[error("Set-Cookie header '{0}' has no cookie name")]
    MissingName(String),
}

/// Parse one `Set-Cookie` value.
///
/// When `origin` is given, a missing `Domain` defaults to the origin host and
/// a missing `Path` to the origin path.
pub fn parse_set_cookie(
    header: &str,
    origin: Option<&CookieOrigin>,
) -> Result<Cookie, CookieParseError> {
    let header = header.trim();
    if header.is_empty() {
        return Err(CookieParseError::Empty);
    }

    let mut parts = header.split(';');
    let first = parts.next().unwrap_or_default();
    let (name, value) = split_pair(first);
    if name.is_empty() {
        return Err(CookieParseError::MissingName(header.to_string()));
    }

    let mut builder = CookieBuilder::new(name, value.map(str::to_string));
    for part in parts {
        if part.trim().is_empty() {
            continue;
        }
        let (attr, value) = split_pair(part);
        builder = apply_attribute(builder, attr, value);
    }

    if let Some(origin) = origin {
        if !builder.has_domain() {
            builder = builder.domain(origin.host());
        }
        if !builder.has_path() {
            builder = builder.path(origin.path());
        }
    }

    Ok(builder.build())
}

fn split_pair(part: &str) -> (&str, Option<&str>) {
    match part.split_once('=') {
        Some((key, value)) => (key.trim(), Some(value.trim())),
        None => (part.trim(), None),
    }
}

fn apply_attribute(builder: CookieBuilder, attr: &str, value: Option<&str>) -> CookieBuilder {
    let attr_lower = attr.to_ascii_lowercase();
    match (attr_lower.as_str(), value) {
        (SECURE, _) => builder.secure(true),
        (HTTP_ONLY, _) => builder.http_only(true),
        (_, None) => builder,
        (DOMAIN, Some(domain)) if !domain.is_empty() => builder.domain(domain),
        (PATH, Some(path)) if !path.is_empty() => builder.path(path),
        (MAX_AGE, Some(raw)) => match raw.parse::<i64>() {
            Ok(max_age) => builder.max_age(max_age),
            Err(_) => {
                tracing::warn!("Ignoring unparsable 'Max-Age' attribute value: {}", raw);
                builder
            }
        },
        (EXPIRES, Some(raw)) => {
            let raw = raw.replace('"', "");
            match parse_expires(raw.trim()) {
                Some(expiry) => builder.expiry(expiry),
                None => {
                    tracing::warn!("Ignoring unparsable 'Expires' attribute value: {}", raw);
                    builder
                }
            }
        }
        (SAME_SITE, Some(same_site)) => builder.same_site(same_site),
        (VERSION, Some(raw)) => {
            // Some servers quote the version
            let raw = raw.replace('"', "");
            match raw.trim().parse::<i32>() {
                Ok(version) if version >= 0 => builder.version(version),
                _ => builder,
            }
        }
        (COMMENT, Some(comment)) => builder.comment(comment),
        _ => builder,
    }
}

/// Parse an HTTP-date in any of the formats servers commonly send.
pub fn parse_expires(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc2822(raw) {
        return Some(date.with_timezone(&Utc));
    }
    EXPIRES_FORMATS.iter().find_map(|format| {
        NaiveDateTime::parse_from_str(raw, format)
            .ok()
            .map(|naive| naive.and_utc())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use tracing_test::traced_test;

    #[test]
    fn test_parse_full_header() {
        let cookie = parse_set_cookie(
            "DEVICE_ID=123; Domain=.test.com; Path=/; Secure; HttpOnly; Max-Age=0",
            None,
        )
        .unwrap();

        assert_eq!(cookie.name(), "DEVICE_ID");
        assert_eq!(cookie.value(), Some("123"));
        assert_eq!(cookie.domain(), Some(".test.com"));
        assert_eq!(cookie.path(), Some("/"));
        assert!(cookie.is_secure());
        assert!(cookie.is_http_only());
        assert_eq!(cookie.max_age(), Some(0));
        assert_eq!(cookie.version(), -1);
    }

    #[test]
    fn test_negative_max_age_is_kept() {
        let cookie = parse_set_cookie("a=b; Max-Age=-1", None).unwrap();
        assert_eq!(cookie.max_age(), Some(-1));
    }

    #[test]
    fn test_attribute_names_are_case_insensitive() {
        let cookie =
            parse_set_cookie("a=b; DOMAIN=x.com; path=/p; SECURE; httponly; samesite=Lax", None)
                .unwrap();
        assert_eq!(cookie.domain(), Some("x.com"));
        assert_eq!(cookie.path(), Some("/p"));
        assert!(cookie.is_secure());
        assert!(cookie.is_http_only());
        assert_eq!(cookie.same_site(), Some("Lax"));
    }

    #[test]
    fn test_name_without_value() {
        let cookie = parse_set_cookie("flag; Path=/", None).unwrap();
        assert_eq!(cookie.name(), "flag");
        assert_eq!(cookie.value(), None);
    }

    #[test]
    fn test_value_may_contain_equals() {
        let cookie = parse_set_cookie("token=a=b==; Path=/", None).unwrap();
        assert_eq!(cookie.value(), Some("a=b=="));
    }

    #[test]
    fn test_version_and_comment() {
        let cookie = parse_set_cookie("a=b; Version=\"1\"; Comment=hello", None).unwrap();
        assert_eq!(cookie.version(), 1);
        assert_eq!(cookie.comment(), Some("hello"));

        let cookie = parse_set_cookie("a=b; Version=0", None).unwrap();
        assert_eq!(cookie.version(), 0);
    }

    #[test]
    fn test_expires_formats() {
        let cookie = parse_set_cookie("a=b; Expires=Wed, 21 Oct 2015 07:28:00 GMT", None).unwrap();
        let expiry = cookie.expiry().unwrap();
        assert_eq!((expiry.year(), expiry.month(), expiry.day()), (2015, 10, 21));
        assert_eq!(expiry.hour(), 7);

        let netscape = parse_expires("Wed, 21-Oct-2015 07:28:00 GMT").unwrap();
        assert_eq!(netscape, expiry);
    }

    #[test]
    #[traced_test]
    fn test_unparsable_expires_drops_only_that_attribute() {
        let cookie = parse_set_cookie("a=b; Expires=not a date; Path=/x", None).unwrap();
        assert!(cookie.expiry().is_none());
        assert_eq!(cookie.path(), Some("/x"));
        assert!(logs_contain("Ignoring unparsable 'Expires' attribute value"));
    }

    #[test]
    fn test_origin_defaults() {
        let origin = CookieOrigin::new("example.com", 80, "/account", false);
        let cookie = parse_set_cookie("a=b", Some(&origin)).unwrap();
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.path(), Some("/account"));

        let cookie = parse_set_cookie("a=b; Domain=other.com; Path=/", Some(&origin)).unwrap();
        assert_eq!(cookie.domain(), Some("other.com"));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(parse_set_cookie("  ", None), Err(CookieParseError::Empty));
        assert!(matches!(
            parse_set_cookie("=value; Path=/", None),
            Err(CookieParseError::MissingName(_))
        ));
    }
}
