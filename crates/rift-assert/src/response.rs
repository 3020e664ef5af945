//! Response produced by the terminal link of the filter chain.

use crate::cookie::{parse_set_cookie, Cookies};
use crate::error::{Error, Result};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE, SET_COOKIE};
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn body_as_string(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Raw `Content-Type` header, parameters included.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    pub fn set_cookie_values(&self) -> impl Iterator<Item = &str> {
        self.headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
    }

    /// Cookies set by this response. Malformed headers are skipped.
    pub fn cookies(&self) -> Cookies {
        self.set_cookie_values()
            .filter_map(|header| parse_set_cookie(header, None).ok())
            .collect()
    }

    /// Value of the session cookie named `session_id_name`, if set.
    pub fn session_id(&self, session_id_name: &str) -> Option<String> {
        self.cookies()
            .get_value(session_id_name)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
    }
}

impl From<http::Response<Bytes>> for Response {
    fn from(response: http::Response<Bytes>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: parts.status,
            headers: parts.headers,
            body,
        }
    }
}

/// A response captured to a file, as read by the command-line tool.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RecordedResponse {
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub headers: Vec<RecordedHeader>,
    #[serde(default)]
    pub body: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RecordedHeader {
    pub name: String,
    pub value: String,
}

fn default_status() -> u16 {
    200
}

impl RecordedResponse {
    pub fn into_response(self) -> Result<Response> {
        let status = StatusCode::from_u16(self.status)
            .map_err(|_| Error::Config(format!("invalid status code {}", self.status)))?;
        let mut headers = HeaderMap::new();
        for header in &self.headers {
            let name = HeaderName::from_bytes(header.name.as_bytes())
                .map_err(|_| Error::Config(format!("invalid header name '{}'", header.name)))?;
            let value = HeaderValue::from_str(&header.value).map_err(|_| {
                Error::Config(format!("invalid value for header '{}'", header.name))
            })?;
            headers.append(name, value);
        }
        Ok(Response::new(status, headers, self.body))
    }
}
