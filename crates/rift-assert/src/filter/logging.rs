//! Request and response logging through `tracing`.
//!
//! Details are rendered into one multi-line message per request or response
//! and emitted at `info` level under the `rift_assert::log` target.

use super::{Filter, FilterContext};
use crate::error::{Error, Result};
use crate::request::FilterableRequest;
use crate::response::Response;
use crate::response_spec::ResponseSpec;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::sync::Arc;

const LOG_TARGET: &str = "rift_assert::log";

/// How much of a request or response to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogDetail {
    #[default]
    All,
    Headers,
    Cookies,
    Body,
    Status,
    Method,
    Uri,
}

impl fmt::Display for LogDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogDetail::All => "ALL",
            LogDetail::Headers => "HEADERS",
            LogDetail::Cookies => "COOKIES",
            LogDetail::Body => "BODY",
            LogDetail::Status => "STATUS",
            LogDetail::Method => "METHOD",
            LogDetail::Uri => "URI",
        };
        f.write_str(name)
    }
}

fn write_headers(out: &mut String, label: &str, headers: &HeaderMap) {
    let mut first = true;
    for (name, value) in headers {
        let prefix = if first { label } else { "" };
        let _ = writeln!(
            out,
            "{prefix:<17}{}={}",
            name,
            String::from_utf8_lossy(value.as_bytes())
        );
        first = false;
    }
    if first {
        let _ = writeln!(out, "{label:<17}<none>");
    }
}

/// Render the parts of `request` selected by `detail`.
pub fn render_request(request: &FilterableRequest, detail: LogDetail) -> String {
    let mut out = String::new();
    let all = detail == LogDetail::All;
    if all || detail == LogDetail::Method {
        let _ = writeln!(out, "{:<17}{}", "Request method:", request.method());
    }
    if all || detail == LogDetail::Uri {
        let _ = writeln!(out, "{:<17}{}", "Request URI:", request.uri());
    }
    if all || detail == LogDetail::Headers {
        write_headers(&mut out, "Headers:", request.headers());
    }
    if all || detail == LogDetail::Cookies {
        let _ = writeln!(
            out,
            "{:<17}{}",
            "Cookies:",
            request
                .cookies()
                .to_header_value()
                .unwrap_or_else(|| "<none>".to_string())
        );
    }
    out
}

/// Render the parts of `response` selected by `detail`.
pub fn render_response(response: &Response, detail: LogDetail) -> String {
    let mut out = String::new();
    let all = detail == LogDetail::All;
    if all || detail == LogDetail::Status {
        let _ = writeln!(out, "{}", response.status());
    }
    if all || detail == LogDetail::Headers {
        write_headers(&mut out, "", response.headers());
    }
    if all || detail == LogDetail::Cookies {
        for cookie in &response.cookies() {
            let _ = writeln!(out, "{cookie}");
        }
    }
    if all || detail == LogDetail::Body {
        if all {
            out.push('\n');
        }
        out.push_str(&response.body_as_string());
        out.push('\n');
    }
    out
}

/// Logs each request before it is sent.
#[derive(Debug, Clone)]
pub struct RequestLoggingFilter {
    detail: LogDetail,
}

impl RequestLoggingFilter {
    /// Requests carry no status and no body here, so those details are
    /// rejected.
    pub fn new(detail: LogDetail) -> Result<Self> {
        if matches!(detail, LogDetail::Status | LogDetail::Body) {
            return Err(Error::Config(format!(
                "{detail} is not a valid LogDetail for a request."
            )));
        }
        Ok(Self { detail })
    }

    pub fn detail(&self) -> LogDetail {
        self.detail
    }
}

impl Default for RequestLoggingFilter {
    fn default() -> Self {
        Self {
            detail: LogDetail::All,
        }
    }
}

impl Filter for RequestLoggingFilter {
    fn apply(
        &self,
        request: &mut FilterableRequest,
        response_spec: &ResponseSpec,
        ctx: &mut FilterContext<'_>,
    ) -> Result<Response> {
        tracing::info!(target: LOG_TARGET, "\n{}", render_request(request, self.detail));
        ctx.proceed(request, response_spec)
    }

    fn name(&self) -> &str {
        "request-logging-filter"
    }
}

type StatusPredicate = Arc<dyn Fn(u16) -> bool + Send + Sync>;

/// Logs responses, optionally only those whose status code satisfies a
/// predicate.
#[derive(Clone)]
pub struct ResponseLoggingFilter {
    detail: LogDetail,
    predicate: Option<StatusPredicate>,
}

impl ResponseLoggingFilter {
    pub fn new(detail: LogDetail) -> Result<Self> {
        if matches!(detail, LogDetail::Method | LogDetail::Uri) {
            return Err(Error::Config(format!(
                "{detail} is not a valid LogDetail for a response."
            )));
        }
        Ok(Self {
            detail,
            predicate: None,
        })
    }

    /// Only log responses whose status code satisfies `predicate`.
    pub fn for_status<P>(detail: LogDetail, predicate: P) -> Result<Self>
    where
        P: Fn(u16) -> bool + Send + Sync + 'static,
    {
        let mut filter = Self::new(detail)?;
        filter.predicate = Some(Arc::new(predicate));
        Ok(filter)
    }

    /// Only log responses with exactly this status code.
    pub fn for_status_code(status: u16) -> Self {
        Self {
            detail: LogDetail::All,
            predicate: Some(Arc::new(move |code| code == status)),
        }
    }

    /// Log every response with a 4xx or 5xx status.
    pub fn on_error() -> Self {
        Self {
            detail: LogDetail::All,
            predicate: Some(Arc::new(|code| code >= 400)),
        }
    }

    pub fn detail(&self) -> LogDetail {
        self.detail
    }

    pub fn should_log(&self, status: u16) -> bool {
        self.predicate.as_ref().is_none_or(|predicate| predicate(status))
    }
}

impl Default for ResponseLoggingFilter {
    fn default() -> Self {
        Self {
            detail: LogDetail::All,
            predicate: None,
        }
    }
}

impl fmt::Debug for ResponseLoggingFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseLoggingFilter")
            .field("detail", &self.detail)
            .field("status_based", &self.predicate.is_some())
            .finish()
    }
}

impl Filter for ResponseLoggingFilter {
    fn apply(
        &self,
        request: &mut FilterableRequest,
        response_spec: &ResponseSpec,
        ctx: &mut FilterContext<'_>,
    ) -> Result<Response> {
        let response = ctx.proceed(request, response_spec)?;
        if self.should_log(response.status_code()) {
            tracing::info!(target: LOG_TARGET, "\n{}", render_response(&response, self.detail));
        }
        Ok(response)
    }

    fn name(&self) -> &str {
        "response-logging-filter"
    }
}
