// src/core/net.rs
// Blocking HTTP GET behind a small trait so the engine can run against canned pages.

use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::{EngineOptions, consts::HISCORE_ROOT};
use crate::error::EngineError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failure, before any status line was seen.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    TimedOut,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("{0}")]
    Other(String),
}

/// One GET, one response. Implementations must be shareable across worker threads.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(opts: &EngineOptions) -> Result<Self, EngineError> {
        Self::with_timeout(opts.request_timeout(), &opts.user_agent)
    }

    pub fn with_timeout(timeout: Duration, user_agent: &str) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        log::debug!("GET {url}");
        let resp = self.client.get(url).send().map_err(classify)?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::TimedOut
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

/// Fill `{key}` placeholders. `{root}` always resolves to the hiscores host.
pub fn fill(tmpl: &str, vars: &[(&str, &str)]) -> String {
    let mut out = tmpl.replace("{root}", HISCORE_ROOT);
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// Percent-encode a display name for a query string.
pub fn encode_name(name: &str) -> String {
    urlencoding::encode(name.trim()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_replaces_all_keys() {
        let url = fill("{root}{table}/x?p={page}", &[("table", "hiscore"), ("page", "3")]);
        assert_eq!(url, "https://secure.runescape.com/m=hiscore/x?p=3");
    }

    #[test]
    fn names_are_percent_encoded() {
        assert_eq!(encode_name(" Iron Man "), "Iron%20Man");
        assert_eq!(encode_name("a&b"), "a%26b");
    }

    #[test]
    fn success_range() {
        assert!(HttpResponse::ok("").is_success());
        assert!(!HttpResponse { status: 404, body: s!() }.is_success());
    }
}
