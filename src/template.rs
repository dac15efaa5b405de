//! The fixed request every virtual user sends.
//!
//! A [`RequestTemplate`] is built once at startup and then shared read-only
//! (behind an `Arc`) by every iteration. Nothing in it changes after
//! [`RequestTemplateBuilder::build`] returns.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Method, Url};
use std::time::Duration;

use crate::error::LoadError;

pub const DEFAULT_TARGET_URL: &str = "http://localhost:3000/node";

/// Pause taken after every request.
pub const DEFAULT_THINK_TIME: Duration = Duration::from_secs(1);

/// Header set sent with every request, ahead of the `Authorization` header.
///
/// `Accept` is `/*/`, not the `*/*` wildcard. It is sent exactly as given;
/// override it through configuration if the endpoint rejects it.
pub const DEFAULT_HEADERS: [(&str, &str); 6] = [
    ("Content-Type", "application/json"),
    ("Accept", "/*/"),
    ("Accept-Encoding", "gzip, deflate, br"),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Cache-Control", "no-cache"),
    ("Connection", "keep-alive"),
];

#[derive(Debug, Clone)]
pub struct RequestTemplate {
    url: Url,
    method: Method,
    headers: HeaderMap,
    think_time: Duration,
}

impl RequestTemplate {
    pub fn builder(url: impl Into<String>) -> RequestTemplateBuilder {
        RequestTemplateBuilder::new(url)
    }

    /// Template with the default headers, the default think time and the
    /// given bearer token.
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self, LoadError> {
        Self::builder(url).bearer(token).build()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn think_time(&self) -> Duration {
        self.think_time
    }
}

#[derive(Debug, Clone)]
pub struct RequestTemplateBuilder {
    url: String,
    overrides: Vec<(String, String)>,
    bearer: Option<String>,
    think_time: Duration,
}

impl RequestTemplateBuilder {
    fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            overrides: Vec::new(),
            bearer: None,
            think_time: DEFAULT_THINK_TIME,
        }
    }

    /// Adds a header, replacing a default of the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.overrides.push((name.into(), value.into()));
        self
    }

    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn think_time(mut self, think_time: Duration) -> Self {
        self.think_time = think_time;
        self
    }

    pub fn build(self) -> Result<RequestTemplate, LoadError> {
        let url = Url::parse(&self.url)
            .map_err(|e| LoadError::InvalidUrl(format!("{}: {e}", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LoadError::InvalidUrl(format!(
                "{}: unsupported scheme {}",
                self.url,
                url.scheme()
            )));
        }

        let mut headers = HeaderMap::new();
        let defaults = DEFAULT_HEADERS.iter().map(|(n, v)| (*n, *v));
        let overrides = self.overrides.iter().map(|(n, v)| (n.as_str(), v.as_str()));
        for (name, value) in defaults.chain(overrides) {
            let (name, value) = parse_header(name, value)?;
            headers.insert(name, value);
        }

        let token = self
            .bearer
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(LoadError::MissingCredential)?;
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            LoadError::InvalidHeaderValue {
                name: AUTHORIZATION.to_string(),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        Ok(RequestTemplate {
            url,
            method: Method::GET,
            headers,
            think_time: self.think_time,
        })
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), LoadError> {
    let header_name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| LoadError::InvalidHeaderName(name.to_string()))?;
    let header_value = HeaderValue::from_str(value).map_err(|_| LoadError::InvalidHeaderValue {
        name: name.to_string(),
    })?;
    Ok((header_name, header_value))
}
