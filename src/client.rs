use std::fmt;
use std::time::Duration;

use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::{Value, json};

use crate::config::ClientConfig;
use crate::error::{ConfigError, Error, Result, ValidationError, remote_message};
use crate::query::Query;
use crate::validate;

/// Header CDO reads the access token from.
const TOKEN_HEADER: &str = "token";

/// A configured CDO client.
///
/// Holds only immutable configuration, so one instance can be shared across threads
/// and reused for any number of calls. Each call is a single blocking GET with no
/// retries; see [`Error::is_service`] for deciding what to retry.
#[derive(Clone)]
pub struct Client {
    url: String,
    token: String,
    timeout: Duration,

    http: HttpClient,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Client {
    /// Creates a client using environment variables and/or `.noaacdorc`.
    ///
    /// See [`ClientConfig::load`] for the lookup order.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Creates a client for the public CDO endpoint with default settings.
    pub fn with_token(token: impl Into<String>) -> Result<Self> {
        Self::new(ClientConfig::new(token))
    }

    pub fn new(config: ClientConfig) -> Result<Self> {
        validate::token(&config.token)?;
        reqwest::Url::parse(&config.url).map_err(|e| {
            ValidationError::new("url", format!("{:?} is not a valid URL: {e}", config.url))
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("noaa-cdo-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("noaa-cdo-rs")),
        );

        let mut builder = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(config.timeout);

        if !config.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self {
            url: config.url,
            token: config.token,
            timeout: config.timeout,
            http,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn apply_auth(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(TOKEN_HEADER, self.token.as_str())
    }

    /// Issues one GET for `query`, optionally scoped to a single resource `id`.
    pub(crate) fn get(&self, query: &Query, id: Option<&str>) -> Result<Value> {
        let endpoint = query.endpoint();
        if id.is_some() && !endpoint.has_lookup() {
            return Err(ValidationError::new(
                "id",
                format!("the {endpoint} endpoint has no single-resource lookup"),
            )
            .into());
        }

        let url = endpoint.url(&self.url, id)?;
        let request = self
            .apply_auth(self.http.get(url))
            .query(query.pairs())
            .timeout(self.timeout)
            .build()
            .map_err(|e| ValidationError::new("request", e.to_string()))?;
        let url = request.url().to_string();

        debug!("GET {url}");
        let resp = self
            .http
            .execute(request)
            .map_err(|e| transport_error(&url, e))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| transport_error(&url, e))?;
        debug!("HTTP {status} ({} bytes) from {url}", text.len());

        decode_response(status, &url, &text)
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> Error {
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "could not connect".to_string()
    } else {
        e.to_string()
    };
    warn!("CDO request to {url} failed: {message}");
    Error::Service {
        status: None,
        message,
        url: url.to_string(),
        source: Some(e),
    }
}

/// Maps a completed round trip onto the decoded body or one typed error.
pub(crate) fn decode_response(status: StatusCode, url: &str, text: &str) -> Result<Value> {
    if status.is_client_error() {
        let message = remote_message(status, text);
        warn!("CDO rejected {url}: HTTP {status}: {message}");
        return Err(Error::Client {
            status: status.as_u16(),
            message,
            url: url.to_string(),
        });
    }

    if !status.is_success() {
        let message = remote_message(status, text);
        warn!("CDO failed for {url}: HTTP {status}: {message}");
        return Err(Error::Service {
            status: Some(status.as_u16()),
            message,
            url: url.to_string(),
            source: None,
        });
    }

    // Zero matching records comes back as an empty body.
    if text.trim().is_empty() {
        return Ok(json!({ "results": [] }));
    }

    serde_json::from_str::<Value>(text).map_err(|e| Error::Response {
        url: url.to_string(),
        message: format!("body is not valid JSON (HTTP {status})"),
        source: Some(e),
    })
}
