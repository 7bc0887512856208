use std::fmt;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Root error type: every failing call returns exactly one of these variants.
#[derive(Debug, Error)]
pub enum Error {
    /// Caller input was rejected before any network I/O.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// CDO rejected the request (HTTP 4xx).
    #[error("CDO rejected the request (HTTP {status}) for url ({url}): {message}")]
    Client {
        status: u16,
        message: String,
        url: String,
    },

    /// CDO failed server-side (HTTP 5xx) or the transport failed before a response arrived.
    #[error("CDO service failure{} for url ({url}): {message}", http_suffix(.status))]
    Service {
        status: Option<u16>,
        message: String,
        url: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// A 2xx response whose body is not JSON.
    #[error("malformed CDO response for url ({url}): {message}")]
    Response {
        url: String,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    /// HTTP status attached to the failure, if the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Client { status, .. } => Some(*status),
            Error::Service { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Error::Client { .. })
    }

    /// True for 5xx responses and transport failures, the conditions a caller may retry.
    pub fn is_service(&self) -> bool {
        matches!(self, Error::Service { .. })
    }

    pub fn is_response(&self) -> bool {
        matches!(self, Error::Response { .. })
    }
}

/// An input parameter that violates a documented constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    param: String,
    message: String,
}

impl ValidationError {
    pub fn new(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Name of the offending parameter, as the caller spelled it.
    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.param, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: token (set NOAA_CDO_TOKEN or put `token:` in one of: {})", display_paths(.searched))]
    MissingToken { searched: Vec<PathBuf> },

    #[error("failed to read configuration file {}", .path.display())]
    ReadRc {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value for `{key}`: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}

fn http_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(no candidate files)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error payload CDO sends with 4xx/5xx responses.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CdoErrorResponse {
    #[serde(default)]
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) developer_message: Option<String>,
    #[serde(default)]
    pub(crate) user_message: Option<String>,
}

/// Pulls a readable message out of an error response body.
pub(crate) fn remote_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<CdoErrorResponse>(body).unwrap_or_default();
    let message = parsed
        .message
        .as_deref()
        .or(parsed.user_message.as_deref())
        .or(parsed.developer_message.as_deref())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            let text = body.trim();
            if text.is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no message")
                    .to_string()
            } else {
                text.to_string()
            }
        });

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return format!(
            "{message} (check that the token is valid; request one at https://www.ncdc.noaa.gov/cdo-web/token)"
        );
    }
    message
}
