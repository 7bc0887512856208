use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::validate;

pub const DEFAULT_URL: &str = "https://www.ncdc.noaa.gov/cdo-web/api/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

const RC_FILE: &str = ".noaacdorc";

/// Everything a [`crate::Client`] needs; built once and owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base CDO API URL, typically `https://www.ncdc.noaa.gov/cdo-web/api/v2`.
    pub url: String,
    /// Access token, sent in the `token` header of every request.
    pub token: String,
    /// Per-request timeout covering connect, send and body read.
    pub timeout: Duration,
    /// Whether to verify TLS certificates.
    pub verify: bool,
}

impl ClientConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            verify: true,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Loads configuration from environment variables and/or `.noaacdorc`.
    ///
    /// This is equivalent to `ClientConfig::load(None, None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::load(None, None, None)
    }

    /// Resolves configuration using (in order of precedence):
    /// - explicit `url`/`token`/`verify` arguments
    /// - environment variables `NOAA_CDO_URL` / `NOAA_CDO_TOKEN`
    /// - config file from `NOAA_CDO_RC`, `./.noaacdorc` or `~/.noaacdorc`
    pub fn load(url: Option<String>, token: Option<String>, verify: Option<bool>) -> Result<Self> {
        let url = url.or_else(|| std::env::var("NOAA_CDO_URL").ok());
        let token = token.or_else(|| std::env::var("NOAA_CDO_TOKEN").ok());
        resolve(url, token, verify, &rc_candidates())
    }
}

#[derive(Debug, Default)]
struct RcConfig {
    url: Option<String>,
    token: Option<String>,
    verify: Option<bool>,
    timeout: Option<Duration>,
}

fn resolve(
    mut url: Option<String>,
    mut token: Option<String>,
    verify: Option<bool>,
    rc_candidates: &[PathBuf],
) -> Result<ClientConfig> {
    let mut file_verify = None;
    let mut file_timeout = None;

    if let Some(rc_path) = rc_candidates.iter().find(|p| p.exists()) {
        log::debug!("reading CDO configuration from {}", rc_path.display());
        let cfg = read_rc(rc_path)?;
        if url.is_none() {
            url = cfg.url;
        }
        if token.is_none() {
            token = cfg.token;
        }
        file_verify = cfg.verify;
        file_timeout = cfg.timeout;
    }

    let token = token.ok_or_else(|| ConfigError::MissingToken {
        searched: rc_candidates.to_vec(),
    })?;
    validate::token(&token)?;

    Ok(ClientConfig {
        url: url.unwrap_or_else(|| DEFAULT_URL.to_string()),
        token,
        timeout: file_timeout.unwrap_or(DEFAULT_TIMEOUT),
        verify: verify.or(file_verify).unwrap_or(true),
    })
}

fn read_rc(path: &Path) -> Result<RcConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadRc {
        path: path.to_path_buf(),
        source,
    })?;
    parse_rc(&text)
}

fn parse_rc(text: &str) -> Result<RcConfig, ConfigError> {
    let mut cfg = RcConfig::default();

    // `token:` may sit alone on one line with the value on the next.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !line.contains(':') || (pk == "url" && line.contains("://")) {
                set_rc_value(&mut cfg, pk, strip_quotes(line))?;
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                pending_key = Some(k);
            } else {
                set_rc_value(&mut cfg, k, v)?;
            }
        }
    }

    Ok(cfg)
}

fn set_rc_value(cfg: &mut RcConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "url" => cfg.url = Some(value.to_string()),
        // alias
        "token" | "key" => cfg.token = Some(value.to_string()),
        "verify" => {
            cfg.verify = Some(match value {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "verify",
                        value: value.to_string(),
                    });
                }
            })
        }
        "timeout" => {
            let secs = value
                .parse::<f64>()
                .ok()
                .filter(|s| s.is_finite() && *s > 0.0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "timeout",
                    value: value.to_string(),
                })?;
            cfg.timeout = Some(Duration::from_secs_f64(secs));
        }
        _ => {}
    }
    Ok(())
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    ['"', '\'']
        .into_iter()
        .find_map(|q| s.strip_prefix(q)?.strip_suffix(q))
        .unwrap_or(s)
}

/// `NOAA_CDO_RC` wins outright; otherwise the working directory, then home.
fn rc_candidates() -> Vec<PathBuf> {
    if let Some(path) = std::env::var_os("NOAA_CDO_RC") {
        return vec![PathBuf::from(path)];
    }
    [std::env::current_dir().ok(), dirs::home_dir()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(RC_FILE))
        .collect()
}
