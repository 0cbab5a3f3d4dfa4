//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Url;

use crate::error::ConfigError;

/// Default backend base URL.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

const VIEW_PATH: &str = "api/offer/view";
const SUBMIT_PATH: &str = "api/offer/submit-onboarding";

/// Client configuration for the onboarding portal.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Backend base address; both endpoints hang off it.
    pub api_base_url: Url,
    /// Per-request timeout. `None` means requests may wait indefinitely.
    pub request_timeout: Option<Duration>,
    /// Directory for rolling log files. Logs go to stderr when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base URL is valid"),
            request_timeout: None,
            log_dir: None,
        }
    }
}

impl PortalConfig {
    /// Load configuration from `ONBOARDING_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base = std::env::var("ONBOARDING_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        let request_timeout = match std::env::var("ONBOARDING_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: "ONBOARDING_REQUEST_TIMEOUT_SECS".into(),
                    message: format!("expected whole seconds, got {raw:?}"),
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        let log_dir = std::env::var("ONBOARDING_LOG_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_base_url: parse_base_url(&base)?,
            request_timeout,
            log_dir,
        })
    }

    /// Override the base URL.
    pub fn with_base_url(mut self, base: &str) -> Result<Self, ConfigError> {
        self.api_base_url = parse_base_url(base)?;
        Ok(self)
    }

    /// Verification endpoint (`GET`, token as query parameter).
    pub fn view_url(&self) -> Url {
        self.endpoint(VIEW_PATH)
    }

    /// Submission endpoint (`POST`, multipart body).
    pub fn submit_url(&self) -> Url {
        self.endpoint(SUBMIT_PATH)
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.api_base_url.clone();
        let joined = format!("{}/{path}", url.path().trim_end_matches('/'));
        url.set_path(&joined);
        url
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidValue {
        key: "ONBOARDING_API_BASE_URL".into(),
        message: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            key: "ONBOARDING_API_BASE_URL".into(),
            message: format!("unsupported scheme {:?}", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_points_at_localhost() {
        let config = PortalConfig::default();
        assert_eq!(config.view_url().as_str(), "http://localhost:8080/api/offer/view");
        assert_eq!(
            config.submit_url().as_str(),
            "http://localhost:8080/api/offer/submit-onboarding"
        );
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn endpoints_tolerate_trailing_slash_and_prefix() {
        let config = PortalConfig::default()
            .with_base_url("https://hr.example.com/portal/")
            .unwrap();
        assert_eq!(
            config.view_url().as_str(),
            "https://hr.example.com/portal/api/offer/view"
        );

        let config = PortalConfig::default()
            .with_base_url("http://192.168.0.111:8080")
            .unwrap();
        assert_eq!(
            config.submit_url().as_str(),
            "http://192.168.0.111:8080/api/offer/submit-onboarding"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            PortalConfig::default().with_base_url("not a url"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            PortalConfig::default().with_base_url("ftp://files.example.com"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
