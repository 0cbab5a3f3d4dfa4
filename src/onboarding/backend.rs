//! Backend seam: token verification and submission over HTTP.

use async_trait::async_trait;
use reqwest::Url;

use crate::config::PortalConfig;
use crate::error::{ConfigError, OnboardingError};

use super::payload::SubmissionPayload;
use super::token::{OnboardingToken, TOKEN_PARAM};

/// Result of a verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    Valid,
    /// Non-success HTTP status.
    Rejected { status: u16 },
    /// The call did not complete.
    Unreachable { reason: String },
    /// The backend flagged the link as expired.
    ///
    /// `HttpBackend` never reports this: the view endpoint has no agreed
    /// expiry signal yet, so no status code is treated as one.
    Expired,
}

impl VerifyOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn into_result(self) -> Result<(), OnboardingError> {
        match self {
            Self::Valid => Ok(()),
            Self::Rejected { status } => Err(OnboardingError::VerificationRejected { status }),
            Self::Unreachable { reason } => {
                Err(OnboardingError::VerificationUnreachable { reason })
            }
            Self::Expired => Err(OnboardingError::VerificationExpired),
        }
    }
}

/// Result of a submission call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected { status: u16 },
    Unreachable { reason: String },
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub fn into_result(self) -> Result<(), OnboardingError> {
        match self {
            Self::Accepted => Ok(()),
            Self::Rejected { status } => Err(OnboardingError::SubmissionRejected { status }),
            Self::Unreachable { reason } => Err(OnboardingError::SubmissionUnreachable { reason }),
        }
    }
}

/// The two backend operations the session depends on.
///
/// Implementations never fail past this boundary: every failure is folded
/// into the returned outcome. Neither call is retried.
#[async_trait]
pub trait OnboardingBackend: Send + Sync {
    /// Check whether a token grants access to the form.
    async fn verify(&self, token: &OnboardingToken) -> VerifyOutcome;

    /// Send one submission. Exactly one network transaction.
    async fn submit(&self, payload: SubmissionPayload) -> SubmitOutcome;
}

/// reqwest-backed implementation talking to the configured base URL.
pub struct HttpBackend {
    client: reqwest::Client,
    view_url: Url,
    submit_url: Url,
}

impl HttpBackend {
    pub fn new(config: &PortalConfig) -> Result<Self, ConfigError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ConfigError::InvalidValue {
            key: "http_client".into(),
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            view_url: config.view_url(),
            submit_url: config.submit_url(),
        })
    }
}

#[async_trait]
impl OnboardingBackend for HttpBackend {
    async fn verify(&self, token: &OnboardingToken) -> VerifyOutcome {
        let response = self
            .client
            .get(self.view_url.clone())
            .query(&[(TOKEN_PARAM, token.expose())])
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => VerifyOutcome::Valid,
            Ok(resp) => {
                let status = resp.status();
                tracing::warn!(status = status.as_u16(), "Token verification failed");
                VerifyOutcome::Rejected {
                    status: status.as_u16(),
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error connecting to backend");
                VerifyOutcome::Unreachable {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn submit(&self, payload: SubmissionPayload) -> SubmitOutcome {
        let total_bytes = payload.total_bytes();
        let form = match payload.into_form() {
            Ok(form) => form,
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode submission");
                return SubmitOutcome::Unreachable {
                    reason: format!("request could not be built: {e}"),
                };
            }
        };

        tracing::info!(bytes = total_bytes, "Uploading onboarding submission");
        let response = self
            .client
            .post(self.submit_url.clone())
            .multipart(form)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => SubmitOutcome::Accepted,
            Ok(resp) => {
                let status = resp.status().as_u16();
                let body = resp.text().await.unwrap_or_default();
                tracing::warn!(status, body = %body.chars().take(200).collect::<String>(), "Submission rejected");
                SubmitOutcome::Rejected { status }
            }
            Err(e) => {
                tracing::error!(error = %e, "Error submitting form");
                SubmitOutcome::Unreachable {
                    reason: e.to_string(),
                }
            }
        }
    }
}
