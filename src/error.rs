//! Error types for the onboarding client.

use crate::onboarding::state::SessionState;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Onboarding error: {0}")]
    Onboarding(#[from] OnboardingError),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised by the onboarding session and its two network calls.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("Activation link has no token")]
    MissingToken,

    #[error("Token verification rejected with status {status}")]
    VerificationRejected { status: u16 },

    #[error("Token verification could not reach the backend: {reason}")]
    VerificationUnreachable { reason: String },

    #[error("Onboarding link has expired")]
    VerificationExpired,

    #[error("{} missing", missing.join(", "))]
    ValidationIncomplete { missing: Vec<String> },

    #[error("Submission rejected with status {status}")]
    SubmissionRejected { status: u16 },

    #[error("Submission could not reach the backend: {reason}")]
    SubmissionUnreachable { reason: String },

    #[error("Session is {state}; details can no longer be changed")]
    NotEditable { state: SessionState },

    #[error("Session is {state}; cannot submit from this state")]
    NotSubmittable { state: SessionState },

    #[error("Session has already been activated")]
    AlreadyActivated,

    #[error("Session cannot move from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },

    #[error("A submission is already in progress")]
    SubmissionInFlight,

    #[error("Passing year {value:?} is not a number")]
    InvalidPassingYear { value: String },
}

/// Document attachment errors.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("File size exceeds 1MB! {name} is {size} bytes (limit {limit}). Please upload a smaller file.")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("Unknown document slot: {0}")]
    UnknownSlot(String),

    #[error("Failed to read document {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to encode a submission payload into a request body.
#[derive(Debug, thiserror::Error)]
pub enum PayloadEncodeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid multipart part: {0}")]
    Part(#[from] reqwest::Error),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
