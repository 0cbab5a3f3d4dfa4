//! SessionController: gates the form behind token verification and drives
//! the one-shot submission.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{DocumentError, Error, OnboardingError};

use super::backend::OnboardingBackend;
use super::documents::{DocumentFile, DocumentSlot};
use super::model::FormField;
use super::session::{OnboardingSession, SessionCommand};
use super::state::SessionState;
use super::token::OnboardingToken;
use super::view::SessionStatus;

/// Owns one onboarding session and the backend it talks to.
///
/// Cheap to share behind an `Arc`. The session lock is never held across a
/// backend call, and the `Ready → Submitting` check-and-set happens under a
/// single write lock, so concurrent submit actions yield exactly one
/// network transaction.
pub struct SessionController {
    backend: Arc<dyn OnboardingBackend>,
    session: Arc<RwLock<OnboardingSession>>,
}

impl SessionController {
    pub fn new(backend: Arc<dyn OnboardingBackend>) -> Self {
        Self {
            backend,
            session: Arc::new(RwLock::new(OnboardingSession::new())),
        }
    }

    pub async fn state(&self) -> SessionState {
        self.session.read().await.state()
    }

    pub async fn session_id(&self) -> Uuid {
        self.session.read().await.id()
    }

    /// Snapshot of the session for rendering.
    pub async fn status(&self) -> SessionStatus {
        SessionStatus::from_session(&*self.session.read().await)
    }

    /// Activate from a link carrying a `token` query parameter.
    ///
    /// A link without a token resolves to `Invalid` without any network
    /// call. `Ok(())` means the session is `Ready`; every error leaves the
    /// session in `Invalid` or `Expired`, except `AlreadyActivated`, which
    /// leaves it untouched.
    pub async fn activate(&self, activation_link: &str) -> Result<(), OnboardingError> {
        self.activate_with(OnboardingToken::from_activation_url(activation_link))
            .await
    }

    /// Activate with an already-extracted token.
    pub async fn activate_with(&self, token: Option<OnboardingToken>) -> Result<(), OnboardingError> {
        let (session_id, token) = {
            let mut session = self.session.write().await;
            session.begin_verification(token)?;
            let session_id = session.id();
            match session.token().cloned() {
                Some(token) => (session_id, token),
                None => {
                    session.reject_missing_token()?;
                    tracing::warn!(%session_id, "Activation link has no token");
                    return Err(OnboardingError::MissingToken);
                }
            }
        };

        tracing::info!(%session_id, "Verifying onboarding link");
        let outcome = self.backend.verify(&token).await;
        let state = self.session.write().await.resolve_verification(&outcome)?;
        tracing::info!(%session_id, %state, "Verification resolved");
        outcome.into_result()
    }

    /// Apply a user edit to the session.
    pub async fn apply(&self, command: SessionCommand) -> Result<SessionState, Error> {
        self.session.write().await.apply(command)
    }

    pub async fn update_field(&self, field: FormField, value: impl Into<String>) -> Result<SessionState, Error> {
        self.apply(SessionCommand::UpdateField {
            field,
            value: value.into(),
        })
        .await
    }

    pub async fn set_graduated(&self, graduated: bool) -> Result<SessionState, Error> {
        self.apply(SessionCommand::SetGraduated(graduated)).await
    }

    pub async fn bind_document(&self, slot: DocumentSlot, file: DocumentFile) -> Result<SessionState, Error> {
        self.apply(SessionCommand::BindDocument { slot, file }).await
    }

    pub async fn clear_document(&self, slot: DocumentSlot) -> Result<SessionState, Error> {
        self.apply(SessionCommand::ClearDocument(slot)).await
    }

    /// Read a file from disk into a slot. An oversized file empties the
    /// slot and is never read.
    pub async fn attach_path(&self, slot: DocumentSlot, path: &Path) -> Result<SessionState, Error> {
        match DocumentFile::from_path(path).await {
            Ok(file) => self.bind_document(slot, file).await,
            Err(e @ DocumentError::TooLarge { .. }) => {
                self.clear_document(slot).await?;
                tracing::warn!(slot = %slot, error = %e, "Refused oversized document");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Validate, build a fresh payload and send it.
    ///
    /// Local validation failures leave the state unchanged. A submit while
    /// one is already in flight returns `SubmissionInFlight` and sends
    /// nothing. Backend failures move the session to `Failed`, from which
    /// `submit` may be called again.
    pub async fn submit(&self) -> Result<(), OnboardingError> {
        let (session_id, attempt, payload) = {
            let mut session = self.session.write().await;
            let payload = match session.begin_submission() {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::info!(session_id = %session.id(), error = %e, "Submit refused");
                    return Err(e);
                }
            };
            (session.id(), session.submit_attempts(), payload)
        };

        tracing::info!(%session_id, attempt, files = payload.files().len(), "Submitting onboarding package");
        let outcome = self.backend.submit(payload).await;

        let state = self.session.write().await.finish_submission(&outcome)?;
        match state {
            SessionState::Submitted => tracing::info!(%session_id, attempt, "Submission accepted"),
            _ => tracing::warn!(%session_id, attempt, ?outcome, "Submission failed"),
        }
        outcome.into_result()
    }
}
