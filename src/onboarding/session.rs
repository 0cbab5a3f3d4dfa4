//! The onboarding session aggregate and the commands applied to it.

use uuid::Uuid;

use crate::error::{Error, OnboardingError};

use super::backend::{SubmitOutcome, VerifyOutcome};
use super::documents::{DocumentFile, DocumentSlot, DocumentSlotSet};
use super::model::{FormField, OnboardingForm};
use super::payload::SubmissionPayload;
use super::state::SessionState;
use super::token::OnboardingToken;

/// A discrete user edit applied to the session.
#[derive(Debug)]
pub enum SessionCommand {
    UpdateField { field: FormField, value: String },
    SetGraduated(bool),
    BindDocument { slot: DocumentSlot, file: DocumentFile },
    ClearDocument(DocumentSlot),
}

/// Everything one onboarding session owns: token, form, documents, and the
/// current state.
#[derive(Debug)]
pub struct OnboardingSession {
    id: Uuid,
    token: Option<OnboardingToken>,
    state: SessionState,
    form: OnboardingForm,
    documents: DocumentSlotSet,
    verification_started: bool,
    last_submit: Option<SubmitOutcome>,
    submit_attempts: u32,
}

impl Default for OnboardingSession {
    fn default() -> Self {
        Self::new()
    }
}

impl OnboardingSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            token: None,
            state: SessionState::default(),
            form: OnboardingForm::default(),
            documents: DocumentSlotSet::new(),
            verification_started: false,
            last_submit: None,
            submit_attempts: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn token(&self) -> Option<&OnboardingToken> {
        self.token.as_ref()
    }

    pub fn form(&self) -> &OnboardingForm {
        &self.form
    }

    pub fn documents(&self) -> &DocumentSlotSet {
        &self.documents
    }

    /// Outcome of the most recent submission attempt, if any.
    pub fn last_submit(&self) -> Option<&SubmitOutcome> {
        self.last_submit.as_ref()
    }

    pub fn submit_attempts(&self) -> u32 {
        self.submit_attempts
    }

    /// Apply a user edit. Returns the (unchanged) state on success.
    ///
    /// Edits are only accepted while `Ready` or `Failed`. An oversized
    /// document still empties its slot before the error is returned.
    pub fn apply(&mut self, command: SessionCommand) -> Result<SessionState, Error> {
        if !self.state.is_editable() {
            return Err(OnboardingError::NotEditable { state: self.state }.into());
        }
        match command {
            SessionCommand::UpdateField { field, value } => {
                self.form.update_field(field, &value);
            }
            SessionCommand::SetGraduated(graduated) => self.form.set_graduated(graduated),
            SessionCommand::BindDocument { slot, file } => self.documents.bind(slot, file)?,
            SessionCommand::ClearDocument(slot) => self.documents.clear(slot),
        }
        Ok(self.state)
    }

    /// Record the start of verification. Only one verification per session.
    pub(crate) fn begin_verification(
        &mut self,
        token: Option<OnboardingToken>,
    ) -> Result<(), OnboardingError> {
        if self.verification_started {
            return Err(OnboardingError::AlreadyActivated);
        }
        self.verification_started = true;
        self.token = token;
        Ok(())
    }

    /// Resolve `Verifying` from a verification outcome.
    pub(crate) fn resolve_verification(
        &mut self,
        outcome: &VerifyOutcome,
    ) -> Result<SessionState, OnboardingError> {
        let target = match outcome {
            VerifyOutcome::Valid => SessionState::Ready,
            VerifyOutcome::Expired => SessionState::Expired,
            VerifyOutcome::Rejected { .. } | VerifyOutcome::Unreachable { .. } => {
                SessionState::Invalid
            }
        };
        self.transition(target)?;
        Ok(target)
    }

    /// Resolve `Verifying` to `Invalid` when there is no token to verify.
    pub(crate) fn reject_missing_token(&mut self) -> Result<SessionState, OnboardingError> {
        self.transition(SessionState::Invalid)?;
        Ok(SessionState::Invalid)
    }

    /// Validate and snapshot the session into a payload, moving to
    /// `Submitting`. Refused while a submission is in flight, and left in
    /// the current state when validation fails.
    pub(crate) fn begin_submission(&mut self) -> Result<SubmissionPayload, OnboardingError> {
        if self.state == SessionState::Submitting {
            return Err(OnboardingError::SubmissionInFlight);
        }
        if !self.state.can_submit() {
            return Err(OnboardingError::NotSubmittable { state: self.state });
        }
        let token = self.token.as_ref().ok_or(OnboardingError::MissingToken)?;
        let payload = SubmissionPayload::build(token, &self.form, &self.documents)?;
        self.transition(SessionState::Submitting)?;
        self.submit_attempts += 1;
        Ok(payload)
    }

    /// Resolve `Submitting` from a submission outcome.
    pub(crate) fn finish_submission(
        &mut self,
        outcome: &SubmitOutcome,
    ) -> Result<SessionState, OnboardingError> {
        let target = if outcome.is_accepted() {
            SessionState::Submitted
        } else {
            SessionState::Failed
        };
        self.transition(target)?;
        self.last_submit = Some(outcome.clone());
        Ok(target)
    }

    fn transition(&mut self, target: SessionState) -> Result<(), OnboardingError> {
        if !self.state.can_transition_to(target) {
            return Err(OnboardingError::InvalidTransition {
                from: self.state,
                to: target,
            });
        }
        tracing::debug!(session_id = %self.id, from = %self.state, to = %target, "Session transition");
        self.state = target;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DocumentError;
    use crate::onboarding::documents::MAX_DOCUMENT_BYTES;

    fn ready_session() -> OnboardingSession {
        let mut session = OnboardingSession::new();
        session
            .begin_verification(OnboardingToken::new("abc123"))
            .unwrap();
        session.resolve_verification(&VerifyOutcome::Valid).unwrap();
        session
    }

    fn fill(session: &mut OnboardingSession) {
        let values = [
            (FormField::FullName, "Asha Rao"),
            (FormField::DateOfBirth, "1999-04-12"),
            (FormField::Phone, "9876543210"),
            (FormField::Address, "12 MG Road"),
            (FormField::CollegeName, "JNTU"),
            (FormField::PassingYear, "2021"),
        ];
        for (field, value) in values {
            session
                .apply(SessionCommand::UpdateField {
                    field,
                    value: value.to_string(),
                })
                .unwrap();
        }
        for slot in DocumentSlot::ALL {
            session
                .apply(SessionCommand::BindDocument {
                    slot,
                    file: DocumentFile::new(format!("{slot}.pdf"), b"pdf".to_vec()),
                })
                .unwrap();
        }
    }

    #[test]
    fn new_session_is_verifying_and_not_editable() {
        let mut session = OnboardingSession::new();
        assert_eq!(session.state(), SessionState::Verifying);
        let err = session
            .apply(SessionCommand::SetGraduated(false))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Onboarding(OnboardingError::NotEditable {
                state: SessionState::Verifying
            })
        ));
    }

    #[test]
    fn verification_outcomes_resolve_state() {
        let cases = [
            (VerifyOutcome::Valid, SessionState::Ready),
            (VerifyOutcome::Rejected { status: 404 }, SessionState::Invalid),
            (
                VerifyOutcome::Unreachable {
                    reason: "refused".into(),
                },
                SessionState::Invalid,
            ),
            (VerifyOutcome::Expired, SessionState::Expired),
        ];
        for (outcome, expected) in cases {
            let mut session = OnboardingSession::new();
            session
                .begin_verification(OnboardingToken::new("t"))
                .unwrap();
            assert_eq!(session.resolve_verification(&outcome).unwrap(), expected);
        }
    }

    #[test]
    fn verification_starts_only_once() {
        let mut session = OnboardingSession::new();
        session.begin_verification(None).unwrap();
        assert!(matches!(
            session.begin_verification(OnboardingToken::new("t")),
            Err(OnboardingError::AlreadyActivated)
        ));
    }

    #[test]
    fn oversized_document_empties_slot_through_command() {
        let mut session = ready_session();
        session
            .apply(SessionCommand::BindDocument {
                slot: DocumentSlot::Photo,
                file: DocumentFile::new("me.jpg", b"jpg".to_vec()),
            })
            .unwrap();
        let err = session
            .apply(SessionCommand::BindDocument {
                slot: DocumentSlot::Photo,
                file: DocumentFile::new("me.png", vec![0; MAX_DOCUMENT_BYTES as usize + 1]),
            })
            .unwrap_err();
        assert!(matches!(err, Error::Document(DocumentError::TooLarge { .. })));
        assert!(!session.documents().is_bound(DocumentSlot::Photo));
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[test]
    fn incomplete_submission_stays_ready() {
        let mut session = ready_session();
        let err = session.begin_submission().unwrap_err();
        assert!(matches!(err, OnboardingError::ValidationIncomplete { .. }));
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.submit_attempts(), 0);
    }

    #[test]
    fn submission_lifecycle_and_retry() {
        let mut session = ready_session();
        fill(&mut session);

        session.begin_submission().unwrap();
        assert_eq!(session.state(), SessionState::Submitting);
        assert!(matches!(
            session.begin_submission(),
            Err(OnboardingError::SubmissionInFlight)
        ));
        assert!(session.apply(SessionCommand::SetGraduated(false)).is_err());

        let failed = SubmitOutcome::Rejected { status: 500 };
        assert_eq!(session.finish_submission(&failed).unwrap(), SessionState::Failed);
        assert_eq!(session.last_submit(), Some(&failed));
        assert_eq!(session.form().personal.full_name, "Asha Rao");
        assert!(session.documents().validate().is_ok());

        // Failed is editable and retryable with the same state.
        session.apply(SessionCommand::SetGraduated(false)).unwrap();
        session.begin_submission().unwrap();
        assert_eq!(session.submit_attempts(), 2);
        assert_eq!(
            session.finish_submission(&SubmitOutcome::Accepted).unwrap(),
            SessionState::Submitted
        );
    }

    #[test]
    fn submitted_session_is_frozen() {
        let mut session = ready_session();
        fill(&mut session);
        session.begin_submission().unwrap();
        session.finish_submission(&SubmitOutcome::Accepted).unwrap();

        for command in [
            SessionCommand::SetGraduated(false),
            SessionCommand::ClearDocument(DocumentSlot::Resume),
            SessionCommand::UpdateField {
                field: FormField::FullName,
                value: "Someone Else".into(),
            },
        ] {
            assert!(session.apply(command).is_err());
        }
        assert_eq!(session.form().personal.full_name, "Asha Rao");
        assert!(session.documents().is_bound(DocumentSlot::Resume));
        assert!(matches!(
            session.begin_submission(),
            Err(OnboardingError::NotSubmittable {
                state: SessionState::Submitted
            })
        ));
    }
}
