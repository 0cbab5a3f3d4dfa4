//! User-facing status snapshots and the text shown for each state.

use serde::Serialize;
use uuid::Uuid;

use super::backend::SubmitOutcome;
use super::documents::{DocumentSlot, MAX_DOCUMENT_BYTES};
use super::model::{FormField, OnboardingForm};
use super::session::OnboardingSession;
use super::state::SessionState;

pub const VERIFYING_MESSAGE: &str = "Verifying secure link...";
pub const INVALID_TITLE: &str = "Invalid Link";
pub const EXPIRED_TITLE: &str = "Link Expired";
pub const UPLOADING_MESSAGE: &str = "Uploading details & documents securely... Please wait.";
pub const REJECTED_MESSAGE: &str = "Upload Failed. Please try again or check file sizes.";
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error. Please check your connection.";
pub const INCOMPLETE_FIELDS_MESSAGE: &str = "Please fill in all personal and education details.";
pub const INCOMPLETE_DOCUMENTS_MESSAGE: &str = "Please upload ALL required documents.";

/// Summary of one document slot (no file contents).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub slot: DocumentSlot,
    pub label: &'static str,
    pub accept: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_size: Option<u64>,
}

/// Read-only snapshot of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub state: SessionState,
    pub form: OnboardingForm,
    pub documents: Vec<DocumentSummary>,
    pub missing_fields: Vec<FormField>,
    pub missing_documents: Vec<DocumentSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SessionStatus {
    pub fn from_session(session: &OnboardingSession) -> Self {
        let graduated = session.form().education.graduated;
        let documents = session
            .documents()
            .iter()
            .map(|(slot, file)| DocumentSummary {
                slot,
                label: slot.label(graduated),
                accept: slot.accept_hint(),
                file_name: file.map(|f| f.name.clone()),
                byte_size: file.map(|f| f.byte_size),
            })
            .collect();

        Self {
            session_id: session.id(),
            state: session.state(),
            form: session.form().clone(),
            documents,
            missing_fields: session.form().missing_fields(),
            missing_documents: session.documents().missing_slots(),
            message: status_message(session.state(), session.last_submit()).map(String::from),
        }
    }
}

/// Status line for the in-form message area, if one applies.
pub fn status_message(state: SessionState, last_submit: Option<&SubmitOutcome>) -> Option<&'static str> {
    match (state, last_submit) {
        (SessionState::Submitting, _) => Some(UPLOADING_MESSAGE),
        (SessionState::Failed, Some(SubmitOutcome::Unreachable { .. })) => {
            Some(NETWORK_ERROR_MESSAGE)
        }
        (SessionState::Failed, _) => Some(REJECTED_MESSAGE),
        _ => None,
    }
}

/// Message for a submit attempt refused by local validation.
pub fn validation_message(missing: &[String]) -> String {
    let fields_missing = missing.iter().any(|key| key.parse::<FormField>().is_ok());
    let headline = if fields_missing {
        INCOMPLETE_FIELDS_MESSAGE
    } else {
        INCOMPLETE_DOCUMENTS_MESSAGE
    };
    format!("{headline} ({} missing)", missing.join(", "))
}

/// Confirmation text shown once the submission is accepted.
pub fn confirmation(full_name: &str) -> String {
    format!(
        "Submission Successful!\n\
         Thank you, {full_name}.\n\
         We have received your onboarding documents.\n\
         Our HR team will verify them and contact you shortly.\n\n\
         You can safely close this window now."
    )
}

/// Render the whole view for the session's current state.
pub fn render(status: &SessionStatus) -> String {
    match status.state {
        SessionState::Verifying => VERIFYING_MESSAGE.to_string(),
        SessionState::Invalid => INVALID_TITLE.to_string(),
        SessionState::Expired => EXPIRED_TITLE.to_string(),
        SessionState::Submitted => confirmation(&status.form.personal.full_name),
        SessionState::Ready | SessionState::Submitting | SessionState::Failed => {
            render_form(status)
        }
    }
}

fn render_form(status: &SessionStatus) -> String {
    let mut parts = vec![
        "# Onboarding Portal".to_string(),
        "Complete your profile and upload mandatory certificates to proceed.".to_string(),
        String::new(),
        "## Personal & Education Details".to_string(),
    ];

    for field in FormField::ALL {
        let value = status.form.field(field);
        let shown = if value.is_empty() { "(required)" } else { value };
        parts.push(format!("- {} [{}]: {}", field.label(), field.key(), shown));
    }
    let graduation = if status.form.education.graduated {
        "Completed (Graduated)"
    } else {
        "Pursuing (Intern/Student)"
    };
    parts.push(format!("- Graduation Status: {graduation}"));

    parts.push(String::new());
    parts.push(format!(
        "## Upload Documents (Max size: {}MB per file)",
        MAX_DOCUMENT_BYTES / 1_048_576
    ));
    for doc in &status.documents {
        let shown = match (&doc.file_name, doc.byte_size) {
            (Some(name), Some(size)) => format!("{name} ({size} bytes)"),
            _ => format!("(required, {})", doc.accept),
        };
        parts.push(format!("- {} [{}]: {}", doc.label, doc.slot, shown));
    }

    if let Some(ref message) = status.message {
        parts.push(String::new());
        parts.push(message.clone());
    }

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::backend::VerifyOutcome;
    use crate::onboarding::documents::DocumentFile;
    use crate::onboarding::session::SessionCommand;
    use crate::onboarding::token::OnboardingToken;

    fn ready_session() -> OnboardingSession {
        let mut session = OnboardingSession::new();
        session
            .begin_verification(OnboardingToken::new("abc123"))
            .unwrap();
        session.resolve_verification(&VerifyOutcome::Valid).unwrap();
        session
    }

    #[test]
    fn status_messages_per_outcome() {
        assert_eq!(
            status_message(SessionState::Submitting, None),
            Some(UPLOADING_MESSAGE)
        );
        assert_eq!(
            status_message(
                SessionState::Failed,
                Some(&SubmitOutcome::Rejected { status: 500 })
            ),
            Some(REJECTED_MESSAGE)
        );
        assert_eq!(
            status_message(
                SessionState::Failed,
                Some(&SubmitOutcome::Unreachable {
                    reason: "reset".into()
                })
            ),
            Some(NETWORK_ERROR_MESSAGE)
        );
        assert_eq!(status_message(SessionState::Ready, None), None);
        assert_eq!(
            status_message(SessionState::Submitted, Some(&SubmitOutcome::Accepted)),
            None
        );
    }

    #[test]
    fn gate_views() {
        let mut session = OnboardingSession::new();
        assert_eq!(render(&SessionStatus::from_session(&session)), VERIFYING_MESSAGE);
        session.begin_verification(None).unwrap();
        session.reject_missing_token().unwrap();
        assert_eq!(render(&SessionStatus::from_session(&session)), INVALID_TITLE);
    }

    #[test]
    fn form_view_tracks_graduation_label_and_files() {
        let mut session = ready_session();
        session
            .apply(SessionCommand::BindDocument {
                slot: DocumentSlot::Resume,
                file: DocumentFile::new("cv.pdf", b"pdf".to_vec()),
            })
            .unwrap();

        let text = render(&SessionStatus::from_session(&session));
        assert!(text.contains("Degree Certificate / OD"));
        assert!(text.contains("cv.pdf (3 bytes)"));
        assert!(text.contains("Max size: 1MB per file"));

        session.apply(SessionCommand::SetGraduated(false)).unwrap();
        let status = SessionStatus::from_session(&session);
        let text = render(&status);
        assert!(text.contains("Latest Semester Marks Memo"));
        assert!(text.contains("Pursuing (Intern/Student)"));
        assert_eq!(status.missing_documents.len(), 6);
        assert_eq!(status.missing_fields.len(), 6);
    }

    #[test]
    fn validation_message_prefers_field_headline() {
        let fields = validation_message(&["phone".to_string(), "resume".to_string()]);
        assert!(fields.starts_with(INCOMPLETE_FIELDS_MESSAGE));
        assert!(fields.ends_with("(phone, resume missing)"));

        let docs = validation_message(&["degreeOrSemesterMemo".to_string()]);
        assert!(docs.starts_with(INCOMPLETE_DOCUMENTS_MESSAGE));
        assert!(docs.contains("degreeOrSemesterMemo missing"));
    }

    #[test]
    fn confirmation_names_the_candidate() {
        let text = confirmation("Asha Rao");
        assert!(text.contains("Thank you, Asha Rao."));
    }

    #[test]
    fn status_serializes_without_file_contents() {
        let mut session = ready_session();
        session
            .apply(SessionCommand::BindDocument {
                slot: DocumentSlot::Pan,
                file: DocumentFile::new("pan.pdf", b"TOPSECRET".to_vec()),
            })
            .unwrap();
        let json = serde_json::to_string(&SessionStatus::from_session(&session)).unwrap();
        assert!(json.contains("\"state\":\"ready\""));
        assert!(json.contains("pan.pdf"));
        assert!(!json.contains("TOPSECRET"));
        assert!(!json.contains("abc123"));
    }
}
