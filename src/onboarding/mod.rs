//! Onboarding session: token-gated form and document submission.
//!
//! A candidate arrives with an activation link carrying a token. The
//! `SessionController` verifies the token, lets the candidate fill in the
//! form and attach the seven required documents, and submits everything as
//! one multipart package through an `OnboardingBackend`.

pub mod backend;
pub mod controller;
pub mod documents;
pub mod model;
pub mod payload;
pub mod session;
pub mod state;
pub mod token;
pub mod view;

pub use backend::{HttpBackend, OnboardingBackend, SubmitOutcome, VerifyOutcome};
pub use controller::SessionController;
pub use documents::{DocumentFile, DocumentSlot, DocumentSlotSet, MAX_DOCUMENT_BYTES};
pub use model::{EducationDetails, FormField, OnboardingForm, PersonalDetails};
pub use payload::{OnboardingData, SubmissionPayload};
pub use session::{OnboardingSession, SessionCommand};
pub use state::SessionState;
pub use token::OnboardingToken;
pub use view::SessionStatus;
