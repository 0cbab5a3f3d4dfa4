//! Submission payload and its multipart encoding.

use reqwest::multipart::{Form, Part};
use serde::Serialize;

use crate::error::{OnboardingError, PayloadEncodeError};

use super::documents::{DocumentFile, DocumentSlot, DocumentSlotSet};
use super::model::OnboardingForm;
use super::token::OnboardingToken;

/// The JSON `data` part of a submission.
///
/// Field order is the wire order; serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingData {
    pub full_name: String,
    pub dob: String,
    pub phone: String,
    pub address: String,
    pub college_name: String,
    pub passing_year: u16,
    pub graduated: bool,
}

/// Everything sent in one submission. Built from the current session state
/// at submit time and never modified afterwards.
#[derive(Debug)]
pub struct SubmissionPayload {
    token: OnboardingToken,
    data: OnboardingData,
    files: Vec<(DocumentSlot, DocumentFile)>,
}

impl SubmissionPayload {
    /// Validate the form and documents, then snapshot them into a payload.
    ///
    /// Fails with `ValidationIncomplete` listing every empty field followed
    /// by every empty slot.
    pub fn build(
        token: &OnboardingToken,
        form: &OnboardingForm,
        documents: &DocumentSlotSet,
    ) -> Result<Self, OnboardingError> {
        let mut missing: Vec<String> = form
            .missing_fields()
            .iter()
            .map(|f| f.key().to_string())
            .collect();
        missing.extend(documents.missing_slots().iter().map(|s| s.key().to_string()));
        if !missing.is_empty() {
            return Err(OnboardingError::ValidationIncomplete { missing });
        }

        let year = &form.education.passing_year;
        let passing_year = year
            .parse::<u16>()
            .map_err(|_| OnboardingError::InvalidPassingYear {
                value: year.clone(),
            })?;

        let personal = &form.personal;
        let data = OnboardingData {
            full_name: personal.full_name.clone(),
            dob: personal.date_of_birth.clone(),
            phone: personal.phone.clone(),
            address: personal.address.clone(),
            college_name: form.education.college_name.clone(),
            passing_year,
            graduated: form.education.graduated,
        };

        let files = documents
            .iter()
            .filter_map(|(slot, file)| file.map(|f| (slot, f.clone())))
            .collect();

        Ok(Self {
            token: token.clone(),
            data,
            files,
        })
    }

    pub fn token(&self) -> &OnboardingToken {
        &self.token
    }

    pub fn data(&self) -> &OnboardingData {
        &self.data
    }

    pub fn files(&self) -> &[(DocumentSlot, DocumentFile)] {
        &self.files
    }

    /// Total bytes of attached documents.
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|(_, f)| f.byte_size).sum()
    }

    /// The serialized `data` part.
    pub fn data_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.data)
    }

    /// Encode as the multipart form expected by the submit endpoint:
    /// `token`, a JSON `data` part, then one file part per slot.
    pub fn into_form(self) -> Result<Form, PayloadEncodeError> {
        let json = self.data_json()?;
        let mut form = Form::new()
            .text("token", self.token.expose().to_string())
            .part("data", Part::text(json).mime_str("application/json")?);

        for (slot, file) in self.files {
            let part = Part::bytes(file.contents)
                .file_name(file.name)
                .mime_str(&file.mime_hint)?;
            form = form.part(slot.part_name(), part);
        }
        Ok(form)
    }
}
