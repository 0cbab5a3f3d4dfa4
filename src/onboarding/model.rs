//! Candidate form data: personal and education details.

use serde::{Deserialize, Serialize};

use super::documents::DocumentSlot;

/// Maximum number of digits accepted for the passing year.
pub const PASSING_YEAR_DIGITS: usize = 4;

/// One of the six mandatory text fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    #[serde(rename = "fullName")]
    FullName,
    #[serde(rename = "dob")]
    DateOfBirth,
    #[serde(rename = "phone")]
    Phone,
    #[serde(rename = "address")]
    Address,
    #[serde(rename = "collegeName")]
    CollegeName,
    #[serde(rename = "passYear")]
    PassingYear,
}

impl FormField {
    /// All mandatory fields, in form order.
    pub const ALL: [FormField; 6] = [
        FormField::FullName,
        FormField::DateOfBirth,
        FormField::Phone,
        FormField::Address,
        FormField::CollegeName,
        FormField::PassingYear,
    ];

    /// Identifier used in validation reports and commands.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::DateOfBirth => "dob",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::CollegeName => "collegeName",
            Self::PassingYear => "passYear",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::DateOfBirth => "Date of Birth",
            Self::Phone => "Phone Number",
            Self::Address => "Address",
            Self::CollegeName => "College Name",
            Self::PassingYear => "Passing Year",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|f| f.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown field: {s}"))
    }
}

/// Personal details. All four are mandatory free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    pub full_name: String,
    /// Entered date, kept as text (date pickers produce `YYYY-MM-DD`).
    pub date_of_birth: String,
    pub phone: String,
    pub address: String,
}

/// Education details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationDetails {
    pub college_name: String,
    /// Digits only, at most four.
    pub passing_year: String,
    /// Selects the label of the final document slot. Does not change
    /// which documents are required.
    pub graduated: bool,
}

impl Default for EducationDetails {
    fn default() -> Self {
        Self {
            college_name: String::new(),
            passing_year: String::new(),
            graduated: true,
        }
    }
}

impl EducationDetails {
    /// Label of the final document slot for the current graduation status.
    pub fn final_document_label(&self) -> &'static str {
        DocumentSlot::DegreeOrSemesterMemo.label(self.graduated)
    }
}

/// The candidate form: personal plus education details.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingForm {
    pub personal: PersonalDetails,
    pub education: EducationDetails,
}

impl OnboardingForm {
    /// Set one text field. Passing year input keeps only its digit
    /// characters, capped at four.
    pub fn update_field(&mut self, field: FormField, value: &str) {
        let slot = match field {
            FormField::FullName => &mut self.personal.full_name,
            FormField::DateOfBirth => &mut self.personal.date_of_birth,
            FormField::Phone => &mut self.personal.phone,
            FormField::Address => &mut self.personal.address,
            FormField::CollegeName => &mut self.education.college_name,
            FormField::PassingYear => {
                self.education.passing_year = digits_only(value);
                return;
            }
        };
        *slot = value.to_string();
    }

    pub fn set_graduated(&mut self, graduated: bool) {
        self.education.graduated = graduated;
    }

    /// Current value of a text field.
    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.personal.full_name,
            FormField::DateOfBirth => &self.personal.date_of_birth,
            FormField::Phone => &self.personal.phone,
            FormField::Address => &self.personal.address,
            FormField::CollegeName => &self.education.college_name,
            FormField::PassingYear => &self.education.passing_year,
        }
    }

    /// Fields that are still empty. Any content, even whitespace, counts
    /// as present.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::ALL
            .into_iter()
            .filter(|f| self.field(*f).is_empty())
            .collect()
    }

    /// Succeeds only when all six mandatory fields are filled in.
    pub fn validate(&self) -> Result<(), Vec<FormField>> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing)
        }
    }
}

fn digits_only(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PASSING_YEAR_DIGITS)
        .collect()
}
