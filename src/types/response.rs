// src/types/response.rs
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::types::profile::{CvData, FormField, FormState};

// ===== Parser service =====

/// Body returned by `POST /api/process-cv`. Every field is optional; the
/// parser leaves out or nulls whatever it could not find.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvParseResponse {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub contact: Option<String>,
    pub dob: Option<String>,
    pub emergency_contact: Option<String>,
    pub designation: Option<String>,
    pub department: Option<String>,
    pub primary_skill: Option<String>,
    pub secondary_skill: Option<String>,
    pub experience_years: Option<ExperienceYears>,
    pub all_skills: Option<Vec<serde_json::Value>>,
    pub work_experience: Option<Vec<serde_json::Value>>,
    pub education: Option<String>,
}

/// The parser computes experience as a float but older builds send a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExperienceYears {
    Number(f64),
    Text(String),
}

impl ExperienceYears {
    pub fn to_form_value(&self) -> String {
        match self {
            Self::Number(years) => years.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

impl CvParseResponse {
    /// Scalar value the parser returned for a form field, if any.
    /// `employeeId` and `officeLocation` never come from a CV.
    pub fn scalar(&self, field: FormField) -> Option<String> {
        match field {
            FormField::FullName => self.full_name.clone(),
            FormField::Email => self.email.clone(),
            FormField::Contact => self.contact.clone(),
            FormField::Dob => self.dob.clone(),
            FormField::EmergencyContact => self.emergency_contact.clone(),
            FormField::Designation => self.designation.clone(),
            FormField::Department => self.department.clone(),
            FormField::PrimarySkill => self.primary_skill.clone(),
            FormField::SecondarySkill => self.secondary_skill.clone(),
            FormField::ExperienceYears => {
                self.experience_years.as_ref().map(ExperienceYears::to_form_value)
            }
            FormField::EmployeeId | FormField::OfficeLocation => None,
        }
    }

    /// Merge scalars into `form`, keeping populated fields when the parser
    /// returned nothing for them
    pub fn merge_into(&self, form: &mut FormState) {
        for field in FormField::ALL {
            let incoming = self.scalar(field);
            form.merge_field(field, incoming.as_deref());
        }
    }

    pub fn cv_data(&self) -> CvData {
        CvData {
            all_skills: self.all_skills.clone().unwrap_or_default(),
            work_experience: self.work_experience.clone().unwrap_or_default(),
            education: self.education.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

// ===== Error bodies =====

/// Error object returned by either service. The parser reports `detail`,
/// the employee service reports `message`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceErrorBody {
    pub detail: Option<serde_json::Value>,
    pub message: Option<String>,
}

impl ServiceErrorBody {
    pub fn from_text(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    pub fn detail_or_message(&self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(|d| d.as_str())
            .filter(|d| !d.is_empty())
            .map(str::to_string)
            .or_else(|| self.message())
    }

    pub fn message(&self) -> Option<String> {
        self.message.clone().filter(|m| !m.is_empty())
    }
}

// ===== Employee service =====

/// Payload for `POST /api/employees`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSubmission {
    #[serde(flatten)]
    pub form: FormState,
    pub all_skills: Vec<serde_json::Value>,
    pub work_experience: Vec<serde_json::Value>,
    pub education: String,
    pub submitted_at: String,
    #[serde(rename = "hasCVData")]
    pub has_cv_data: bool,
}

impl EmployeeSubmission {
    pub fn new(form: &FormState, cv_data: &CvData, submitted_at: DateTime<Utc>) -> Self {
        Self {
            form: form.clone(),
            all_skills: cv_data.all_skills.clone(),
            work_experience: cv_data.work_experience.clone(),
            education: cv_data.education.clone(),
            submitted_at: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            has_cv_data: cv_data.has_skills(),
        }
    }
}
