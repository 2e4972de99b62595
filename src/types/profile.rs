// src/types/profile.rs
//! Profile form state and the list data extracted from an uploaded CV

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ===== Form fields =====

/// Flat set of user-editable profile fields. An empty string means unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    pub full_name: String,
    pub email: String,
    pub contact: String,
    pub dob: String,
    pub emergency_contact: String,
    pub employee_id: String,
    pub department: String,
    pub designation: String,
    pub office_location: String,
    pub primary_skill: String,
    pub secondary_skill: String,
    pub experience_years: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    FullName,
    Email,
    Contact,
    Dob,
    EmergencyContact,
    EmployeeId,
    Department,
    Designation,
    OfficeLocation,
    PrimarySkill,
    SecondarySkill,
    ExperienceYears,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Unknown form field: {0}")]
    UnknownField(String),
    #[error("Expected field=value, got: {0}")]
    MalformedAssignment(String),
}

impl FormField {
    pub const ALL: [FormField; 12] = [
        FormField::FullName,
        FormField::Email,
        FormField::Contact,
        FormField::Dob,
        FormField::EmergencyContact,
        FormField::EmployeeId,
        FormField::Department,
        FormField::Designation,
        FormField::OfficeLocation,
        FormField::PrimarySkill,
        FormField::SecondarySkill,
        FormField::ExperienceYears,
    ];

    /// Name used on the wire and in the CLI
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::Email => "email",
            Self::Contact => "contact",
            Self::Dob => "dob",
            Self::EmergencyContact => "emergencyContact",
            Self::EmployeeId => "employeeId",
            Self::Department => "department",
            Self::Designation => "designation",
            Self::OfficeLocation => "officeLocation",
            Self::PrimarySkill => "primarySkill",
            Self::SecondarySkill => "secondarySkill",
            Self::ExperienceYears => "experienceYears",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::Email => "Email",
            Self::Contact => "Contact",
            Self::Dob => "Date of Birth",
            Self::EmergencyContact => "Emergency Contact",
            Self::EmployeeId => "Employee ID",
            Self::Department => "Department",
            Self::Designation => "Designation",
            Self::OfficeLocation => "Office Location",
            Self::PrimarySkill => "Primary Skill",
            Self::SecondarySkill => "Secondary Skill",
            Self::ExperienceYears => "Years of Experience",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .iter()
            .copied()
            .find(|field| field.wire_name() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

impl FormState {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.full_name,
            FormField::Email => &self.email,
            FormField::Contact => &self.contact,
            FormField::Dob => &self.dob,
            FormField::EmergencyContact => &self.emergency_contact,
            FormField::EmployeeId => &self.employee_id,
            FormField::Department => &self.department,
            FormField::Designation => &self.designation,
            FormField::OfficeLocation => &self.office_location,
            FormField::PrimarySkill => &self.primary_skill,
            FormField::SecondarySkill => &self.secondary_skill,
            FormField::ExperienceYears => &self.experience_years,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::FullName => &mut self.full_name,
            FormField::Email => &mut self.email,
            FormField::Contact => &mut self.contact,
            FormField::Dob => &mut self.dob,
            FormField::EmergencyContact => &mut self.emergency_contact,
            FormField::EmployeeId => &mut self.employee_id,
            FormField::Department => &mut self.department,
            FormField::Designation => &mut self.designation,
            FormField::OfficeLocation => &mut self.office_location,
            FormField::PrimarySkill => &mut self.primary_skill,
            FormField::SecondarySkill => &mut self.secondary_skill,
            FormField::ExperienceYears => &mut self.experience_years,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// Set a field from a `name=value` assignment as given on the command line
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<FormField, FormError> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| FormError::MalformedAssignment(assignment.to_string()))?;
        let field: FormField = name.trim().parse()?;
        self.set(field, value);
        Ok(field)
    }

    /// Keep the current value unless `incoming` carries something
    pub fn merge_field(&mut self, field: FormField, incoming: Option<&str>) {
        if let Some(value) = incoming.filter(|v| !v.is_empty()) {
            self.set(field, value);
        }
    }

    pub fn has_required(&self) -> bool {
        !self.full_name.is_empty() && !self.email.is_empty()
    }
}

// ===== CV-derived lists =====

/// Display name of a parsed skill: a bare string, or the `name` of a
/// detailed record. Anything else has no name.
pub fn skill_name(skill: &serde_json::Value) -> Option<&str> {
    skill
        .as_str()
        .or_else(|| skill.get("name").and_then(serde_json::Value::as_str))
}

/// Structured data extracted from an uploaded résumé
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvData {
    /// Opaque entries, passed through unmodified
    pub all_skills: Vec<serde_json::Value>,
    pub work_experience: Vec<serde_json::Value>,
    pub education: String,
}

impl CvData {
    pub fn has_skills(&self) -> bool {
        !self.all_skills.is_empty()
    }

    pub fn skill_names(&self) -> Vec<&str> {
        self.all_skills.iter().filter_map(skill_name).collect()
    }
}
