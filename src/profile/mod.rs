// src/profile/mod.rs
//! Profile editing: form state, CV-derived data and the upload/submit
//! state machine that drives them.

pub mod editor;
pub mod upload;

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::service_client::ServiceError;
use crate::types::profile::{CvData, FormError, FormField, FormState};
use crate::types::response::{CvParseResponse, EmployeeSubmission};
use upload::{CvFile, UploadError};

pub use editor::ProfileEditor;

const GENERIC_SAVE_ERROR: &str = "Failed to save employee data";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Parsing,
    Parsed,
    Error(String),
}

impl UploadStatus {
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Issued for every accepted upload; only the latest one may apply its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTicket {
    token: u64,
    file_name: String,
}

impl UploadTicket {
    pub fn token(&self) -> u64 {
        self.token
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Parsed { skills: usize },
    /// A newer upload (or a reset) happened while this one was in flight
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Please fill in at least Name and Email")]
    MissingRequired,
    #[error("A profile submission is already in progress")]
    InProgress,
    #[error("Failed to save profile: {message}")]
    Service { message: String },
}

impl From<ServiceError> for SubmitError {
    fn from(err: ServiceError) -> Self {
        let message = match err {
            ServiceError::Status { body, .. } => body
                .message()
                .unwrap_or_else(|| GENERIC_SAVE_ERROR.to_string()),
            other => other.to_string(),
        };
        Self::Service { message }
    }
}

/// Marks a submit as in flight until it is finished or dropped, so a
/// cancelled request never leaves the editor locked out
#[derive(Debug)]
pub struct SubmitGuard {
    in_flight: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Read-only copy of the editor state
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSnapshot {
    pub form: FormState,
    pub cv_data: CvData,
    pub status: UploadStatus,
    pub cv_file_name: Option<String>,
}

#[derive(Debug, Default)]
pub struct ProfileController {
    form: FormState,
    cv_data: CvData,
    status: UploadStatus,
    cv_file_name: Option<String>,
    submitting: Arc<AtomicBool>,
    latest_token: u64,
}

impl ProfileController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn cv_data(&self) -> &CvData {
        &self.cv_data
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    pub fn cv_file_name(&self) -> Option<&str> {
        self.cv_file_name.as_deref()
    }

    pub fn is_parsing(&self) -> bool {
        self.status == UploadStatus::Parsing
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot {
            form: self.form.clone(),
            cv_data: self.cv_data.clone(),
            status: self.status.clone(),
            cv_file_name: self.cv_file_name.clone(),
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    pub fn apply_assignment(&mut self, assignment: &str) -> Result<FormField, FormError> {
        self.form.apply_assignment(assignment)
    }

    /// Validate a selected file and, if accepted, move to `Parsing`
    pub fn begin_upload(&mut self, file: &CvFile) -> Result<UploadTicket, UploadError> {
        if let Err(e) = file.validate() {
            warn!("Rejected CV {}: {} ({})", file.name, e, e.code());
            self.status = UploadStatus::Error(e.to_string());
            return Err(e);
        }

        self.latest_token += 1;
        self.status = UploadStatus::Parsing;
        debug!("Upload {} started for {}", self.latest_token, file.name);

        Ok(UploadTicket {
            token: self.latest_token,
            file_name: file.name.clone(),
        })
    }

    /// Apply the parser's answer for `ticket`, unless a newer upload superseded it
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<CvParseResponse, ServiceError>,
    ) -> Result<UploadOutcome, UploadError> {
        if ticket.token != self.latest_token {
            info!(
                "Discarding stale parse result {} for {} (latest is {})",
                ticket.token, ticket.file_name, self.latest_token
            );
            return Ok(UploadOutcome::Stale);
        }

        match result {
            Ok(parsed) => {
                self.cv_data = parsed.cv_data();
                parsed.merge_into(&mut self.form);
                self.cv_file_name = Some(ticket.file_name);
                self.status = UploadStatus::Parsed;

                let skills = self.cv_data.all_skills.len();
                info!("CV parsed successfully: {} skills extracted", skills);
                Ok(UploadOutcome::Parsed { skills })
            }
            Err(e) => {
                let err = UploadError::from(e);
                warn!("Error processing CV {}: {}", ticket.file_name, err);
                self.status = UploadStatus::Error(err.to_string());
                self.cv_file_name = None;
                Err(err)
            }
        }
    }

    /// Check required fields and build the payload. The submit stays in
    /// flight for as long as the returned guard lives.
    pub fn begin_submit(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<(EmployeeSubmission, SubmitGuard), SubmitError> {
        if !self.form.has_required() {
            return Err(SubmitError::MissingRequired);
        }
        if self.submitting.swap(true, Ordering::SeqCst) {
            return Err(SubmitError::InProgress);
        }

        let guard = SubmitGuard {
            in_flight: Arc::clone(&self.submitting),
        };
        Ok((EmployeeSubmission::new(&self.form, &self.cv_data, now), guard))
    }

    pub fn finish_submit(
        &mut self,
        guard: SubmitGuard,
        result: Result<serde_json::Value, ServiceError>,
    ) -> Result<serde_json::Value, SubmitError> {
        drop(guard);

        match result {
            Ok(saved) => {
                info!("Employee saved: {}", saved);
                self.reset();
                Ok(saved)
            }
            Err(e) => {
                let err = SubmitError::from(e);
                warn!("Error saving profile: {}", err);
                Err(err)
            }
        }
    }

    /// Back to empty defaults. Any upload still in flight is invalidated.
    pub fn reset(&mut self) {
        self.form = FormState::default();
        self.cv_data = CvData::default();
        self.cv_file_name = None;
        self.status = UploadStatus::Idle;
        self.latest_token += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::response::ServiceErrorBody;
    use crate::utils::PDF_MIME;
    use reqwest::StatusCode;
    use serde_json::json;

    fn pdf(name: &str) -> CvFile {
        CvFile::new(name, PDF_MIME, vec![0; 2 * 1024 * 1024])
    }

    fn parsed(value: serde_json::Value) -> Result<CvParseResponse, ServiceError> {
        Ok(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_parse_fills_only_returned_fields() {
        let mut ctl = ProfileController::new();
        ctl.set_field(FormField::Email, "kept@example.com");
        ctl.set_field(FormField::Contact, "+1 555 0100");

        let ticket = ctl.begin_upload(&pdf("jane.pdf")).unwrap();
        assert!(ctl.is_parsing());

        let outcome = ctl
            .finish_upload(
                ticket,
                parsed(json!({"fullName": "Jane Doe", "allSkills": ["Go", "SQL"], "email": ""})),
            )
            .unwrap();

        assert_eq!(outcome, UploadOutcome::Parsed { skills: 2 });
        assert_eq!(ctl.form().full_name, "Jane Doe");
        assert_eq!(ctl.form().email, "kept@example.com");
        assert_eq!(ctl.form().contact, "+1 555 0100");
        assert_eq!(ctl.cv_data().all_skills, vec![json!("Go"), json!("SQL")]);
        assert_eq!(ctl.status(), &UploadStatus::Parsed);
        assert_eq!(ctl.cv_file_name(), Some("jane.pdf"));
    }

    #[test]
    fn test_parse_replaces_cv_data_wholesale() {
        let mut ctl = ProfileController::new();

        let first = ctl.begin_upload(&pdf("a.pdf")).unwrap();
        ctl.finish_upload(
            first,
            parsed(json!({"allSkills": ["Rust"], "education": "BSc", "workExperience": [{"company": "Acme"}]})),
        )
        .unwrap();

        let second = ctl.begin_upload(&pdf("b.pdf")).unwrap();
        ctl.finish_upload(second, parsed(json!({"allSkills": ["Go"]})))
            .unwrap();

        assert_eq!(ctl.cv_data().skill_names(), vec!["Go"]);
        assert_eq!(ctl.cv_data().education, "");
        assert!(ctl.cv_data().work_experience.is_empty());
    }

    #[test]
    fn test_failed_parse_keeps_form_and_reports_message() {
        let mut ctl = ProfileController::new();
        ctl.set_field(FormField::FullName, "Jane");

        let ok = ctl.begin_upload(&pdf("a.pdf")).unwrap();
        ctl.finish_upload(ok, parsed(json!({"allSkills": ["Go"]})))
            .unwrap();
        let before = ctl.snapshot();

        let ticket = ctl.begin_upload(&pdf("b.pdf")).unwrap();
        let err = ctl
            .finish_upload(
                ticket,
                Err(ServiceError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    body: ServiceErrorBody::from_text(r#"{"detail": "Gemini quota exceeded"}"#),
                }),
            )
            .unwrap_err();

        assert_eq!(err.to_string(), "Gemini quota exceeded");
        assert_eq!(ctl.form(), &before.form);
        assert_eq!(ctl.cv_data(), &before.cv_data);
        assert_eq!(ctl.status().error_message(), Some("Gemini quota exceeded"));
        assert_eq!(ctl.cv_file_name(), None);
    }

    #[test]
    fn test_rejected_file_sets_error_without_ticket() {
        let mut ctl = ProfileController::new();
        let big = CvFile::new("big.pdf", PDF_MIME, vec![0; 11 * 1024 * 1024]);

        let err = ctl.begin_upload(&big).unwrap_err();

        assert_eq!(err.to_string(), "File size must be less than 10MB");
        assert_eq!(
            ctl.status(),
            &UploadStatus::Error("File size must be less than 10MB".to_string())
        );
        assert_eq!(ctl.form(), &FormState::default());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut ctl = ProfileController::new();

        let older = ctl.begin_upload(&pdf("old.pdf")).unwrap();
        let newer = ctl.begin_upload(&pdf("new.pdf")).unwrap();
        assert!(newer.token() > older.token());

        ctl.finish_upload(newer, parsed(json!({"fullName": "New Name"})))
            .unwrap();
        let outcome = ctl
            .finish_upload(older, parsed(json!({"fullName": "Old Name", "allSkills": ["COBOL"]})))
            .unwrap();

        assert_eq!(outcome, UploadOutcome::Stale);
        assert_eq!(ctl.form().full_name, "New Name");
        assert!(ctl.cv_data().all_skills.is_empty());
        assert_eq!(ctl.cv_file_name(), Some("new.pdf"));
    }

    #[test]
    fn test_stale_error_does_not_clobber_status() {
        let mut ctl = ProfileController::new();

        let older = ctl.begin_upload(&pdf("old.pdf")).unwrap();
        let newer = ctl.begin_upload(&pdf("new.pdf")).unwrap();

        let outcome = ctl.finish_upload(older, Err(ServiceError::Transport("reset".to_string())));
        assert_eq!(outcome, Ok(UploadOutcome::Stale));
        assert!(ctl.is_parsing());

        ctl.finish_upload(newer, parsed(json!({}))).unwrap();
        assert_eq!(ctl.status(), &UploadStatus::Parsed);
    }

    #[test]
    fn test_submit_requires_name_and_email() {
        let mut ctl = ProfileController::new();
        ctl.set_field(FormField::Email, "a@b.com");

        assert_eq!(
            ctl.begin_submit(Utc::now()).unwrap_err(),
            SubmitError::MissingRequired
        );
        assert!(!ctl.is_submitting());
    }

    #[test]
    fn test_submit_success_resets_everything() {
        let mut ctl = ProfileController::new();
        ctl.set_field(FormField::FullName, "Jane Doe");
        ctl.set_field(FormField::Email, "jane@example.com");
        let ticket = ctl.begin_upload(&pdf("jane.pdf")).unwrap();
        ctl.finish_upload(ticket, parsed(json!({"allSkills": ["Go"]})))
            .unwrap();

        let (payload, guard) = ctl.begin_submit(Utc::now()).unwrap();
        assert!(payload.has_cv_data);
        assert_eq!(
            ctl.begin_submit(Utc::now()).unwrap_err(),
            SubmitError::InProgress
        );

        ctl.finish_submit(guard, Ok(json!({"ok": true}))).unwrap();

        assert_eq!(ctl.form(), &FormState::default());
        assert_eq!(ctl.cv_data(), &CvData::default());
        assert_eq!(ctl.status(), &UploadStatus::Idle);
        assert_eq!(ctl.cv_file_name(), None);
        assert!(!ctl.is_submitting());
    }

    #[test]
    fn test_submit_failure_preserves_state() {
        let mut ctl = ProfileController::new();
        ctl.set_field(FormField::FullName, "Jane Doe");
        ctl.set_field(FormField::Email, "jane@example.com");
        let before = ctl.snapshot();

        let (_, guard) = ctl.begin_submit(Utc::now()).unwrap();
        let err = ctl
            .finish_submit(guard, Err(ServiceError::Status {
                status: StatusCode::CONFLICT,
                body: ServiceErrorBody::from_text(r#"{"message": "Email already registered"}"#),
            }))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to save profile: Email already registered"
        );
        assert_eq!(ctl.snapshot(), before);

        let (_, guard) = ctl.begin_submit(Utc::now()).unwrap();
        let err = ctl
            .finish_submit(guard, Err(ServiceError::Status {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: ServiceErrorBody::default(),
            }))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to save profile: Failed to save employee data"
        );
    }

    #[test]
    fn test_dropped_submit_releases_in_flight_flag() {
        let mut ctl = ProfileController::new();
        ctl.set_field(FormField::FullName, "Jane Doe");
        ctl.set_field(FormField::Email, "jane@example.com");

        let (_, guard) = ctl.begin_submit(Utc::now()).unwrap();
        assert!(ctl.is_submitting());

        drop(guard);

        assert!(!ctl.is_submitting());
        assert!(ctl.begin_submit(Utc::now()).is_ok());
    }

    #[test]
    fn test_reset_invalidates_in_flight_upload() {
        let mut ctl = ProfileController::new();
        let ticket = ctl.begin_upload(&pdf("jane.pdf")).unwrap();

        ctl.reset();
        let outcome = ctl
            .finish_upload(ticket, parsed(json!({"fullName": "Jane"})))
            .unwrap();

        assert_eq!(outcome, UploadOutcome::Stale);
        assert_eq!(ctl.form(), &FormState::default());
        assert_eq!(ctl.status(), &UploadStatus::Idle);
    }
}
