// src/profile/editor.rs
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::ServiceClient;
use crate::profile::upload::{CvFile, UploadError};
use crate::profile::{ProfileController, ProfileSnapshot, SubmitError, UploadOutcome};
use crate::types::profile::{FormError, FormField};

/// The edit-profile screen: a controller shared between concurrent actions and
/// the services it talks to. The lock is never held across a request.
#[derive(Clone)]
pub struct ProfileEditor {
    state: Arc<Mutex<ProfileController>>,
    client: Arc<ServiceClient>,
}

impl ProfileEditor {
    pub fn new(client: Arc<ServiceClient>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ProfileController::new())),
            client,
        }
    }

    pub async fn snapshot(&self) -> ProfileSnapshot {
        self.state.lock().await.snapshot()
    }

    pub async fn set_field(&self, field: FormField, value: &str) {
        self.state.lock().await.set_field(field, value);
    }

    pub async fn apply_assignment(&self, assignment: &str) -> Result<FormField, FormError> {
        self.state.lock().await.apply_assignment(assignment)
    }

    pub async fn reset(&self) {
        self.state.lock().await.reset();
    }

    pub async fn upload_cv(&self, file: &CvFile) -> Result<UploadOutcome, UploadError> {
        let ticket = self.state.lock().await.begin_upload(file)?;
        let result = self.client.process_cv(file).await;
        self.state.lock().await.finish_upload(ticket, result)
    }

    pub async fn submit(&self) -> Result<serde_json::Value, SubmitError> {
        let (payload, guard) = self.state.lock().await.begin_submit(chrono::Utc::now())?;
        let result = self.client.submit_employee(&payload).await;
        self.state.lock().await.finish_submit(guard, result)
    }
}
