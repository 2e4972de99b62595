// src/core/service_client.rs
//! HTTP client for the CV parsing service and the employee service

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{error, info, trace};

use crate::profile::upload::CvFile;
use crate::types::response::{
    CvParseResponse, EmployeeSubmission, HealthResponse, ServiceErrorBody,
};
use crate::utils::{normalize_base_url, size_in_mb};

const PROCESS_CV_ENDPOINT: &str = "/api/process-cv";
const EMPLOYEES_ENDPOINT: &str = "/api/employees";
const HEALTH_ENDPOINT: &str = "/health";

#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service answered with a non-success status
    #[error("Service returned error status {status}")]
    Status {
        status: StatusCode,
        body: ServiceErrorBody,
    },
    /// The request never completed
    #[error("{0}")]
    Transport(String),
    /// Success status but the body was not what we expected
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

pub struct ServiceClient {
    client: reqwest::Client,
    parser_url: String,
    employee_url: String,
}

impl ServiceClient {
    /// No request timeout is configured: calls complete, fail, or hang
    pub fn new(parser_url: &str, employee_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            parser_url: normalize_base_url(parser_url),
            employee_url: normalize_base_url(employee_url),
        })
    }

    /// Upload a CV to the parser as a single `file` multipart field
    pub async fn process_cv(&self, file: &CvFile) -> Result<CvParseResponse, ServiceError> {
        let url = format!("{}{}", self.parser_url, PROCESS_CV_ENDPOINT);

        let part = Part::bytes(file.content.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let form = Form::new().part("file", part);

        info!(
            "Uploading CV {} ({:.2}MB) to parser backend: {}",
            file.name,
            size_in_mb(file.size()),
            url
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        trace!("Parser response status: {}", status);

        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str::<CvParseResponse>(&body).map_err(|e| {
                error!("Unparseable parser response: {}", body);
                ServiceError::Decode(e.to_string())
            })
        } else {
            error!("CV service error response ({}): {}", status, body);
            Err(ServiceError::Status {
                status,
                body: ServiceErrorBody::from_text(&body),
            })
        }
    }

    /// Store a completed profile; returns whatever the service answered
    pub async fn submit_employee(
        &self,
        payload: &EmployeeSubmission,
    ) -> Result<serde_json::Value, ServiceError> {
        let url = format!("{}{}", self.employee_url, EMPLOYEES_ENDPOINT);
        info!("Submitting profile for {} to {}", payload.form.email, url);

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;

        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(serde_json::Value::Null);
            }
            serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))
        } else {
            error!("Employee service error response ({}): {}", status, body);
            Err(ServiceError::Status {
                status,
                body: ServiceErrorBody::from_text(&body),
            })
        }
    }

    /// Parser liveness check
    pub async fn parser_health(&self) -> Result<HealthResponse> {
        self.get(&self.parser_url, HEALTH_ENDPOINT).await
    }

    /// Generic GET request
    async fn get<R>(&self, base_url: &str, endpoint: &str) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to GET from {}", url))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<R>()
                .await
                .context("Failed to parse JSON response")
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("HTTP {} error: {}", status, error_text)
        }
    }
}
