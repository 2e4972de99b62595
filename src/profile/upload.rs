// src/profile/upload.rs
use anyhow::{Context, Result};
use std::path::Path;
use thiserror::Error;

use crate::core::service_client::ServiceError;
use crate::utils::{content_type_for, DOCX_MIME, DOC_MIME, PDF_MIME};

/// Largest CV the parser accepts
pub const MAX_CV_SIZE: u64 = 10 * 1024 * 1024;

pub const ALLOWED_CV_TYPES: [&str; 3] = [PDF_MIME, DOCX_MIME, DOC_MIME];

const GENERIC_PARSE_ERROR: &str = "Failed to process CV";

/// A user-selected CV file
#[derive(Debug, Clone)]
pub struct CvFile {
    pub name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Please upload a PDF or DOCX file only")]
    UnsupportedType { mime_type: String },
    #[error("File size must be less than 10MB")]
    TooLarge { size: u64 },
    #[error("{message}")]
    Service { message: String },
    #[error("Failed to process CV. Please try again.")]
    Transport,
}

impl UploadError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedType { .. } => "CV_UNSUPPORTED_TYPE",
            Self::TooLarge { .. } => "CV_TOO_LARGE",
            Self::Service { .. } => "CV_SERVICE_ERROR",
            Self::Transport => "CV_TRANSPORT_ERROR",
        }
    }

    /// Rejected before any request was made
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::UnsupportedType { .. } | Self::TooLarge { .. })
    }
}

impl From<ServiceError> for UploadError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Status { body, .. } => Self::Service {
                message: body
                    .detail_or_message()
                    .unwrap_or_else(|| GENERIC_PARSE_ERROR.to_string()),
            },
            ServiceError::Transport(_) | ServiceError::Decode(_) => Self::Transport,
        }
    }
}

impl CvFile {
    pub fn new(name: &str, mime_type: &str, content: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            content,
        }
    }

    /// Load a file from disk, deriving its content type from the extension
    pub async fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?
            .to_string();

        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(Self {
            mime_type: content_type_for(&name).to_string(),
            name,
            content,
        })
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Type first, then size
    pub fn validate(&self) -> Result<(), UploadError> {
        if !ALLOWED_CV_TYPES.contains(&self.mime_type.as_str()) {
            return Err(UploadError::UnsupportedType {
                mime_type: self.mime_type.clone(),
            });
        }

        if self.size() > MAX_CV_SIZE {
            return Err(UploadError::TooLarge { size: self.size() });
        }

        Ok(())
    }
}
