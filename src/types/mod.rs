// src/types/mod.rs
pub mod profile;
pub mod response;

pub use profile::{CvData, FormField, FormState};
pub use response::{CvParseResponse, EmployeeSubmission, ExperienceYears, ServiceErrorBody};
