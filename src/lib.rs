//! Employee profile client: simulated authentication, a persisted theme
//! preference, and a profile form that can be auto-filled from a parsed CV
//! and submitted to the employee service.

pub mod auth;
pub mod cli;
pub mod context;
pub mod core;
pub mod environment;
pub mod profile;
pub mod storage;
pub mod types;
pub mod utils;

pub use context::{AppContext, Route, Theme};
pub use environment::EnvironmentConfig;
pub use profile::{ProfileController, ProfileEditor, SubmitError, UploadOutcome, UploadStatus};
