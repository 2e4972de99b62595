// src/core/mod.rs
//! Outbound service access

pub mod service_client;

pub use service_client::{ServiceClient, ServiceError};
