//! Error types for alumnet-core

use thiserror::Error;

/// Result type alias using alumnet-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in alumnet-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Remote service reported a failure
    #[error("Service error: {0}")]
    Service(String),

    /// Required fields missing or malformed, detected before any service call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Login rejected by the auth service
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Service-side lookup failure
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential store error
    #[error("Credential store error: {0}")]
    CredentialStore(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
