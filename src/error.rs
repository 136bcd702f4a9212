//! Error types for the onboarding app.

use crate::form::FieldId;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    #[error("Data service error: {0}")]
    Data(#[from] DataError),

    #[error("Form configuration error: {0}")]
    FormConfig(#[from] FormConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The email is already registered with the provider.
    #[error("Email already in use")]
    EmailAlreadyInUse,

    #[error("Identity request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response from identity provider: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Rejected(String),
}

/// Errors from the users data service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataError {
    /// Non-2xx answer; carries the server message or a fallback.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced an HTTP response.
    #[error("Network or unexpected error occurred")]
    Network(String),

    /// The response arrived but its body does not have the expected shape.
    #[error("Unexpected response from the user data service: {0}")]
    Decode(String),
}

/// Violations of the step partition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormConfigError {
    #[error("Field {field} is already assigned to step {step}")]
    AssignedElsewhere { field: FieldId, step: u8 },

    #[error("Unknown field identifier: {0}")]
    UnknownField(String),

    #[error("Unknown step: {0}")]
    UnknownStep(String),

    #[error("You must select at least one component for Step {step} Configuration.")]
    EmptyStep { step: u8 },
}

/// Result type alias for the app.
pub type Result<T> = std::result::Result<T, Error>;
