use crate::codes;
use thiserror::Error;

/// Error type shared across the SignHex access-control crates
#[derive(Error, Debug)]
pub enum SignHexError {
    /// Missing or invalid authenticated identity
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The identity is authenticated but lacks a grant
    #[error("Access denied: {action} on {subject}")]
    AuthorizationError { action: String, subject: String },

    /// Role graph store failures (network, decoding, missing roles)
    #[error("Role store error: {0}")]
    RoleStoreError(String),

    /// Role lookup by id found nothing
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// Network communication errors
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal system errors
    #[error("Internal error: {0}")]
    InternalError(String),

    /// Wrapped external errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SignHexError {
    /// Stable code for operator-facing output
    pub fn code(&self) -> &'static str {
        match self {
            Self::AuthError(_) => codes::authentication::NOT_AUTHENTICATED,
            Self::AuthorizationError { .. } => codes::authorization::ACCESS_DENIED,
            Self::RoleStoreError(_) => codes::authorization::ROLE_GRAPH_UNAVAILABLE,
            Self::RoleNotFound(_) => codes::authorization::ROLE_NOT_FOUND,
            Self::NetworkError(_) => codes::internal::NETWORK_FAILURE,
            Self::ConfigError(_) => codes::configuration::INVALID_CONFIG,
            Self::ValidationError(_) => codes::validation::INVALID_INPUT,
            Self::InternalError(_) | Self::Other(_) => codes::internal::INTERNAL_ERROR,
        }
    }

    /// Short category name used as a structured log field
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::AuthError(_) => "authentication",
            Self::AuthorizationError { .. } => "authorization",
            Self::RoleStoreError(_) | Self::RoleNotFound(_) => "role_store",
            Self::NetworkError(_) => "network",
            Self::ConfigError(_) => "configuration",
            Self::ValidationError(_) => "validation",
            Self::InternalError(_) | Self::Other(_) => "internal",
        }
    }

    pub fn access_denied(action: impl Into<String>, subject: impl Into<String>) -> Self {
        Self::AuthorizationError {
            action: action.into(),
            subject: subject.into(),
        }
    }
}

/// Result type alias for SignHex operations
pub type Result<T> = std::result::Result<T, SignHexError>;

/// Log an error with its code and category
pub fn log_error(context: &str, error: &SignHexError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error_type = error.error_type(),
        error = %error,
        "SignHex error occurred"
    );
}
