use crate::models::RoleId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RbacError {
    #[error("Role not found: {0}")]
    RoleNotFound(RoleId),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Role graph has more than {limit} roles (fetched {fetched}); refusing to resolve a truncated graph")]
    RoleGraphTooLarge { fetched: usize, limit: usize },

    #[error("Role store stopped after {fetched} of {total} roles; refusing to resolve a truncated graph")]
    IncompleteRoleGraph { fetched: usize, total: u64 },

    #[error("Role store error: {0}")]
    RoleStoreError(String),

    #[error("Role store transport error: {0}")]
    TransportError(String),

    #[error("Role store returned an unreadable body: {0}")]
    DecodeError(String),
}

impl From<RbacError> for error_common::SignHexError {
    fn from(err: RbacError) -> Self {
        match err {
            RbacError::RoleNotFound(id) => Self::RoleNotFound(id.to_string()),
            RbacError::InvalidRole(msg) => Self::ValidationError(msg),
            RbacError::TransportError(msg) => Self::NetworkError(msg),
            other => Self::RoleStoreError(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, RbacError>;
