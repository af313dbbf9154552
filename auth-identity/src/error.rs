use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Invalid session: {0}")]
    InvalidSession(String),
}

impl From<IdentityError> for error_common::SignHexError {
    fn from(err: IdentityError) -> Self {
        Self::AuthError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, IdentityError>;
