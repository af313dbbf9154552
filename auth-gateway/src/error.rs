use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid route table: {0}")]
    InvalidRouteTable(String),
}

impl From<GatewayError> for error_common::SignHexError {
    fn from(err: GatewayError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
