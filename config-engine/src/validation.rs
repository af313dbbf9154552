use crate::{error::ConfigError, settings::SignHexConfig};

/// Reject configurations the access-control stack cannot run with
pub fn validate(config: &SignHexConfig) -> Result<(), ConfigError> {
    let base_url = config.role_store.base_url.trim();
    let host = base_url
        .strip_prefix("https://")
        .or_else(|| base_url.strip_prefix("http://"))
        .ok_or_else(|| {
            ConfigError::ValidationError(format!(
                "role_store.base_url must be an http(s) URL, got '{}'",
                base_url
            ))
        })?;
    if host.is_empty() || host.starts_with('/') {
        return Err(ConfigError::ValidationError(
            "role_store.base_url has no host".to_string(),
        ));
    }

    if config.role_store.page_size == 0 {
        return Err(ConfigError::ValidationError(
            "role_store.page_size must be greater than zero".to_string(),
        ));
    }

    if config.role_store.request_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "role_store.request_timeout_secs must be greater than zero".to_string(),
        ));
    }

    if config.authorization.max_roles == 0 {
        return Err(ConfigError::ValidationError(
            "authorization.max_roles must be greater than zero".to_string(),
        ));
    }

    Ok(())
}
