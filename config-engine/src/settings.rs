use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignHexConfig {
    pub role_store: RoleStoreSettings,
    pub authorization: AuthorizationSettings,
    pub logging: LoggerConfig,
}

/// Where and how the role graph is read
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleStoreSettings {
    /// Base URL of the CMS REST API, without the `/v1` suffix
    pub base_url: String,

    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_secs: u64,

    /// Roles requested per page while walking the full graph (default: 100)
    pub page_size: u32,
}

impl Default for RoleStoreSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
            request_timeout_secs: 10,
            page_size: 100,
        }
    }
}

impl RoleStoreSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Authorization context tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationSettings {
    /// How long a fetched role graph is served before it is re-read (default: 60)
    pub stale_after_secs: u64,

    /// Refuse role graphs larger than this instead of truncating (default: 10000)
    pub max_roles: usize,
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self {
            stale_after_secs: 60,
            max_roles: 10_000,
        }
    }
}

impl AuthorizationSettings {
    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}
