pub mod redactor;
pub mod config;
pub mod subscriber;

pub use redactor::*;
pub use config::*;
pub use subscriber::*;

/// Logging for SignHex access control with secret redaction
///
/// Access-control code logs identities, role ids and failed store requests.
/// Bearer tokens and e-mail addresses must never reach the log sink verbatim,
/// so anything derived from an identity passes through [`SecretRedactor`]
/// before it is recorded.
///
/// # Redacted Data Types
///
/// - **Bearer tokens**: `Bearer eyJ...` → `Bearer TOKEN[hash]`
/// - **JWTs**: three dot-separated base64url segments → `JWT[hash]`
/// - **Email Addresses**: `ops@signhex.io` → `EMAIL[hash]` or `o***@s***`
///
/// # Example
///
/// ```rust
/// use logger_redacted::{init_logging, LoggerConfig, LogFormat, SecretRedactor};
///
/// let config = LoggerConfig {
///     level: "debug".to_string(),
///     format: LogFormat::Json,
///     ..Default::default()
/// };
/// init_logging(&config).ok();
///
/// let redactor = SecretRedactor::default();
/// tracing::info!(identity = %redactor.redact("ops@signhex.io"), "identity changed");
/// ```
pub const DEFAULT_FILTER_TARGETS: &[&str] = &[
    "auth_rbac",
    "auth_gateway",
    "auth_identity",
    "config_engine",
    "ops_cli",
];
