// Logger configuration
use serde::{Deserialize, Serialize};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output for development
    #[default]
    Pretty,
    /// Structured JSON lines for production
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: String,
    pub format: LogFormat,
    pub redaction_enabled: bool,
    pub with_target: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            redaction_enabled: true,
            with_target: true,
        }
    }
}

impl LoggerConfig {
    /// Default directive used when `RUST_LOG` is not set
    pub fn default_directive(&self) -> String {
        crate::DEFAULT_FILTER_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.level))
            .chain(std::iter::once("reqwest=info".to_string()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Redactor honoring `redaction_enabled`
    pub fn redactor(&self) -> crate::SecretRedactor {
        if self.redaction_enabled {
            crate::SecretRedactor::default()
        } else {
            crate::SecretRedactor::disabled()
        }
    }
}
