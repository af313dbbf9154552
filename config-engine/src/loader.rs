use crate::{error::ConfigError, settings::SignHexConfig, validation};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use std::path::PathBuf;
use tracing::debug;

pub const ENV_PREFIX: &str = "SIGNHEX_";

/// Builds a [`SignHexConfig`] from defaults, an optional YAML file and the environment
#[derive(Debug, Default)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    require_file: bool,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge this YAML file if it exists
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Fail instead of skipping when the file is missing
    pub fn require_file(mut self, required: bool) -> Self {
        self.require_file = required;
        self
    }

    pub fn figment(&self) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(SignHexConfig::default()));

        if let Some(ref path) = self.file {
            if path.exists() {
                debug!(path = %path.display(), "Merging configuration file");
                figment = figment.merge(Yaml::file(path));
            } else if self.require_file {
                return Err(ConfigError::SourceNotFound(path.display().to_string()));
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    pub fn load(&self) -> Result<SignHexConfig, ConfigError> {
        let config: SignHexConfig = self.figment()?.extract()?;
        validation::validate(&config)?;
        Ok(config)
    }
}
