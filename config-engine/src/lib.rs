//! Configuration management for SignHex access control
//!
//! Configuration is layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults ([`SignHexConfig::default`])
//! 2. An optional YAML file (`signhex.yaml` unless told otherwise)
//! 3. `SIGNHEX_` environment variables, `__` separating nested keys
//!    (`SIGNHEX_ROLE_STORE__BASE_URL`, `SIGNHEX_AUTHORIZATION__MAX_ROLES`)
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .with_file("signhex.yaml")
//!     .load()?;
//! println!("role store at {}", config.role_store.base_url);
//! # Ok::<(), config_engine::ConfigError>(())
//! ```
//!
//! ```yaml
//! role_store:
//!   base_url: "https://cms.example.com/api"
//!   request_timeout_secs: 10
//!   page_size: 100
//! authorization:
//!   stale_after_secs: 60
//!   max_roles: 10000
//! logging:
//!   level: info
//!   format: json
//! ```

pub mod settings;
pub mod loader;
pub mod validation;
pub mod error;

pub use settings::*;
pub use loader::*;
pub use error::*;
