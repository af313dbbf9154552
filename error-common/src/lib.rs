//! Common error handling utilities for SignHex access control
//!
//! This module provides the error type shared by the binaries and the
//! boundary crates, stable error codes for operator-facing output, and a
//! small context builder that travels with an error into the logs.
//!
//! # Error Categories
//!
//! - **AuthError**: no authenticated identity, invalid session
//! - **AuthorizationError**: the identity lacks a required grant
//! - **RoleStoreError**: the role graph could not be read or written
//! - **ConfigError**: invalid or unreadable configuration
//! - **ValidationError**: malformed input
//!
//! # Example
//!
//! ```rust
//! use error_common::{SignHexError, ErrorContext};
//!
//! fn require_role_id(role_id: Option<&str>) -> error_common::Result<&str> {
//!     role_id.ok_or_else(|| SignHexError::ValidationError("role id is required".into()))
//! }
//!
//! let err = require_role_id(None).unwrap_err();
//! assert_eq!(err.code(), "VALIDATION_1001");
//!
//! let context = ErrorContext::new().with_role_id("r1");
//! assert_eq!(context.role_id.as_deref(), Some("r1"));
//! ```

pub mod types;
pub mod context;
pub mod codes;

pub use types::*;
pub use context::*;
pub use codes::*;
