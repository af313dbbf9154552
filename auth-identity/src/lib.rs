//! Authenticated identity for SignHex access control
//!
//! This module owns the identity shape the rest of the access-control stack
//! consumes:
//! - The authenticated user record, optionally carrying a role id and/or a
//!   role name
//! - The session token, held as a secret and never printed
//! - A session holder updated on login/logout with change notifications
//! - The [`IdentityProvider`] seam through which consumers read the current
//!   identity instead of reaching into shared state
//!
//! # Example
//!
//! ```rust
//! use auth_identity::{AuthSession, AuthUser, IdentityProvider};
//!
//! let session = AuthSession::new();
//! assert!(!session.current_identity().is_authenticated());
//!
//! session.set_credentials("token-1", AuthUser::new("u1").with_role_name("Admin"));
//! assert_eq!(session.current_identity().role_name(), Some("Admin"));
//!
//! session.logout();
//! assert!(!session.current_identity().is_authenticated());
//! ```

pub mod models;
pub mod session;
pub mod error;

pub use models::*;
pub use session::*;
pub use error::*;
