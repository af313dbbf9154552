//! Route and UI guards for the SignHex console
//!
//! A guard decides what a console region does for the current operator:
//! render it, hold it back while grants load, or redirect. It consumes the
//! authorization context from `auth-rbac` plus the raw identity from
//! `auth-identity`; it never fetches roles on the decision path itself.
//!
//! # Example
//!
//! ```rust
//! use auth_gateway::{GuardOutcome, GuardPolicy, Redirect, RouteGuard};
//! use auth_identity::{AuthState, AuthUser};
//! use auth_rbac::{AuthorizationSnapshot, Grant};
//!
//! let guard = RouteGuard::default();
//! let policy = GuardPolicy::new().require("update", "schedule");
//!
//! let operator = AuthState::new(Some("tok".into()), Some(AuthUser::new("u1")));
//! let authz = AuthorizationSnapshot::resolved(None, vec![Grant::new("*", "schedule")]);
//! assert_eq!(guard.evaluate(&operator, &authz, &policy, "/schedules"), GuardOutcome::Render);
//!
//! let outcome = guard.evaluate(&AuthState::anonymous(), &authz, &policy, "/schedules");
//! assert!(matches!(outcome, GuardOutcome::Redirect(Redirect::Login { .. })));
//! ```

pub mod policy;
pub mod guard;
pub mod error;

pub use policy::*;
pub use guard::*;
pub use error::*;
