//! Role-based access control for the SignHex administrative console
//!
//! This module resolves what the signed-in operator may do:
//! - Roles bundle direct grants and inherit other roles by id
//! - The grant resolver walks the inheritance graph (cycles and dangling
//!   references tolerated) and produces a deduplicated effective grant set
//! - The authorization query matches an `(action, subject)` pair against
//!   that set, honoring the `*`/`manage` and `*`/`all` super-tokens
//! - The authorization context binds both to the live identity and a cached
//!   copy of the role graph read from the role store
//!
//! Every decision fails closed: missing identities, missing roles, malformed
//! role records and role-store errors all resolve to "not permitted".
//!
//! # Core Concepts
//!
//! - **Role**: named bundle of grants plus `inherits` links to other roles
//! - **Grant**: an `(action, subject)` rule, either side possibly a wildcard
//! - **Effective grant set**: every grant reachable from a seed role
//!
//! # Example
//!
//! ```rust
//! use auth_rbac::{can_with_grants, resolve_effective_grants, Role, RoleId};
//!
//! let roles = vec![
//!     Role::new("r-editor", "Editor")
//!         .with_grant("update", "screen")
//!         .inheriting("r-viewer"),
//!     Role::new("r-viewer", "Viewer").with_grant("read", "media"),
//! ];
//!
//! let grants = resolve_effective_grants(Some(&RoleId::from("r-editor")), &roles);
//! assert!(can_with_grants(&grants, "read", "media"));
//! assert!(can_with_grants(&grants, "update", "screen"));
//! assert!(!can_with_grants(&grants, "delete", "screen"));
//! ```

pub mod models;
pub mod resolver;
pub mod check;
pub mod graph;
pub mod repository;
pub mod context;
pub mod error;

pub use models::*;
pub use resolver::*;
pub use check::*;
pub use graph::*;
pub use repository::*;
pub use context::*;
pub use error::*;
