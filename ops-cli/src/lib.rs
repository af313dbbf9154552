//! Operator CLI for SignHex access control
//!
//! `signhex-authz` reads the role graph from the CMS role store (or from a
//! JSON export) and answers the questions operators ask when a console user
//! reports a missing button:
//!
//! ```bash
//! # What can this role do, and where does each grant come from?
//! signhex-authz grants --role-name "Content Manager"
//!
//! # Would these actions pass the console gate?
//! signhex-authz check --role-id r-editor update:screen publish:emergency
//!
//! # Anything structurally wrong with the role graph?
//! signhex-authz lint --strict
//!
//! # Page through roles
//! signhex-authz roles --search admin --limit 50
//! ```
//!
//! Configuration comes from `signhex.yaml` and `SIGNHEX_*` environment
//! variables; the role store token from `--token` or `SIGNHEX_TOKEN`.

pub mod cli;
pub mod commands;
pub mod output;

pub use cli::*;
pub use commands::*;
pub use output::*;
