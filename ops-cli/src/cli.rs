use auth_identity::{AuthState, AuthUser};
use auth_rbac::PermissionCheck;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Inspect SignHex roles and effective grants
#[derive(Parser, Debug)]
#[command(name = "signhex-authz", version)]
#[command(about = "Inspect SignHex roles, effective grants and permission checks")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "signhex.yaml", global = true)]
    pub config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Bearer token sent to the role store
    #[arg(long, env = "SIGNHEX_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Read roles from a JSON file (array or listing page) instead of the role store
    #[arg(long, global = true)]
    pub roles_file: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Answer permission checks for a role
    Check {
        #[command(flatten)]
        role: RoleSelector,

        /// Checks as `action:subject`, e.g. `update:screen`
        #[arg(required = true, value_parser = parse_check)]
        checks: Vec<PermissionCheck>,
    },

    /// List a role's effective grants and the role contributing each
    Grants {
        #[command(flatten)]
        role: RoleSelector,
    },

    /// Report dangling inherits, cycles and duplicates in the role graph
    Lint {
        /// Fail when any problem is found
        #[arg(long)]
        strict: bool,
    },

    /// List one page of roles
    Roles {
        #[arg(long)]
        search: Option<String>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Check { .. } => "check",
            Self::Grants { .. } => "grants",
            Self::Lint { .. } => "lint",
            Self::Roles { .. } => "roles",
        }
    }
}

/// The role to act as, by id or by name
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct RoleSelector {
    /// Role id
    #[arg(long)]
    pub role_id: Option<String>,

    /// Role name, matched exactly against role names
    #[arg(long)]
    pub role_name: Option<String>,
}

impl RoleSelector {
    pub fn by_id(role_id: &str) -> Self {
        Self {
            role_id: Some(role_id.to_string()),
            role_name: None,
        }
    }

    pub fn by_name(role_name: &str) -> Self {
        Self {
            role_id: None,
            role_name: Some(role_name.to_string()),
        }
    }

    /// Synthetic operator identity carrying the selected role
    pub fn identity(&self) -> AuthState {
        let mut user = AuthUser::new("signhex-authz");
        if let Some(ref id) = self.role_id {
            user = user.with_role_id(id);
        }
        if let Some(ref name) = self.role_name {
            user = user.with_role_name(name);
        }
        AuthState::new(None, Some(user))
    }

    pub fn label(&self) -> &str {
        self.role_id
            .as_deref()
            .or(self.role_name.as_deref())
            .unwrap_or_default()
    }
}

pub fn parse_check(value: &str) -> Result<PermissionCheck, String> {
    match value.split_once(':') {
        Some((action, subject)) if !action.is_empty() && !subject.is_empty() => {
            Ok(PermissionCheck::new(action, subject))
        }
        _ => Err(format!("expected action:subject, got '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check() {
        assert_eq!(parse_check("update:screen").unwrap(), PermissionCheck::new("update", "screen"));
        assert_eq!(parse_check("*:media").unwrap(), PermissionCheck::new("*", "media"));
        assert!(parse_check("update").is_err());
        assert!(parse_check(":screen").is_err());
        assert!(parse_check("update:").is_err());
    }

    #[test]
    fn test_parses_check_command() {
        let cli = Cli::try_parse_from([
            "signhex-authz",
            "--json",
            "check",
            "--role-name",
            "Admin",
            "delete:screen",
            "read:media",
        ])
        .unwrap();

        assert!(cli.json);
        let Command::Check { role, checks } = cli.command else {
            panic!("expected check");
        };
        assert_eq!(role.role_name.as_deref(), Some("Admin"));
        assert_eq!(checks.len(), 2);
        assert_eq!(role.identity().role_name(), Some("Admin"));
    }

    #[test]
    fn test_role_selector_is_exclusive_and_required() {
        assert!(Cli::try_parse_from(["signhex-authz", "grants"]).is_err());
        assert!(Cli::try_parse_from([
            "signhex-authz",
            "grants",
            "--role-id",
            "r1",
            "--role-name",
            "Admin"
        ])
        .is_err());
    }
}
