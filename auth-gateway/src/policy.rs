use crate::error::{GatewayError, Result};
use auth_rbac::PermissionCheck;
use serde::{Deserialize, Serialize};

/// How a policy's required pairs combine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementMode {
    /// One passing pair is enough
    #[default]
    Any,
    All,
}

/// Access rule for one guarded console region
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardPolicy {
    /// Literal role names admitted without waiting on grant resolution
    #[serde(default)]
    pub allowed_roles: Vec<String>,
    #[serde(default)]
    pub required: Vec<PermissionCheck>,
    #[serde(default)]
    pub mode: RequirementMode,
}

impl GuardPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_role(mut self, name: &str) -> Self {
        self.allowed_roles.push(name.to_string());
        self
    }

    pub fn require(mut self, action: &str, subject: &str) -> Self {
        self.required.push(PermissionCheck::new(action, subject));
        self
    }

    pub fn require_all(mut self) -> Self {
        self.mode = RequirementMode::All;
        self
    }

    pub fn admits_role(&self, role_name: Option<&str>) -> bool {
        role_name.is_some_and(|name| self.allowed_roles.iter().any(|allowed| allowed == name))
    }

    /// Combine per-pair answers according to `mode`
    pub fn is_satisfied_by(&self, mut can: impl FnMut(&str, &str) -> bool) -> bool {
        match self.mode {
            RequirementMode::Any => self.required.iter().any(|c| can(&c.action, &c.subject)),
            RequirementMode::All => self.required.iter().all(|c| can(&c.action, &c.subject)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRule {
    pub prefix: String,
    #[serde(flatten)]
    pub policy: GuardPolicy,
}

/// Console routes mapped to guard policies, matched by longest path prefix
///
/// ```yaml
/// routes:
///   - prefix: /emergency
///     allowed_roles: [Super Admin]
///     required:
///       - { action: publish, subject: emergency }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, prefix: &str, policy: GuardPolicy) -> Self {
        self.routes.push(RouteRule {
            prefix: prefix.to_string(),
            policy,
        });
        self
    }

    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let table: Self = serde_yaml::from_str(source)
            .map_err(|e| GatewayError::InvalidRouteTable(e.to_string()))?;
        if let Some(bad) = table.routes.iter().find(|r| !r.prefix.starts_with('/')) {
            return Err(GatewayError::InvalidRouteTable(format!(
                "prefix '{}' must start with '/'",
                bad.prefix
            )));
        }
        Ok(table)
    }

    /// Policy of the most specific route covering `path`
    pub fn policy_for(&self, path: &str) -> Option<&GuardPolicy> {
        self.routes
            .iter()
            .filter(|rule| covers(&rule.prefix, path))
            .max_by_key(|rule| rule.prefix.trim_end_matches('/').len())
            .map(|rule| &rule.policy)
    }
}

/// Prefix match on path segment boundaries
fn covers(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
}
