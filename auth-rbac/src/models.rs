use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Wildcard accepted on either side of a grant
pub const ANY: &str = "*";

/// Action token that matches every action
pub const MANAGE: &str = "manage";

/// Subject token that matches every subject
pub const ALL: &str = "all";

/// Opaque role identifier assigned by the role store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(String);

impl RoleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RoleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for RoleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One permission rule: `action` on `subject`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grant {
    pub action: String,
    pub subject: String,
}

impl Grant {
    pub fn new(action: &str, subject: &str) -> Self {
        Self {
            action: action.to_string(),
            subject: subject.to_string(),
        }
    }

    pub fn matches_action(&self, action: &str) -> bool {
        self.action == action || self.action == ANY || self.action == MANAGE
    }

    pub fn matches_subject(&self, subject: &str) -> bool {
        self.subject == subject || self.subject == ANY || self.subject == ALL
    }

    /// Exact match or super-token on each side; no prefix matching
    pub fn matches(&self, action: &str, subject: &str) -> bool {
        self.matches_action(action) && self.matches_subject(subject)
    }

    /// Deduplication key
    pub fn key(&self) -> (&str, &str) {
        (&self.action, &self.subject)
    }
}

impl fmt::Display for Grant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.action, self.subject)
    }
}

/// Permission block of a role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermissions {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub grants: Vec<Grant>,

    /// Roles whose grants this role includes; duplicates and self references allowed
    #[serde(default, deserialize_with = "null_as_empty")]
    pub inherits: Vec<RoleId>,
}

/// A named permission bundle as stored by the role store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub permissions: Option<RolePermissions>,
}

impl Role {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: RoleId::from(id),
            name: name.to_string(),
            description: None,
            is_system: false,
            permissions: None,
        }
    }

    pub fn with_grant(mut self, action: &str, subject: &str) -> Self {
        self.permissions
            .get_or_insert_with(RolePermissions::default)
            .grants
            .push(Grant::new(action, subject));
        self
    }

    pub fn inheriting(mut self, role_id: &str) -> Self {
        self.permissions
            .get_or_insert_with(RolePermissions::default)
            .inherits
            .push(RoleId::from(role_id));
        self
    }

    /// Direct grants; empty when the permission block is missing
    pub fn grants(&self) -> &[Grant] {
        self.permissions
            .as_ref()
            .map_or(&[][..], |p| p.grants.as_slice())
    }

    /// Inherited role ids; empty when the permission block is missing
    pub fn inherits(&self) -> &[RoleId] {
        self.permissions
            .as_ref()
            .map_or(&[][..], |p| p.inherits.as_slice())
    }
}

/// Body for creating or replacing a role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: RolePermissions,
}

impl RoleDraft {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_grant(mut self, action: &str, subject: &str) -> Self {
        self.permissions.grants.push(Grant::new(action, subject));
        self
    }

    pub fn inheriting(mut self, role_id: &str) -> Self {
        self.permissions.inherits.push(RoleId::from(role_id));
        self
    }
}

/// Query parameters of the role listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleListParams {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl RoleListParams {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search: None,
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = Some(search.to_string());
        self
    }
}

impl Default for RoleListParams {
    fn default() -> Self {
        Self::page(1, 100)
    }
}

/// One page of the role listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<Role>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// A single authorization question
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionCheck {
    pub action: String,
    pub subject: String,
}

impl PermissionCheck {
    pub fn new(action: &str, subject: &str) -> Self {
        Self {
            action: action.to_string(),
            subject: subject.to_string(),
        }
    }
}

/// Answer to a [`PermissionCheck`], with the grant that satisfied it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub allowed: bool,
    pub matched_grant: Option<Grant>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
