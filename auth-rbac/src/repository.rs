use crate::{error::RbacError, models::*};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub mod http;

pub use http::HttpRoleRepository;

/// Role graph store: the CMS endpoints that own role records
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// One page of roles, optionally filtered by a name search
    async fn list_roles(&self, params: &RoleListParams) -> Result<RolePage, RbacError>;

    /// A single role; `RbacError::RoleNotFound` when absent
    async fn get_role_by_id(&self, id: &RoleId) -> Result<Role, RbacError>;

    async fn create_role(&self, draft: RoleDraft) -> Result<Role, RbacError>;

    /// Replace name, description and permission block of an existing role
    async fn update_role(&self, id: &RoleId, draft: RoleDraft) -> Result<Role, RbacError>;

    async fn delete_role(&self, id: &RoleId) -> Result<(), RbacError>;
}

/// Read the complete role collection by walking every page.
///
/// When the store reports a `total`, paging continues until that many
/// distinct roles are held; stores that cap the page size below the
/// requested limit are followed to the end. Without a `total`, a short or
/// empty page ends the walk. A page that adds no new role ids also ends it,
/// so a store that ignores the page number cannot loop.
///
/// A collection larger than `max_roles`, or one that stops short of its own
/// `total`, is an error rather than a silently truncated graph.
pub async fn fetch_role_graph(
    repository: &dyn RoleRepository,
    page_size: u32,
    max_roles: usize,
) -> Result<Vec<Role>, RbacError> {
    let page_size = page_size.max(1);
    let mut roles: Vec<Role> = Vec::new();
    let mut seen: HashSet<RoleId> = HashSet::new();
    let mut page = 1u32;

    loop {
        let batch = repository
            .list_roles(&RoleListParams::page(page, page_size))
            .await?;
        let received = batch.items.len();

        if let Some(total) = batch.total {
            if usize::try_from(total).map_or(true, |total| total > max_roles) {
                return Err(RbacError::RoleGraphTooLarge {
                    fetched: roles.len().saturating_add(received),
                    limit: max_roles,
                });
            }
        }

        let before = roles.len();
        for role in batch.items {
            if seen.insert(role.id.clone()) {
                roles.push(role);
            }
        }
        if roles.len() > max_roles {
            return Err(RbacError::RoleGraphTooLarge {
                fetched: roles.len(),
                limit: max_roles,
            });
        }
        let added = roles.len().saturating_sub(before);

        match batch.total {
            Some(total) if roles.len() as u64 >= total => break,
            Some(total) if received == 0 || added == 0 => {
                warn!(fetched = roles.len(), total, page, "Role store stopped paging early");
                return Err(RbacError::IncompleteRoleGraph {
                    fetched: roles.len(),
                    total,
                });
            }
            Some(_) => {}
            None if received < page_size as usize || added == 0 => break,
            None => {}
        }
        page = page.saturating_add(1);
    }

    debug!(roles = roles.len(), pages = page, "Fetched role graph");
    Ok(roles)
}

/// In-memory role store for testing and development
pub struct InMemoryRoleRepository {
    roles: Arc<DashMap<RoleId, Role>>,
}

impl InMemoryRoleRepository {
    pub fn new() -> Self {
        Self {
            roles: Arc::new(DashMap::new()),
        }
    }

    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let repository = Self::new();
        for role in roles {
            repository.insert(role);
        }
        repository
    }

    /// Insert or overwrite a role as-is, keeping its id
    pub fn insert(&self, role: Role) {
        self.roles.insert(role.id.clone(), role);
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    fn validate_draft(draft: &RoleDraft) -> Result<(), RbacError> {
        if draft.name.trim().is_empty() {
            return Err(RbacError::InvalidRole("role name must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemoryRoleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleRepository {
    async fn list_roles(&self, params: &RoleListParams) -> Result<RolePage, RbacError> {
        let needle = params.search.as_deref().map(str::to_lowercase);
        let mut matching: Vec<Role> = self
            .roles
            .iter()
            .filter(|entry| {
                needle
                    .as_deref()
                    .map_or(true, |n| entry.value().name.to_lowercase().contains(n))
            })
            .map(|entry| entry.value().clone())
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let total = matching.len() as u64;
        let skip = (params.page.max(1) as usize - 1).saturating_mul(params.limit as usize);
        let items = matching
            .into_iter()
            .skip(skip)
            .take(params.limit as usize)
            .collect();

        Ok(RolePage {
            items,
            total: Some(total),
            page: Some(params.page),
            limit: Some(params.limit),
        })
    }

    async fn get_role_by_id(&self, id: &RoleId) -> Result<Role, RbacError> {
        self.roles
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| RbacError::RoleNotFound(id.clone()))
    }

    async fn create_role(&self, draft: RoleDraft) -> Result<Role, RbacError> {
        Self::validate_draft(&draft)?;

        let role = Role {
            id: RoleId::new(Uuid::new_v4().to_string()),
            name: draft.name,
            description: draft.description,
            is_system: false,
            permissions: Some(draft.permissions),
        };
        info!(role_id = %role.id, name = %role.name, "Created role");
        self.insert(role.clone());
        Ok(role)
    }

    async fn update_role(&self, id: &RoleId, draft: RoleDraft) -> Result<Role, RbacError> {
        Self::validate_draft(&draft)?;

        let mut entry = self
            .roles
            .get_mut(id)
            .ok_or_else(|| RbacError::RoleNotFound(id.clone()))?;
        let role = entry.value_mut();
        role.name = draft.name;
        role.description = draft.description;
        role.permissions = Some(draft.permissions);
        info!(role_id = %id, "Updated role");
        Ok(role.clone())
    }

    async fn delete_role(&self, id: &RoleId) -> Result<(), RbacError> {
        self.roles
            .remove(id)
            .map(|_| info!(role_id = %id, "Deleted role"))
            .ok_or_else(|| RbacError::RoleNotFound(id.clone()))
    }
}
