use crate::models::{Grant, Role, RoleId};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Id → role lookup over a role collection, built once per resolution
pub struct RoleIndex<'a> {
    by_id: HashMap<&'a str, &'a Role>,
}

impl<'a> RoleIndex<'a> {
    /// Later records win when ids repeat
    pub fn new(roles: &'a [Role]) -> Self {
        let by_id = roles.iter().map(|role| (role.id.as_str(), role)).collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Role> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// An effective grant and the role that contributed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedGrant {
    pub grant: Grant,
    pub source: RoleId,
}

/// Every grant reachable from `role_id` through `inherits`, deduplicated by
/// `(action, subject)`.
///
/// Order is unspecified. Cycles, self references and ids missing from
/// `roles` are tolerated; a missing seed yields no grants.
pub fn resolve_effective_grants(role_id: Option<&RoleId>, roles: &[Role]) -> Vec<Grant> {
    resolve_with_provenance(role_id, roles)
        .into_iter()
        .map(|resolved| resolved.grant)
        .collect()
}

/// Like [`resolve_effective_grants`], keeping the contributing role of each
/// grant. When two roles contribute the same pair, the first one reached is
/// kept.
pub fn resolve_with_provenance(role_id: Option<&RoleId>, roles: &[Role]) -> Vec<ResolvedGrant> {
    let Some(seed) = role_id else {
        return Vec::new();
    };
    if roles.is_empty() {
        return Vec::new();
    }

    let index = RoleIndex::new(roles);
    resolve_in_index(seed, &index)
}

/// Traversal over a prebuilt index
pub fn resolve_in_index(seed: &RoleId, index: &RoleIndex<'_>) -> Vec<ResolvedGrant> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut to_visit: Vec<&str> = vec![seed.as_str()];
    let mut seen: HashSet<(&str, &str)> = HashSet::new();
    let mut resolved = Vec::new();

    while let Some(id) = to_visit.pop() {
        if !visited.insert(id) {
            continue;
        }

        let Some(role) = index.get(id) else {
            debug!(role_id = %id, "Skipping role missing from role graph");
            continue;
        };

        for grant in role.grants() {
            if seen.insert(grant.key()) {
                resolved.push(ResolvedGrant {
                    grant: grant.clone(),
                    source: role.id.clone(),
                });
            }
        }

        to_visit.extend(
            role.inherits()
                .iter()
                .map(RoleId::as_str)
                .filter(|inherited| !visited.contains(inherited)),
        );
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn id(value: &str) -> RoleId {
        RoleId::from(value)
    }

    fn as_set(grants: &[Grant]) -> HashSet<Grant> {
        grants.iter().cloned().collect()
    }

    #[test]
    fn test_no_seed_or_no_roles() {
        let roles = vec![Role::new("r1", "Admin").with_grant("manage", "all")];
        assert!(resolve_effective_grants(None, &roles).is_empty());
        assert!(resolve_effective_grants(Some(&id("r1")), &[]).is_empty());
    }

    #[test]
    fn test_direct_grants_only() {
        let roles = vec![Role::new("r1", "Viewer").with_grant("read", "screen")];
        let grants = resolve_effective_grants(Some(&id("r1")), &roles);
        assert_eq!(grants, vec![Grant::new("read", "screen")]);
    }

    #[test]
    fn test_transitive_inheritance() {
        let roles = vec![
            Role::new("a", "A").inheriting("b"),
            Role::new("b", "B").inheriting("c"),
            Role::new("c", "C").with_grant("read", "media"),
        ];
        let grants = resolve_effective_grants(Some(&id("a")), &roles);
        assert!(grants.contains(&Grant::new("read", "media")));
        assert_eq!(grants.len(), 1);
    }

    #[test]
    fn test_two_role_cycle() {
        let roles = vec![
            Role::new("a", "A").with_grant("read", "screen").inheriting("b"),
            Role::new("b", "B").with_grant("update", "media").inheriting("a"),
        ];
        let expected: HashSet<Grant> =
            [Grant::new("read", "screen"), Grant::new("update", "media")].into();

        for seed in ["a", "b"] {
            let grants = resolve_effective_grants(Some(&id(seed)), &roles);
            assert_eq!(grants.len(), 2);
            assert_eq!(as_set(&grants), expected);
        }
    }

    #[test]
    fn test_self_inheritance() {
        let roles = vec![Role::new("a", "A")
            .with_grant("read", "schedule")
            .inheriting("a")
            .inheriting("a")];
        let grants = resolve_effective_grants(Some(&id("a")), &roles);
        assert_eq!(grants, vec![Grant::new("read", "schedule")]);
    }

    #[test]
    fn test_deduplicates_across_chain() {
        let roles = vec![
            Role::new("a", "A").with_grant("update", "screen").inheriting("b"),
            Role::new("b", "B")
                .with_grant("update", "screen")
                .with_grant("update", "screen"),
        ];
        let grants = resolve_effective_grants(Some(&id("a")), &roles);
        assert_eq!(grants, vec![Grant::new("update", "screen")]);
    }

    #[test]
    fn test_dangling_reference_ignored() {
        let roles = vec![
            Role::new("a", "A")
                .with_grant("read", "screen")
                .inheriting("ghost")
                .inheriting("b"),
            Role::new("b", "B").with_grant("read", "media"),
        ];
        let grants = resolve_effective_grants(Some(&id("a")), &roles);
        assert_eq!(
            as_set(&grants),
            HashSet::from([Grant::new("read", "screen"), Grant::new("read", "media")])
        );
    }

    #[test]
    fn test_unknown_seed_yields_nothing() {
        let roles = vec![Role::new("a", "A").with_grant("read", "screen")];
        assert!(resolve_effective_grants(Some(&id("zzz")), &roles).is_empty());
    }

    #[test]
    fn test_missing_permission_block_contributes_nothing() {
        let roles = vec![
            Role::new("a", "A").inheriting("b"),
            Role::new("b", "B"),
        ];
        assert!(resolve_effective_grants(Some(&id("a")), &roles).is_empty());
    }

    #[test]
    fn test_provenance_keeps_first_contributor() {
        let roles = vec![
            Role::new("a", "A").with_grant("read", "screen").inheriting("b"),
            Role::new("b", "B")
                .with_grant("read", "screen")
                .with_grant("delete", "media"),
        ];
        let resolved = resolve_with_provenance(Some(&id("a")), &roles);
        let sources: HashMap<String, String> = resolved
            .iter()
            .map(|r| (r.grant.to_string(), r.source.to_string()))
            .collect();

        assert_eq!(sources.len(), 2);
        assert_eq!(sources["read:screen"], "a");
        assert_eq!(sources["delete:media"], "b");
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let depth = 20_000;
        let roles: Vec<Role> = (0..depth)
            .map(|i| {
                let role = Role::new(&format!("r{i}"), &format!("Role {i}"));
                if i + 1 < depth {
                    role.inheriting(&format!("r{}", i + 1))
                } else {
                    role.with_grant("read", "screen")
                }
            })
            .collect();

        let grants = resolve_effective_grants(Some(&id("r0")), &roles);
        assert_eq!(grants, vec![Grant::new("read", "screen")]);
    }
}
