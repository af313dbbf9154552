use crate::models::{Grant, Role, RoleId};
use crate::resolver::RoleIndex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// An `inherits` entry pointing at a role that is not in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    pub role: RoleId,
    pub missing: RoleId,
}

/// Structural problems found in a role collection.
///
/// None of these break resolution; they explain why an operator sees fewer
/// (or more) permissions than a role's editor expected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleGraphReport {
    pub role_count: usize,
    pub dangling: Vec<DanglingReference>,
    /// Each cycle starts at its smallest role id; self references are one-element cycles
    pub cycles: Vec<Vec<RoleId>>,
    pub duplicate_ids: Vec<RoleId>,
    /// Grants a role declares more than once directly
    pub duplicate_grants: Vec<(RoleId, Grant)>,
}

impl RoleGraphReport {
    pub fn is_clean(&self) -> bool {
        self.dangling.is_empty()
            && self.cycles.is_empty()
            && self.duplicate_ids.is_empty()
            && self.duplicate_grants.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Lint a role collection
pub fn inspect_role_graph(roles: &[Role]) -> RoleGraphReport {
    let index = RoleIndex::new(roles);
    let mut report = RoleGraphReport {
        role_count: index.len(),
        ..Default::default()
    };

    let mut ids_seen = HashSet::new();
    let mut duplicate_ids = HashSet::new();
    for role in roles {
        if !ids_seen.insert(role.id.as_str()) && duplicate_ids.insert(role.id.as_str()) {
            report.duplicate_ids.push(role.id.clone());
        }

        let mut grants_seen = HashSet::new();
        let mut reported = HashSet::new();
        for grant in role.grants() {
            if !grants_seen.insert(grant.key()) && reported.insert(grant.key()) {
                report.duplicate_grants.push((role.id.clone(), grant.clone()));
            }
        }

        let mut missing_seen = HashSet::new();
        for inherited in role.inherits() {
            if !index.contains(inherited.as_str()) && missing_seen.insert(inherited.as_str()) {
                report.dangling.push(DanglingReference {
                    role: role.id.clone(),
                    missing: inherited.clone(),
                });
            }
        }
    }

    report.cycles = find_cycles(roles, &index);
    report
}

/// Iterative depth-first search; a back edge to an in-progress role closes a cycle
fn find_cycles(roles: &[Role], index: &RoleIndex<'_>) -> Vec<Vec<RoleId>> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut found: HashSet<Vec<RoleId>> = HashSet::new();
    let mut cycles = Vec::new();

    for root in roles {
        if marks.contains_key(root.id.as_str()) {
            continue;
        }
        let Some(root) = index.get(root.id.as_str()) else {
            continue;
        };

        marks.insert(root.id.as_str(), Mark::InProgress);
        let mut path: Vec<&str> = vec![root.id.as_str()];
        let mut stack: Vec<(&Role, usize)> = vec![(root, 0)];

        loop {
            let Some(top) = stack.last_mut() else {
                break;
            };
            let current = top.0;
            let next = current.inherits().get(top.1);
            top.1 += 1;

            let Some(next) = next else {
                marks.insert(current.id.as_str(), Mark::Done);
                path.pop();
                stack.pop();
                continue;
            };

            match marks.get(next.as_str()).copied() {
                Some(Mark::InProgress) => {
                    if let Some(start) = path.iter().position(|id| *id == next.as_str()) {
                        let cycle = normalize_cycle(path.get(start..).unwrap_or_default());
                        if found.insert(cycle.clone()) {
                            cycles.push(cycle);
                        }
                    }
                }
                Some(Mark::Done) => {}
                None => {
                    if let Some(next_role) = index.get(next.as_str()) {
                        marks.insert(next_role.id.as_str(), Mark::InProgress);
                        path.push(next_role.id.as_str());
                        stack.push((next_role, 0));
                    }
                }
            }
        }
    }

    cycles
}

fn normalize_cycle(members: &[&str]) -> Vec<RoleId> {
    let start = members
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map_or(0, |(position, _)| position);
    members
        .iter()
        .cycle()
        .skip(start)
        .take(members.len())
        .map(|id| RoleId::from(*id))
        .collect()
}
