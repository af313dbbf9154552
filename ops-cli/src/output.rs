use auth_rbac::{CheckResponse, PermissionCheck, ResolvedGrant, RoleGraphReport, RoleId, RolePage};
use colored::Colorize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_flag(json: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Text
        }
    }
}

pub fn render_checks(role: Option<&RoleId>, checks: &[PermissionCheck], answers: &[CheckResponse]) -> String {
    let mut out = String::new();
    match role {
        Some(id) => {
            let _ = writeln!(out, "Role {}", id.to_string().bold());
        }
        None => {
            let _ = writeln!(out, "{}", "No matching role; every check is denied".yellow());
        }
    }

    for (check, answer) in checks.iter().zip(answers) {
        let pair = format!("{}:{}", check.action, check.subject);
        match answer.matched_grant {
            Some(ref grant) if answer.allowed => {
                let _ = writeln!(out, "  {} {} (via {})", "ALLOW".green().bold(), pair, grant);
            }
            _ => {
                let _ = writeln!(out, "  {} {}", "DENY ".red().bold(), pair);
            }
        }
    }
    out
}

pub fn render_grants(role: &RoleId, grants: &[ResolvedGrant]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Effective grants of {} ({})", role.to_string().bold(), grants.len());

    let mut sorted: Vec<&ResolvedGrant> = grants.iter().collect();
    sorted.sort_by(|a, b| {
        (a.grant.subject.as_str(), a.grant.action.as_str())
            .cmp(&(b.grant.subject.as_str(), b.grant.action.as_str()))
    });
    for resolved in sorted {
        let marker = if resolved.source == *role {
            "direct".normal()
        } else {
            format!("from {}", resolved.source).dimmed()
        };
        let _ = writeln!(out, "  {:<32} {}", resolved.grant.to_string(), marker);
    }
    out
}

pub fn render_report(report: &RoleGraphReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} roles checked", report.role_count);

    if report.is_clean() {
        let _ = writeln!(out, "{}", "No problems found".green());
        return out;
    }

    for dangling in &report.dangling {
        let _ = writeln!(
            out,
            "  {} {} inherits missing role {}",
            "dangling".yellow(),
            dangling.role,
            dangling.missing
        );
    }
    for cycle in &report.cycles {
        let members: Vec<String> = cycle.iter().map(ToString::to_string).collect();
        let first = members.first().cloned().unwrap_or_default();
        let _ = writeln!(out, "  {} {} -> {}", "cycle".yellow(), members.join(" -> "), first);
    }
    for id in &report.duplicate_ids {
        let _ = writeln!(out, "  {} role id {} appears more than once", "duplicate".red(), id);
    }
    for (id, grant) in &report.duplicate_grants {
        let _ = writeln!(out, "  {} {} declares {} more than once", "duplicate".yellow(), id, grant);
    }
    out
}

pub fn render_roles(page: &RolePage) -> String {
    let mut out = String::new();
    for role in &page.items {
        let system = if role.is_system { " [system]".dimmed() } else { "".normal() };
        let _ = writeln!(
            out,
            "{:<38} {}{}  grants={} inherits={}",
            role.id.to_string(),
            role.name.bold(),
            system,
            role.grants().len(),
            role.inherits().len()
        );
    }
    match page.total {
        Some(total) => {
            let _ = writeln!(out, "{} of {} roles", page.items.len(), total);
        }
        None => {
            let _ = writeln!(out, "{} roles", page.items.len());
        }
    }
    out
}
