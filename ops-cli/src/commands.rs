use crate::cli::{Cli, Command};
use crate::output::{self, OutputFormat};
use auth_identity::{AuthState, IdentityProvider};
use auth_rbac::{
    fetch_role_graph, inspect_role_graph, resolve_identity_role, resolve_with_provenance,
    AuthorizationContext, ContextSettings, HttpRoleRepository, InMemoryRoleRepository, Role,
    RoleListParams, RolePage, RoleRepository,
};
use config_engine::SignHexConfig;
use error_common::{Result, SignHexError};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Run the parsed command against the configured role source
pub async fn run(cli: &Cli, config: &SignHexConfig) -> Result<String> {
    let repository = open_repository(cli, config)?;
    execute(&cli.command, repository, config, OutputFormat::from_flag(cli.json)).await
}

pub fn context_settings(config: &SignHexConfig) -> ContextSettings {
    ContextSettings {
        page_size: config.role_store.page_size,
        max_roles: config.authorization.max_roles,
        stale_after: config.authorization.stale_after(),
    }
}

fn open_repository(cli: &Cli, config: &SignHexConfig) -> Result<Arc<dyn RoleRepository>> {
    if let Some(ref path) = cli.roles_file {
        let roles = load_roles_file(path)?;
        info!(path = %path.display(), roles = roles.len(), "Using roles from file");
        return Ok(Arc::new(InMemoryRoleRepository::with_roles(roles)));
    }

    let identity: Arc<dyn IdentityProvider> = Arc::new(AuthState::new(cli.token.clone(), None));
    let repository = HttpRoleRepository::new(
        &config.role_store.base_url,
        config.role_store.request_timeout(),
        identity,
    )?;
    debug!(base_url = %config.role_store.base_url, "Using HTTP role store");
    Ok(Arc::new(repository))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RolesDocument {
    List(Vec<Role>),
    Page(RolePage),
}

/// Roles from a JSON file holding either a bare array or a listing page
pub fn load_roles_file(path: &Path) -> Result<Vec<Role>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SignHexError::ConfigError(format!("cannot read {}: {}", path.display(), e)))?;
    let document: RolesDocument = serde_json::from_str(&raw)
        .map_err(|e| SignHexError::ValidationError(format!("{}: {}", path.display(), e)))?;
    Ok(match document {
        RolesDocument::List(roles) => roles,
        RolesDocument::Page(page) => page.items,
    })
}

pub async fn execute(
    command: &Command,
    repository: Arc<dyn RoleRepository>,
    config: &SignHexConfig,
    format: OutputFormat,
) -> Result<String> {
    match command {
        Command::Check { role, checks } => {
            let context = AuthorizationContext::new(
                repository,
                Arc::new(role.identity()),
                context_settings(config),
            );
            context.refresh().await?;

            let snapshot = context.snapshot();
            let answers = snapshot.batch_check(checks);
            Ok(match format {
                OutputFormat::Json => pretty(&json!({
                    "role_id": snapshot.role_id,
                    "results": checks.iter().zip(&answers).map(|(check, answer)| json!({
                        "action": check.action,
                        "subject": check.subject,
                        "allowed": answer.allowed,
                        "matched_grant": answer.matched_grant,
                    })).collect::<Vec<_>>(),
                }))?,
                OutputFormat::Text => output::render_checks(snapshot.role_id.as_ref(), checks, &answers),
            })
        }

        Command::Grants { role } => {
            let roles = fetch_all(repository.as_ref(), config).await?;
            let role_id = resolve_identity_role(&role.identity(), &roles)
                .filter(|id| roles.iter().any(|r| r.id == *id))
                .ok_or_else(|| SignHexError::RoleNotFound(role.label().to_string()))?;

            let grants = resolve_with_provenance(Some(&role_id), &roles);
            Ok(match format {
                OutputFormat::Json => pretty(&json!({ "role_id": role_id, "grants": grants }))?,
                OutputFormat::Text => output::render_grants(&role_id, &grants),
            })
        }

        Command::Lint { strict } => {
            let roles = fetch_all(repository.as_ref(), config).await?;
            let report = inspect_role_graph(&roles);
            let rendered = match format {
                OutputFormat::Json => pretty(&report)?,
                OutputFormat::Text => output::render_report(&report),
            };

            if *strict && !report.is_clean() {
                return Err(SignHexError::ValidationError(format!(
                    "role graph has problems:\n{}",
                    rendered
                )));
            }
            Ok(rendered)
        }

        Command::Roles {
            search,
            page,
            limit,
        } => {
            let mut params = RoleListParams::page(*page, *limit);
            if let Some(search) = search {
                params = params.with_search(search);
            }
            let page = repository.list_roles(&params).await?;
            Ok(match format {
                OutputFormat::Json => pretty(&page)?,
                OutputFormat::Text => output::render_roles(&page),
            })
        }
    }
}

async fn fetch_all(repository: &dyn RoleRepository, config: &SignHexConfig) -> Result<Vec<Role>> {
    let roles = fetch_role_graph(
        repository,
        config.role_store.page_size,
        config.authorization.max_roles,
    )
    .await?;
    Ok(roles)
}

fn pretty<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| SignHexError::InternalError(e.to_string()))
}
