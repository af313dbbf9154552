use crate::{
    check,
    error::RbacError,
    models::{CheckResponse, Grant, PermissionCheck, Role, RoleId, ALL, MANAGE},
    repository::{fetch_role_graph, RoleRepository},
    resolver::resolve_effective_grants,
};
use auth_identity::{AuthState, IdentityProvider, SessionKey};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Tuning for [`AuthorizationContext`]
#[derive(Debug, Clone)]
pub struct ContextSettings {
    pub page_size: u32,
    pub max_roles: usize,
    /// How long a fetched role graph is served without re-reading
    pub stale_after: Duration,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_roles: 10_000,
            stale_after: Duration::from_secs(60),
        }
    }
}

/// What a fetch request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A new role graph was stored for the current identity
    Fetched,
    /// The cached graph was still fresh; nothing was read
    Fresh,
    /// The identity changed while the fetch was in flight; the result was dropped
    Discarded,
    /// No identity; cached state was cleared and nothing was read
    Unauthenticated,
}

/// Three-way answer for callers that can wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    Denied,
    /// Grants are not resolved yet (loading, or the role store failed)
    Pending,
}

/// Pick the role the identity acts as: the explicit role id when present,
/// else the role whose name equals the identity's role name.
pub fn resolve_identity_role(identity: &AuthState, roles: &[Role]) -> Option<RoleId> {
    if let Some(role_id) = identity.role_id() {
        return Some(RoleId::from(role_id));
    }
    let name = identity.role_name()?;
    roles
        .iter()
        .find(|role| role.name == name)
        .map(|role| role.id.clone())
}

struct RoleSnapshot {
    session: SessionKey,
    roles: Arc<Vec<Role>>,
    fetched_at: Instant,
    generation: u64,
    invalidated: bool,
}

#[derive(Default)]
struct ContextState {
    snapshot: Option<RoleSnapshot>,
    error: Option<(SessionKey, String)>,
    generation: u64,
}

struct Derived {
    session: SessionKey,
    role_id: Option<RoleId>,
    generation: u64,
    grants: Arc<[Grant]>,
}

/// Binds grant resolution to the live identity and a cached copy of the role
/// graph.
///
/// The repository and identity source are injected; the context never reaches
/// for shared globals. Only one fetch runs at a time, and a fetch started for
/// one identity never feeds grants to another.
pub struct AuthorizationContext {
    repository: Arc<dyn RoleRepository>,
    identity: Arc<dyn IdentityProvider>,
    settings: ContextSettings,
    state: RwLock<ContextState>,
    derived: Mutex<Option<Derived>>,
    fetch_gate: tokio::sync::Mutex<()>,
}

impl AuthorizationContext {
    pub fn new(
        repository: Arc<dyn RoleRepository>,
        identity: Arc<dyn IdentityProvider>,
        settings: ContextSettings,
    ) -> Self {
        Self {
            repository,
            identity,
            settings,
            state: RwLock::new(ContextState::default()),
            derived: Mutex::new(None),
            fetch_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn identity(&self) -> AuthState {
        self.identity.current_identity()
    }

    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    /// Fetch the role graph unless a fresh copy for the current identity exists
    pub async fn ensure_fresh(&self) -> Result<FetchOutcome, RbacError> {
        let Some(session) = self.identity.current_identity().session_key() else {
            self.clear();
            return Ok(FetchOutcome::Unauthenticated);
        };
        if self.is_fresh(&session) {
            return Ok(FetchOutcome::Fresh);
        }

        let _gate = self.fetch_gate.lock().await;
        if self.is_fresh(&session) {
            return Ok(FetchOutcome::Fresh);
        }
        self.fetch_locked().await
    }

    /// Re-read the role graph regardless of freshness
    pub async fn refresh(&self) -> Result<FetchOutcome, RbacError> {
        let _gate = self.fetch_gate.lock().await;
        self.fetch_locked().await
    }

    /// Track identity changes from a session: sign-in prefetches the role
    /// graph, sign-out drops cached state. Ends when the sender is dropped.
    pub fn follow_identity(self: Arc<Self>, mut changes: watch::Receiver<AuthState>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                match self.ensure_fresh().await {
                    Ok(outcome) => debug!(?outcome, "Followed identity change"),
                    Err(err) => warn!(error = %err, "Role graph prefetch failed"),
                }
            }
        })
    }

    /// Mark the cached graph stale after a role mutation; it keeps serving
    /// until the next fetch replaces it
    pub fn invalidate(&self) {
        if let Some(snapshot) = self.state.write().snapshot.as_mut() {
            snapshot.invalidated = true;
            debug!("Role graph invalidated");
        }
    }

    /// Role graph cached for the current identity
    pub fn roles(&self) -> Option<Arc<Vec<Role>>> {
        let session = self.identity.current_identity().session_key()?;
        let state = self.state.read();
        state
            .snapshot
            .as_ref()
            .filter(|snapshot| snapshot.session == session)
            .map(|snapshot| Arc::clone(&snapshot.roles))
    }

    /// Authorization view for the current identity
    pub fn snapshot(&self) -> AuthorizationSnapshot {
        let identity = self.identity.current_identity();
        let is_fetching = self.fetch_gate.try_lock().is_err();

        let Some(session) = identity.session_key() else {
            return AuthorizationSnapshot {
                is_fetching,
                ..AuthorizationSnapshot::unauthenticated()
            };
        };

        let state = self.state.read();
        let error = state
            .error
            .as_ref()
            .filter(|(key, _)| *key == session)
            .map(|(_, message)| message.clone());
        let cached = state
            .snapshot
            .as_ref()
            .filter(|snapshot| snapshot.session == session)
            .map(|snapshot| (Arc::clone(&snapshot.roles), snapshot.generation));
        drop(state);

        let Some((roles, generation)) = cached else {
            return AuthorizationSnapshot {
                is_loading: error.is_none(),
                is_error: error.is_some(),
                is_fetching,
                error,
                ..AuthorizationSnapshot::loading()
            };
        };

        let role_id = resolve_identity_role(&identity, &roles);
        let grants = self.effective_grants(&session, role_id.as_ref(), generation, &roles);
        let current_role = role_id
            .as_ref()
            .and_then(|id| roles.iter().find(|role| role.id == *id))
            .cloned();

        AuthorizationSnapshot {
            role_id,
            current_role,
            grants,
            is_loading: false,
            is_error: error.is_some(),
            is_fetching,
            is_authenticated: true,
            error,
        }
    }

    pub fn can(&self, action: &str, subject: &str) -> bool {
        self.snapshot().can(action, subject)
    }

    pub fn is_admin_or_super_admin(&self) -> bool {
        self.snapshot().is_admin_or_super_admin()
    }

    /// A failed fetch for this identity is never fresh, so the next call retries
    fn is_fresh(&self, session: &SessionKey) -> bool {
        let state = self.state.read();
        if state.error.as_ref().is_some_and(|(key, _)| key == session) {
            return false;
        }
        state.snapshot.as_ref().is_some_and(|snapshot| {
            snapshot.session == *session
                && !snapshot.invalidated
                && snapshot.fetched_at.elapsed() < self.settings.stale_after
        })
    }

    fn clear(&self) {
        let mut state = self.state.write();
        state.snapshot = None;
        state.error = None;
        *self.derived.lock() = None;
    }

    /// Caller holds the fetch gate
    async fn fetch_locked(&self) -> Result<FetchOutcome, RbacError> {
        let Some(session) = self.identity.current_identity().session_key() else {
            self.clear();
            return Ok(FetchOutcome::Unauthenticated);
        };

        debug!(session = %session, "Fetching role graph");
        let result = fetch_role_graph(
            self.repository.as_ref(),
            self.settings.page_size,
            self.settings.max_roles,
        )
        .await;

        if self.identity.current_identity().session_key().as_ref() != Some(&session) {
            info!(session = %session, "Identity changed during role graph fetch, discarding result");
            return Ok(FetchOutcome::Discarded);
        }

        let mut state = self.state.write();
        match result {
            Ok(roles) => {
                state.generation = state.generation.wrapping_add(1);
                debug!(roles = roles.len(), generation = state.generation, "Role graph stored");
                state.snapshot = Some(RoleSnapshot {
                    session,
                    roles: Arc::new(roles),
                    fetched_at: Instant::now(),
                    generation: state.generation,
                    invalidated: false,
                });
                state.error = None;
                Ok(FetchOutcome::Fetched)
            }
            Err(err) => {
                warn!(error = %err, "Role graph fetch failed");
                state.error = Some((session, err.to_string()));
                Err(err)
            }
        }
    }

    fn effective_grants(
        &self,
        session: &SessionKey,
        role_id: Option<&RoleId>,
        generation: u64,
        roles: &[Role],
    ) -> Arc<[Grant]> {
        let mut derived = self.derived.lock();
        if let Some(cached) = derived.as_ref() {
            if cached.session == *session
                && cached.generation == generation
                && cached.role_id.as_ref() == role_id
            {
                return Arc::clone(&cached.grants);
            }
        }

        let grants: Arc<[Grant]> = resolve_effective_grants(role_id, roles).into();
        *derived = Some(Derived {
            session: session.clone(),
            role_id: role_id.cloned(),
            generation,
            grants: Arc::clone(&grants),
        });
        grants
    }
}

/// Point-in-time authorization state for one identity.
///
/// `can` fails closed: it is `false` whenever grants are not resolved.
/// Use [`decide`](Self::decide) to tell "not yet" from "no".
#[derive(Debug, Clone)]
pub struct AuthorizationSnapshot {
    pub role_id: Option<RoleId>,
    pub current_role: Option<Role>,
    grants: Arc<[Grant]>,
    pub is_loading: bool,
    pub is_error: bool,
    pub is_fetching: bool,
    pub is_authenticated: bool,
    pub error: Option<String>,
}

impl AuthorizationSnapshot {
    pub fn unauthenticated() -> Self {
        Self {
            role_id: None,
            current_role: None,
            grants: Arc::from(Vec::new()),
            is_loading: false,
            is_error: false,
            is_fetching: false,
            is_authenticated: false,
            error: None,
        }
    }

    /// Authenticated, role graph not read yet
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            is_authenticated: true,
            ..Self::unauthenticated()
        }
    }

    /// Authenticated, role graph read failed
    pub fn failed(message: &str) -> Self {
        Self {
            is_error: true,
            is_authenticated: true,
            error: Some(message.to_string()),
            ..Self::unauthenticated()
        }
    }

    /// Authenticated with a resolved grant set
    pub fn resolved(role_id: Option<RoleId>, grants: Vec<Grant>) -> Self {
        Self {
            role_id,
            grants: grants.into(),
            is_authenticated: true,
            ..Self::unauthenticated()
        }
    }

    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }

    /// Grants are usable for decisions
    pub fn is_resolved(&self) -> bool {
        self.is_authenticated && !self.is_loading && !self.is_error
    }

    pub fn can(&self, action: &str, subject: &str) -> bool {
        self.is_resolved() && check::can_with_grants(&self.grants, action, subject)
    }

    pub fn decide(&self, action: &str, subject: &str) -> AccessDecision {
        if !self.is_authenticated {
            AccessDecision::Denied
        } else if !self.is_resolved() {
            AccessDecision::Pending
        } else if check::can_with_grants(&self.grants, action, subject) {
            AccessDecision::Allowed
        } else {
            AccessDecision::Denied
        }
    }

    pub fn is_admin_or_super_admin(&self) -> bool {
        self.can(MANAGE, ALL)
    }

    pub fn batch_check(&self, checks: &[PermissionCheck]) -> Vec<CheckResponse> {
        if !self.is_resolved() {
            return checks
                .iter()
                .map(|_| CheckResponse {
                    allowed: false,
                    matched_grant: None,
                })
                .collect();
        }
        check::batch_check(&self.grants, checks)
    }
}
