use crate::models::{AuthState, AuthUser, LoginResponse};
use logger_redacted::SecretRedactor;
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info};

/// Read access to the current authenticated identity
pub trait IdentityProvider: Send + Sync {
    fn current_identity(&self) -> AuthState;
}

/// A fixed identity, for tools and tests
impl IdentityProvider for AuthState {
    fn current_identity(&self) -> AuthState {
        self.clone()
    }
}

/// Holds the signed-in identity and notifies subscribers when it changes
pub struct AuthSession {
    state: RwLock<AuthState>,
    changes: watch::Sender<AuthState>,
    redactor: SecretRedactor,
}

impl AuthSession {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(AuthState::anonymous());
        Self {
            state: RwLock::new(AuthState::anonymous()),
            changes,
            redactor: SecretRedactor::default(),
        }
    }

    /// Store the token and user returned by a successful login
    pub fn set_credentials(&self, token: &str, user: AuthUser) {
        self.replace(AuthState::new(Some(token.to_string()), Some(user)));
    }

    pub fn login(&self, response: LoginResponse) {
        self.replace(AuthState::from(response));
    }

    /// Replace the user record, keeping the token
    pub fn update_user(&self, user: AuthUser) {
        let token = self.state.read().bearer_token().map(str::to_string);
        self.replace(AuthState::new(token, Some(user)));
    }

    pub fn logout(&self) {
        info!("Session cleared");
        self.replace(AuthState::anonymous());
    }

    /// Receive every identity change from now on
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.changes.subscribe()
    }

    fn replace(&self, next: AuthState) {
        if let Some(user) = next.user() {
            let email = user.email.as_deref().unwrap_or("-");
            debug!(
                user_id = %user.id,
                email = %self.redactor.redact(email),
                role_id = ?next.role_id(),
                role = ?next.role_name(),
                "Identity changed"
            );
        }
        *self.state.write() = next.clone();
        self.changes.send_replace(next);
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for AuthSession {
    fn current_identity(&self) -> AuthState {
        self.state.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_and_logout() {
        let session = AuthSession::new();
        session.set_credentials("t1", AuthUser::new("u1").with_role_id("r-admin"));

        let identity = session.current_identity();
        assert!(identity.is_authenticated());
        assert_eq!(identity.role_id(), Some("r-admin"));

        session.logout();
        assert!(!session.current_identity().is_authenticated());
    }

    #[test]
    fn test_update_user_keeps_token() {
        let session = AuthSession::new();
        session.set_credentials("t1", AuthUser::new("u1"));
        session.update_user(AuthUser::new("u1").with_role_name("Editor"));

        let identity = session.current_identity();
        assert_eq!(identity.bearer_token(), Some("t1"));
        assert_eq!(identity.role_name(), Some("Editor"));
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let session = AuthSession::new();
        let mut changes = session.subscribe();

        session.set_credentials("t1", AuthUser::new("u7"));
        changes.changed().await.unwrap();
        assert_eq!(
            changes.borrow().user().map(|u| u.id.clone()),
            Some("u7".to_string())
        );
    }
}
