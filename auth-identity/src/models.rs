use crate::error::{IdentityError, Result};
use logger_redacted::fingerprint;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// User record returned by the CMS login endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Explicit role identity, preferred for grant resolution
    #[serde(default)]
    pub role_id: Option<String>,
    /// Role name, used when no role id is present
    #[serde(default)]
    pub role: Option<String>,
}

impl AuthUser {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            email: None,
            name: None,
            role_id: None,
            role: None,
        }
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_role_id(mut self, role_id: &str) -> Self {
        self.role_id = Some(role_id.to_string());
        self
    }

    pub fn with_role_name(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }
}

/// Login response body: `{ "token": "...", "user": { ... } }`
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: AuthUser,
}

/// Identifies the identity a piece of derived state belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of the authentication state
///
/// "Authenticated" means a token or a user record is present.
#[derive(Clone, Default)]
pub struct AuthState {
    token: Option<Arc<SecretString>>,
    user: Option<AuthUser>,
}

impl AuthState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn new(token: Option<String>, user: Option<AuthUser>) -> Self {
        Self {
            token: token
                .filter(|t| !t.is_empty())
                .map(|t| Arc::new(SecretString::new(t))),
            user,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() || self.user.is_some()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    /// Explicit role id, ignoring empty strings
    pub fn role_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.role_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Literal role name, ignoring empty strings
    pub fn role_name(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.role.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// Raw token for the `Authorization` header
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.expose_secret().as_str())
    }

    /// Key for this sign-in: the user id plus a token fingerprint when a
    /// token is held, so signing out and back in yields a new key
    pub fn session_key(&self) -> Option<SessionKey> {
        let token = self.bearer_token().map(fingerprint);
        match (&self.user, token) {
            (Some(user), Some(token)) => Some(SessionKey(format!("user:{}:{token}", user.id))),
            (Some(user), None) => Some(SessionKey(format!("user:{}", user.id))),
            (None, Some(token)) => Some(SessionKey(format!("token:{token}"))),
            (None, None) => None,
        }
    }

    pub fn require_authenticated(&self) -> Result<&Self> {
        if self.is_authenticated() {
            Ok(self)
        } else {
            Err(IdentityError::NotAuthenticated)
        }
    }
}

impl From<LoginResponse> for AuthState {
    fn from(response: LoginResponse) -> Self {
        Self::new(Some(response.token), Some(response.user))
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user_id", &self.user.as_ref().map(|u| u.id.as_str()))
            .field("role_id", &self.role_id())
            .field("role", &self.role_name())
            .finish()
    }
}
