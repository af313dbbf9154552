use crate::policy::GuardPolicy;
use auth_identity::AuthState;
use auth_rbac::{AccessDecision, AuthorizationContext, AuthorizationSnapshot};
use tracing::{debug, warn};

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_LANDING_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Not signed in; come back to `return_to` after login
    Login { path: String, return_to: String },
    /// Signed in but not permitted here
    Landing { path: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Render,
    /// Grants are still resolving; show nothing rather than a denial
    Suspend,
    Redirect(Redirect),
}

/// Decides what a guarded console region does for the current operator
#[derive(Debug, Clone)]
pub struct RouteGuard {
    login_path: String,
    landing_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_LOGIN_PATH, DEFAULT_LANDING_PATH)
    }
}

impl RouteGuard {
    pub fn new(login_path: &str, landing_path: &str) -> Self {
        Self {
            login_path: login_path.to_string(),
            landing_path: landing_path.to_string(),
        }
    }

    pub fn evaluate(
        &self,
        identity: &AuthState,
        authorization: &AuthorizationSnapshot,
        policy: &GuardPolicy,
        current_path: &str,
    ) -> GuardOutcome {
        if !identity.is_authenticated() {
            debug!(path = %current_path, "No identity, redirecting to login");
            return GuardOutcome::Redirect(Redirect::Login {
                path: self.login_path.clone(),
                return_to: current_path.to_string(),
            });
        }

        if policy.admits_role(identity.role_name()) {
            return GuardOutcome::Render;
        }

        if policy.required.is_empty() {
            return if policy.allowed_roles.is_empty() {
                GuardOutcome::Render
            } else {
                self.to_landing(current_path)
            };
        }

        let mut pending = false;
        let satisfied = policy.is_satisfied_by(|action, subject| {
            match authorization.decide(action, subject) {
                AccessDecision::Allowed => true,
                AccessDecision::Denied => false,
                AccessDecision::Pending => {
                    pending = true;
                    false
                }
            }
        });

        if pending {
            GuardOutcome::Suspend
        } else if satisfied {
            GuardOutcome::Render
        } else {
            self.to_landing(current_path)
        }
    }

    /// Evaluate against the context's current state without fetching
    pub fn check(
        &self,
        context: &AuthorizationContext,
        policy: &GuardPolicy,
        current_path: &str,
    ) -> GuardOutcome {
        self.evaluate(&context.identity(), &context.snapshot(), policy, current_path)
    }

    /// Like [`check`](Self::check), but loads the role graph first when the
    /// outcome depends on it
    pub async fn authorize(
        &self,
        context: &AuthorizationContext,
        policy: &GuardPolicy,
        current_path: &str,
    ) -> GuardOutcome {
        let outcome = self.check(context, policy, current_path);
        if outcome != GuardOutcome::Suspend {
            return outcome;
        }

        if let Err(err) = context.ensure_fresh().await {
            warn!(path = %current_path, error = %err, "Role graph unavailable, region stays suspended");
        }
        self.check(context, policy, current_path)
    }

    fn to_landing(&self, current_path: &str) -> GuardOutcome {
        debug!(path = %current_path, landing = %self.landing_path, "Access denied, redirecting to landing");
        GuardOutcome::Redirect(Redirect::Landing {
            path: self.landing_path.clone(),
        })
    }
}
