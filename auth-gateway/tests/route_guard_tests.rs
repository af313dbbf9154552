//! Guards driven by a live authorization context

use auth_gateway::*;
use auth_identity::{AuthSession, AuthUser};
use auth_rbac::{AuthorizationContext, ContextSettings, InMemoryRoleRepository, Role};
use std::sync::Arc;

const ROUTES: &str = r"
routes:
  - prefix: /
  - prefix: /screens
    required:
      - { action: read, subject: screen }
  - prefix: /emergency
    allowed_roles: [Super Admin]
    required:
      - { action: publish, subject: emergency }
  - prefix: /users
    mode: all
    required:
      - { action: read, subject: user }
      - { action: update, subject: user }
";

fn setup() -> (Arc<AuthSession>, AuthorizationContext, RouteTable) {
    let repository = Arc::new(InMemoryRoleRepository::with_roles(vec![
        Role::new("r-super", "Super Admin").with_grant("manage", "all"),
        Role::new("r-viewer", "Viewer").with_grant("read", "screen"),
        Role::new("r-support", "Support")
            .with_grant("read", "user")
            .inheriting("r-viewer"),
    ]));
    let session = Arc::new(AuthSession::new());
    let context = AuthorizationContext::new(repository, session.clone(), ContextSettings::default());
    (session, context, RouteTable::from_yaml_str(ROUTES).unwrap())
}

#[tokio::test]
async fn test_viewer_navigation() {
    let (session, context, routes) = setup();
    let guard = RouteGuard::default();
    session.set_credentials("tok", AuthUser::new("u-1").with_role_id("r-viewer"));

    let screens = routes.policy_for("/screens/3").unwrap();
    assert_eq!(guard.check(&context, screens, "/screens/3"), GuardOutcome::Suspend);
    assert_eq!(guard.authorize(&context, screens, "/screens/3").await, GuardOutcome::Render);

    let emergency = routes.policy_for("/emergency").unwrap();
    assert_eq!(
        guard.authorize(&context, emergency, "/emergency").await,
        GuardOutcome::Redirect(Redirect::Landing {
            path: DEFAULT_LANDING_PATH.to_string()
        })
    );

    let home = routes.policy_for("/").unwrap();
    assert_eq!(guard.check(&context, home, "/"), GuardOutcome::Render);
}

#[tokio::test]
async fn test_super_admin_fast_path_before_fetch() {
    let (session, context, routes) = setup();
    let guard = RouteGuard::default();
    session.set_credentials("tok", AuthUser::new("u-9").with_role_name("Super Admin"));

    let emergency = routes.policy_for("/emergency/broadcast").unwrap();
    assert_eq!(guard.check(&context, emergency, "/emergency/broadcast"), GuardOutcome::Render);
    assert!(context.roles().is_none());
}

#[tokio::test]
async fn test_all_mode_on_user_admin() {
    let (session, context, routes) = setup();
    let guard = RouteGuard::default();
    let users = routes.policy_for("/users/42").unwrap();

    session.set_credentials("tok-s", AuthUser::new("u-s").with_role_name("Support"));
    assert!(matches!(
        guard.authorize(&context, users, "/users/42").await,
        GuardOutcome::Redirect(Redirect::Landing { .. })
    ));

    session.set_credentials("tok-a", AuthUser::new("u-a").with_role_id("r-super"));
    assert_eq!(guard.authorize(&context, users, "/users/42").await, GuardOutcome::Render);
}

#[tokio::test]
async fn test_signed_out_operator_is_sent_to_login() {
    let (session, context, routes) = setup();
    let guard = RouteGuard::default();
    session.set_credentials("tok", AuthUser::new("u-1").with_role_id("r-viewer"));
    session.logout();

    let screens = routes.policy_for("/screens").unwrap();
    assert_eq!(
        guard.authorize(&context, screens, "/screens").await,
        GuardOutcome::Redirect(Redirect::Login {
            path: DEFAULT_LOGIN_PATH.to_string(),
            return_to: "/screens".to_string(),
        })
    );
}
