//! HTTP role store against a mock CMS

use auth_identity::{AuthState, AuthUser};
use auth_rbac::*;
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn identity(token: Option<&str>) -> Arc<AuthState> {
    Arc::new(AuthState::new(
        token.map(str::to_string),
        Some(AuthUser::new("u-1").with_role_id("r-editor")),
    ))
}

fn repository(server: &Server, token: Option<&str>) -> HttpRoleRepository {
    HttpRoleRepository::new(
        &format!("{}/api", server.url()),
        Duration::from_secs(5),
        identity(token),
    )
    .unwrap()
}

fn page_query(page: u32, limit: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("page".into(), page.to_string()),
        Matcher::UrlEncoded("limit".into(), limit.to_string()),
    ])
}

#[tokio::test]
async fn test_list_roles_sends_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/roles")
        .match_query(page_query(1, 50))
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "items": [
                    { "id": "r-editor", "name": "Editor", "permissions": { "grants": [{ "action": "update", "subject": "screen" }], "inherits": ["r-viewer"] } }
                ],
                "total": 1,
                "page": 1,
                "limit": 50
            })
            .to_string(),
        )
        .create_async()
        .await;

    let page = repository(&server, Some("tok-123"))
        .list_roles(&RoleListParams::page(1, 50))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(page.total, Some(1));
    assert_eq!(page.items[0].inherits(), &[RoleId::from("r-viewer")]);
}

#[tokio::test]
async fn test_list_roles_passes_search() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/roles")
        .match_query(Matcher::UrlEncoded("search".into(), "admin".into()))
        .with_status(200)
        .with_body(r#"{"items":[],"total":0}"#)
        .create_async()
        .await;

    let page = repository(&server, None)
        .list_roles(&RoleListParams::page(1, 10).with_search("admin"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn test_anonymous_requests_carry_no_authorization() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/roles/r-1")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(r#"{"id":"r-1","name":"Viewer","permissions":null}"#)
        .create_async()
        .await;

    let role = repository(&server, None)
        .get_role_by_id(&RoleId::from("r-1"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(role.grants().is_empty());
}

#[tokio::test]
async fn test_fetch_role_graph_follows_pages() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/api/v1/roles")
        .match_query(page_query(1, 2))
        .with_status(200)
        .with_body(
            json!({
                "items": [
                    { "id": "a", "name": "A", "permissions": { "grants": [], "inherits": ["c"] } },
                    { "id": "b", "name": "B" }
                ],
                "total": 3
            })
            .to_string(),
        )
        .create_async()
        .await;
    let second = server
        .mock("GET", "/api/v1/roles")
        .match_query(page_query(2, 2))
        .with_status(200)
        .with_body(
            json!({
                "items": [
                    { "id": "c", "name": "C", "permissions": { "grants": [{ "action": "read", "subject": "media" }] } }
                ],
                "total": 3
            })
            .to_string(),
        )
        .create_async()
        .await;

    let repo = repository(&server, Some("tok"));
    let roles = fetch_role_graph(&repo, 2, 100).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(roles.len(), 3);

    // A role on page one inheriting a role from page two still resolves
    let grants = resolve_effective_grants(Some(&RoleId::from("a")), &roles);
    assert_eq!(grants, vec![Grant::new("read", "media")]);
}

#[tokio::test]
async fn test_missing_role_maps_to_not_found() {
    let mut server = Server::new_async().await;
    let _missing = server
        .mock("GET", "/api/v1/roles/ghost")
        .with_status(404)
        .create_async()
        .await;

    let result = repository(&server, Some("tok"))
        .get_role_by_id(&RoleId::from("ghost"))
        .await;
    assert!(matches!(result, Err(RbacError::RoleNotFound(id)) if id.as_str() == "ghost"));
}

#[tokio::test]
async fn test_server_error_and_bad_body() {
    let mut server = Server::new_async().await;
    let _unavailable = server
        .mock("GET", "/api/v1/roles")
        .match_query(page_query(1, 100))
        .with_status(503)
        .with_body("maintenance")
        .create_async()
        .await;
    let _html = server
        .mock("GET", "/api/v1/roles/r-1")
        .with_status(200)
        .with_body("<html>login</html>")
        .create_async()
        .await;

    let repo = repository(&server, Some("tok"));
    assert!(matches!(
        repo.list_roles(&RoleListParams::default()).await,
        Err(RbacError::RoleStoreError(msg)) if msg.contains("503")
    ));
    assert!(matches!(
        repo.get_role_by_id(&RoleId::from("r-1")).await,
        Err(RbacError::DecodeError(_))
    ));
}

#[tokio::test]
async fn test_role_mutations() {
    let mut server = Server::new_async().await;
    let create = server
        .mock("POST", "/api/v1/roles")
        .match_body(Matcher::PartialJson(json!({
            "name": "Scheduler",
            "permissions": { "grants": [{ "action": "update", "subject": "schedule" }], "inherits": [] }
        })))
        .with_status(201)
        .with_body(r#"{"id":"r-new","name":"Scheduler","permissions":{"grants":[{"action":"update","subject":"schedule"}],"inherits":[]}}"#)
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/api/v1/roles/r-new")
        .with_status(200)
        .with_body(r#"{"id":"r-new","name":"Scheduler 2"}"#)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/api/v1/roles/r-new")
        .with_status(204)
        .create_async()
        .await;

    let repo = repository(&server, Some("tok"));
    let created = repo
        .create_role(RoleDraft::new("Scheduler").with_grant("update", "schedule"))
        .await
        .unwrap();
    assert_eq!(created.id, RoleId::from("r-new"));

    let updated = repo
        .update_role(&created.id, RoleDraft::new("Scheduler 2"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Scheduler 2");

    repo.delete_role(&created.id).await.unwrap();

    create.assert_async().await;
    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_store_is_transport_error() {
    let repo = HttpRoleRepository::new(
        "http://127.0.0.1:9/api",
        Duration::from_millis(500),
        identity(Some("tok")),
    )
    .unwrap();

    assert!(matches!(
        repo.list_roles(&RoleListParams::default()).await,
        Err(RbacError::TransportError(_))
    ));
}

#[test]
fn test_rejects_malformed_base_url() {
    assert!(HttpRoleRepository::new("not a url", Duration::from_secs(1), identity(None)).is_err());
}
