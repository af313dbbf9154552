use crate::{error::RbacError, models::*, repository::RoleRepository};
use async_trait::async_trait;
use auth_identity::IdentityProvider;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Role store backed by the CMS REST API (`{base}/v1/roles`)
///
/// Requests carry the current identity's bearer token, read per request so a
/// re-login is picked up without rebuilding the repository.
pub struct HttpRoleRepository {
    client: Client,
    base_url: Url,
    identity: Arc<dyn IdentityProvider>,
}

impl HttpRoleRepository {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        identity: Arc<dyn IdentityProvider>,
    ) -> Result<Self, RbacError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| RbacError::RoleStoreError(format!("invalid base url '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RbacError::RoleStoreError(format!(
                "base url '{}' cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RbacError::TransportError(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            identity,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RbacError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RbacError::RoleStoreError(format!("base url '{}' cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.client.request(method, url);
        match self.identity.current_identity().bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder, role: Option<&RoleId>) -> Result<Response, RbacError> {
        let response = request
            .send()
            .await
            .map_err(|e| RbacError::TransportError(e.to_string()))?;

        let status = response.status();
        debug!(url = %response.url().path(), status = status.as_u16(), "Role store response");

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = role {
                return Err(RbacError::RoleNotFound(id.clone()));
            }
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Role store request failed");
        Err(RbacError::RoleStoreError(format!(
            "role store returned {}: {}",
            status,
            body.chars().take(200).collect::<String>()
        )))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, RbacError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RbacError::TransportError(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| RbacError::DecodeError(e.to_string()))
    }
}

#[async_trait]
impl RoleRepository for HttpRoleRepository {
    async fn list_roles(&self, params: &RoleListParams) -> Result<RolePage, RbacError> {
        let url = self.endpoint(&["roles"])?;
        let response = self
            .send(self.request(Method::GET, url).query(params), None)
            .await?;
        Self::decode(response).await
    }

    async fn get_role_by_id(&self, id: &RoleId) -> Result<Role, RbacError> {
        let url = self.endpoint(&["roles", id.as_str()])?;
        let response = self.send(self.request(Method::GET, url), Some(id)).await?;
        Self::decode(response).await
    }

    async fn create_role(&self, draft: RoleDraft) -> Result<Role, RbacError> {
        let url = self.endpoint(&["roles"])?;
        let response = self
            .send(self.request(Method::POST, url).json(&draft), None)
            .await?;
        Self::decode(response).await
    }

    async fn update_role(&self, id: &RoleId, draft: RoleDraft) -> Result<Role, RbacError> {
        let url = self.endpoint(&["roles", id.as_str()])?;
        let response = self
            .send(self.request(Method::PUT, url).json(&draft), Some(id))
            .await?;
        Self::decode(response).await
    }

    async fn delete_role(&self, id: &RoleId) -> Result<(), RbacError> {
        let url = self.endpoint(&["roles", id.as_str()])?;
        self.send(self.request(Method::DELETE, url), Some(id)).await?;
        Ok(())
    }
}
