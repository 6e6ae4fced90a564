//! HTTP implementation of [`AccountProvider`].
//!
//! Talks to the hosted identity backend's REST API. Requests authenticate
//! with a project id + server API key header pair; error responses carry a
//! JSON body with a `message` field that we inspect for the provider's
//! idempotency signal on session creation.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use super::{AccountProvider, ProviderError};
use crate::models::bridge::{LoginGrant, ProviderSession};

/// Header carrying the project id.
const PROJECT_HEADER: &str = "X-Identity-Project";
/// Header carrying the server API key.
const KEY_HEADER: &str = "X-Identity-Key";

/// Account provider backed by the identity backend's REST API.
pub struct HttpAccountProvider {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(rename = "userId")]
    user_id: String,
    secret: String,
}

#[derive(Deserialize)]
struct SessionResponse {
    id: String,
    #[serde(rename = "userId")]
    user_id: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl HttpAccountProvider {
    pub fn new(endpoint: &str, project_id: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    /// POST a JSON body and decode a JSON response, mapping provider errors.
    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, ProviderError> {
        let resp = self
            .client
            .post(self.url(path))
            .header(PROJECT_HEADER, &self.project_id)
            .header(KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Http(format!("request failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return resp
                .json::<T>()
                .await
                .map_err(|e| ProviderError::Unexpected(format!("response parse error: {e}")));
        }

        let text = resp.text().await.unwrap_or_default();
        debug!(%status, body = %text, "provider error response");
        Err(map_error_response(status, &text))
    }
}

/// Map a non-success provider response to a [`ProviderError`].
fn map_error_response(status: StatusCode, body: &str) -> ProviderError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_default();

    if message.to_lowercase().contains("session is active") {
        return ProviderError::SessionActive;
    }

    match status {
        StatusCode::NOT_FOUND => ProviderError::NotFound,
        StatusCode::CONFLICT => ProviderError::Conflict,
        StatusCode::UNAUTHORIZED => ProviderError::Unauthorized,
        _ => ProviderError::Http(format!("{status}: {message}")),
    }
}

#[async_trait]
impl AccountProvider for HttpAccountProvider {
    async fn create_login_token(&self, user_id: &str) -> Result<LoginGrant, ProviderError> {
        let resp: TokenResponse = self
            .post_json(
                &format!("/users/{user_id}/tokens"),
                serde_json::json!({}),
            )
            .await?;
        Ok(LoginGrant {
            user_id: resp.user_id,
            secret: resp.secret,
        })
    }

    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<(), ProviderError> {
        let _: serde_json::Value = self
            .post_json(
                "/users",
                serde_json::json!({
                    "userId": user_id,
                    "email": email,
                    "password": password,
                    "name": name,
                }),
            )
            .await?;
        Ok(())
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, ProviderError> {
        let resp: SessionResponse = self
            .post_json(
                "/sessions/email",
                serde_json::json!({ "email": email, "password": password }),
            )
            .await?;
        Ok(ProviderSession {
            id: resp.id,
            user_id: resp.user_id,
        })
    }

    async fn create_session(
        &self,
        user_id: &str,
        secret: &str,
    ) -> Result<ProviderSession, ProviderError> {
        let resp: SessionResponse = self
            .post_json(
                "/sessions/token",
                serde_json::json!({ "userId": user_id, "secret": secret }),
            )
            .await?;
        Ok(ProviderSession {
            id: resp.id,
            user_id: resp.user_id,
        })
    }

    async fn get_session(
        &self,
        session_id: &str,
    ) -> Result<Option<ProviderSession>, ProviderError> {
        let resp = self
            .client
            .get(self.url(&format!("/sessions/{session_id}")))
            .header(PROJECT_HEADER, &self.project_id)
            .header(KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Http(format!("request failed: {e}")))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(map_error_response(status, &text));
        }

        let session: SessionResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Unexpected(format!("response parse error: {e}")))?;
        Ok(Some(ProviderSession {
            id: session.id,
            user_id: session.user_id,
        }))
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), ProviderError> {
        let resp = self
            .client
            .delete(self.url(&format!("/sessions/{session_id}")))
            .header(PROJECT_HEADER, &self.project_id)
            .header(KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Http(format!("request failed: {e}")))?;

        let status = resp.status();
        // Already gone counts as deleted.
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(());
        }
        let text = resp.text().await.unwrap_or_default();
        Err(map_error_response(status, &text))
    }
}
