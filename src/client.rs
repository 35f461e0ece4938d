//! HTTP client for the console's REST calls

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ConsoleConfig;
use crate::errors::{AppError, AppResult};
use crate::guard::Admission;
use crate::session::SessionStore;

/// Thin request wrapper: bearer token from the admission's session, implicit
/// sign-out on 401/403, and no response ever outlives the session it was
/// requested under.
///
/// Every method returns `Ok(None)` when the session changed while the request
/// was in flight. Callers must then leave their state alone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: Arc<ConsoleConfig>,
    sessions: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: Arc<ConsoleConfig>, sessions: Arc<SessionStore>) -> AppResult<Self> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            http,
            config,
            sessions,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, admission: &Admission, path: &str) -> AppResult<Option<T>> {
        self.json(admission, Method::GET, path, None::<&()>).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        admission: &Admission,
        path: &str,
        body: &B,
    ) -> AppResult<Option<T>> {
        self.json(admission, Method::POST, path, Some(body)).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        admission: &Admission,
        path: &str,
        body: &B,
    ) -> AppResult<Option<T>> {
        self.json(admission, Method::PUT, path, Some(body)).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        admission: &Admission,
        path: &str,
        body: &B,
    ) -> AppResult<Option<T>> {
        self.json(admission, Method::PATCH, path, Some(body)).await
    }

    /// Mutation whose response body is ignored.
    pub async fn send<B: Serialize>(
        &self,
        admission: &Admission,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<Option<()>> {
        Ok(self.execute(admission, method, path, body).await?.map(|_| ()))
    }

    pub async fn delete(&self, admission: &Admission, path: &str) -> AppResult<Option<()>> {
        self.send(admission, Method::DELETE, path, None::<&()>).await
    }

    async fn json<B: Serialize, T: DeserializeOwned>(
        &self,
        admission: &Admission,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<Option<T>> {
        let Some(bytes) = self.execute(admission, method, path, body).await? else {
            return Ok(None);
        };

        let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);
        serde_path_to_error::deserialize(deserializer)
            .map(Some)
            .map_err(|err| AppError::decode(format!("{path}: `{}`: {}", err.path(), err.inner())))
    }

    async fn execute<B: Serialize>(
        &self,
        admission: &Admission,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> AppResult<Option<Vec<u8>>> {
        let session = admission.session()?;

        if self.sessions.epoch() != admission.epoch {
            tracing::debug!(path, "admission predates current session, request dropped");
            return Ok(None);
        }

        if session.is_expired() {
            self.sessions.expire(admission.epoch);
            return Err(AppError::SessionExpired);
        }

        let url = self.config.endpoint(path);
        let mut request = self.http.request(method.clone(), &url).bearer_auth(&session.token);
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, username = %session.username, "api request");
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if self.sessions.epoch() != admission.epoch {
            tracing::info!(%method, path, %status, "session changed while request was in flight, response discarded");
            return Ok(None);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(%method, path, %status, "token rejected by server");
            self.sessions.expire(admission.epoch);
            return Err(AppError::SessionExpired);
        }

        if !status.is_success() {
            return Err(AppError::api(status, error_message(status, &bytes)));
        }

        Ok(Some(bytes.to_vec()))
    }
}

/// Prefers the backend's `{"message": ...}` body, then the raw text.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            return message.to_string();
        }
    }
    let text = String::from_utf8_lossy(body).trim().to_string();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        text
    }
}
