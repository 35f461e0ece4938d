use async_trait::async_trait;
use reqwest::Client;

use crate::config::ConsoleConfig;
use crate::errors::{AppError, AppResult};
use crate::models::user::{LoginRequest, LoginResponse};

/// The backend's identity check. It is the only authority on credentials.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse>;
}

/// `POST {api_url}/auth/login`.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    http: Client,
    login_url: String,
}

impl HttpAuthenticator {
    pub fn new(config: &ConsoleConfig) -> AppResult<Self> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self::with_client(http, config))
    }

    pub fn with_client(http: Client, config: &ConsoleConfig) -> Self {
        Self {
            http,
            login_url: config.endpoint("/auth/login"),
        }
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn login(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        tracing::debug!(username = %request.username, url = %self.login_url, "attempting login");

        let response = self.http.post(&self.login_url).json(request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(username = %request.username, %status, body = %body, "login rejected");
            return Err(AppError::authentication(format!("server answered {status}")));
        }

        let bytes = response.bytes().await?;
        let deserializer = &mut serde_json::Deserializer::from_slice(&bytes);
        serde_path_to_error::deserialize(deserializer).map_err(|err| {
            AppError::decode(format!("login response at `{}`: {}", err.path(), err.inner()))
        })
    }
}
