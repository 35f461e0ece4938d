use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";
pub const DEFAULT_SESSION_DIR: &str = ".brew-console";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL of the backend API, without a trailing slash.
    pub api_url: String,
    /// Directory holding the persisted `token` and `user` entries.
    pub session_dir: PathBuf,
    pub http_timeout: Duration,
}

impl ConsoleConfig {
    pub fn new(api_url: impl Into<String>, session_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            session_dir: session_dir.into(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self, AppError> {
        let api_url = std::env::var("CONSOLE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let session_dir = std::env::var("CONSOLE_SESSION_DIR").unwrap_or_else(|_| DEFAULT_SESSION_DIR.to_string());
        let timeout_secs = std::env::var("CONSOLE_HTTP_TIMEOUT_SECS")
            .map(|val| val.parse::<u64>())
            .unwrap_or(Ok(DEFAULT_HTTP_TIMEOUT_SECS))
            .map_err(|_| AppError::configuration("CONSOLE_HTTP_TIMEOUT_SECS must be a valid integer"))?;

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(AppError::configuration(format!(
                "CONSOLE_API_URL must be an http(s) URL, got {api_url}"
            )));
        }

        Ok(Self {
            api_url: normalize_url(api_url),
            session_dir: PathBuf::from(session_dir),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Joins an API path such as `/products` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn normalize_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
