use reqwest::StatusCode;

pub type AppResult<T> = Result<T, AppError>;

/// A role string that is not one of the four known roles.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0:?}")]
pub struct UnknownRoleError(pub String);

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("authorization denied: {0}")]
    AuthorizationDenied(String),
    #[error(transparent)]
    UnknownRole(#[from] UnknownRoleError),
    #[error("session expired")]
    SessionExpired,
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("api error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("network error")]
    Network(#[from] reqwest::Error),
    #[error("storage error")]
    Storage(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self::AuthorizationDenied(message.into())
    }

    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// True for outcomes that concern identity or access rather than the data
    /// a screen asked for. Screens show the latter inline and must not treat
    /// them as a reason to leave.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AppError::Authentication(_)
                | AppError::AuthorizationDenied(_)
                | AppError::UnknownRole(_)
                | AppError::SessionExpired
                | AppError::NotAuthenticated
        )
    }

    /// Short message suitable for showing next to a form or table.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Authentication(_) => "Invalid credentials. Please try again.".to_string(),
            AppError::AuthorizationDenied(_) => "You don't have permission to do that.".to_string(),
            AppError::UnknownRole(_) => "Your account has an unrecognized role.".to_string(),
            AppError::SessionExpired => "Your session has expired. Please log in again.".to_string(),
            AppError::NotAuthenticated => "Please log in.".to_string(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}
