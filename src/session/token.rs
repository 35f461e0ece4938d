use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, Validation};

/// Claims the console reads from a bearer token. Only `exp` matters here.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Reads the `exp` claim of a JWT without verifying its signature.
///
/// The backend is the one that validates tokens; this only lets the console
/// notice an expired session before sending a request. Opaque tokens yield
/// `None`.
pub fn expiry_of(token: &str) -> Option<DateTime<Utc>> {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    match jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation) {
        Ok(data) => data.claims.exp.and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0)),
        Err(err) => {
            tracing::debug!(error = %err, "token carries no readable expiry");
            None
        }
    }
}
