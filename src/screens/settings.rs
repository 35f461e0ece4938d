use serde_json::Value;

use crate::client::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::gate::{Affordance, ViewGate};
use crate::guard::Admission;

use super::{require, settle};

pub const CURRENCIES: [&str; 5] = ["INR", "USD", "EUR", "GBP", "JPY"];

/// `/management/settings`. The settings document is kept as JSON; only the
/// currency is checked on this side.
#[derive(Debug, Default)]
pub struct SettingsScreen {
    pub settings: Option<Value>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl SettingsScreen {
    pub async fn load(&mut self, api: &ApiClient, admission: &Admission) -> AppResult<bool> {
        let result = api.get::<Value>(admission, "/settings").await;
        match settle(result, &mut self.error, "Failed to load store settings")? {
            Some(settings) => {
                self.settings = Some(settings);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn save(&mut self, api: &ApiClient, admission: &Admission, gate: &ViewGate, settings: Value) -> AppResult<bool> {
        require(gate, Affordance::StoreSettings)?;
        if let Some(currency) = settings.get("currency").and_then(Value::as_str) {
            if !CURRENCIES.contains(&currency) {
                return Err(AppError::invalid_input(format!("unsupported currency {currency}")));
            }
        }

        let result = api.put::<_, Value>(admission, "/settings", &settings).await;
        match settle(result, &mut self.error, "Failed to save store settings")? {
            Some(saved) => {
                self.settings = Some(saved);
                self.notice = Some("Store settings updated successfully!".to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
