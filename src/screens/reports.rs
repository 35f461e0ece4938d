use serde_json::Value;

use crate::client::ApiClient;
use crate::errors::AppResult;
use crate::gate::{Affordance, ViewGate};
use crate::guard::Admission;

/// `/management/reports`
#[derive(Debug, Default)]
pub struct ReportsScreen {
    pub report: Option<Value>,
    pub error: Option<String>,
}

impl ReportsScreen {
    pub async fn load(&mut self, api: &ApiClient, admission: &Admission) -> AppResult<bool> {
        let result = api.get::<Value>(admission, "/products/reports/inventory").await;
        match super::settle(result, &mut self.error, "Failed to fetch report")? {
            Some(report) => {
                self.report = Some(report);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Banner shown above the report for the current session.
    pub fn access_note(gate: &ViewGate) -> Option<&'static str> {
        if gate.shows(Affordance::ExtendedReports) {
            Some("You have access to additional reports like sales reports and financial data.")
        } else if gate.shows(Affordance::ViewReports) {
            Some("Shift managers have limited report access.")
        } else {
            None
        }
    }
}
