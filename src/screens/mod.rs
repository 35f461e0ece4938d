//! Screen state holders
//!
//! Each screen loads through an [`Admission`](crate::guard::Admission) and
//! the [`ApiClient`](crate::client::ApiClient). Data errors stay on the
//! screen as a message; authorization outcomes are returned to the caller,
//! which navigates away.

pub mod inventory;
pub mod products;
pub mod reports;
pub mod roles;
pub mod settings;
pub mod staff;

use crate::errors::{AppError, AppResult};
use crate::gate::{Affordance, ViewGate};
use crate::models::inventory::FieldErrors;

/// Splits a request result into "applied", "discarded" and "shown inline".
///
/// `Ok(Some(_))` means the caller should apply the value, `Ok(None)` that the
/// result must be dropped (stale or failed locally, with `error` set in the
/// latter case). Auth failures pass through as `Err`.
fn settle<T>(result: AppResult<Option<T>>, error: &mut Option<String>, context: &str) -> AppResult<Option<T>> {
    match result {
        Ok(Some(value)) => {
            *error = None;
            Ok(Some(value))
        }
        Ok(None) => Ok(None),
        Err(err) if err.is_auth_failure() => Err(err),
        Err(err) => {
            tracing::warn!(error = %err, "{context}");
            *error = Some(format!("{context}. {}", err.user_message()));
            Ok(None)
        }
    }
}

/// Refuses an action whose affordance the gate would not have rendered.
fn require(gate: &ViewGate, affordance: Affordance) -> AppResult<()> {
    if gate.shows(affordance) {
        Ok(())
    } else {
        Err(AppError::denied(format!("{affordance:?} is not available to this session")))
    }
}

fn reject_invalid(errors: FieldErrors) -> AppResult<()> {
    if errors.is_empty() {
        return Ok(());
    }
    let summary: Vec<String> = errors.iter().map(|(field, msg)| format!("{field}: {msg}")).collect();
    Err(AppError::invalid_input(summary.join("; ")))
}
