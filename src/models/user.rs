use serde::{Deserialize, Serialize};

use crate::models::rbac::Role;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of a successful `POST /auth/login`.
///
/// `staff.role` stays a raw string here; it becomes a [`Role`] only once the
/// session store has checked it.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    pub staff: StaffProfile,
}

/// Identity fields the console keeps from the login payload. This is also what
/// gets persisted under the `user` storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub username: String,
    pub role: String,
}

/// A row of the staff management table. `role` is kept as sent so one row
/// with an unrecognized role does not sink the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: i64,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub shift: Option<String>,
    #[serde(default)]
    pub store_location: Option<String>,
    #[serde(default)]
    pub training_level: Option<u8>,
}

impl StaffMember {
    /// The row's role, or `None` when the backend sent something unknown.
    pub fn known_role(&self) -> Option<Role> {
        self.role.parse().ok()
    }
}

/// Create/update body for `/staff`. An empty password is left out on update so
/// the backend keeps the current one.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffForm {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role: Role,
    pub shift: String,
    pub store_location: String,
    pub training_level: u8,
}

impl Default for StaffForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: None,
            role: Role::Barista,
            shift: "morning".to_string(),
            store_location: "bengaluru".to_string(),
            training_level: 1,
        }
    }
}
