use crate::client::ApiClient;
use crate::errors::{AppError, AppResult};
use crate::gate::{Affordance, ViewGate};
use crate::guard::Admission;
use crate::models::inventory::FieldErrors;
use crate::models::rbac::Role;
use crate::models::user::{StaffForm, StaffMember};

use super::{reject_invalid, require, settle};

pub const SHIFTS: [&str; 4] = ["morning", "afternoon", "evening", "night"];
pub const LOCATIONS: [&str; 4] = ["bengaluru", "mall", "downtown", "campus"];

/// `/management/staff`
#[derive(Debug, Default)]
pub struct StaffScreen {
    pub members: Vec<StaffMember>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl StaffScreen {
    pub fn role_options() -> [Role; 4] {
        Role::ALL
    }

    pub async fn load(&mut self, api: &ApiClient, admission: &Admission) -> AppResult<bool> {
        let result = api.get::<Vec<StaffMember>>(admission, "/staff").await;
        match settle(result, &mut self.error, "Failed to load staff")? {
            Some(members) => {
                self.members = members;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Staff managers may change anyone's role except their own.
    pub fn can_change_role(gate: &ViewGate, member: &StaffMember) -> bool {
        gate.shows(Affordance::ManageStaff) && !is_self(gate, member)
    }

    /// Staff managers may remove anyone but themselves.
    pub fn can_delete(gate: &ViewGate, member: &StaffMember) -> bool {
        gate.shows(Affordance::ManageStaff) && !is_self(gate, member)
    }

    pub fn validate(form: &StaffForm, creating: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if form.username.trim().is_empty() {
            errors.insert("username", "Username is required");
        }
        if creating && form.password.as_deref().map_or(true, |p| p.trim().is_empty()) {
            errors.insert("password", "Password is required for new staff");
        }
        if !SHIFTS.contains(&form.shift.as_str()) {
            errors.insert("shift", "Unknown shift");
        }
        if !LOCATIONS.contains(&form.store_location.as_str()) {
            errors.insert("storeLocation", "Unknown store location");
        }
        errors
    }

    pub async fn create(
        &mut self,
        api: &ApiClient,
        admission: &Admission,
        gate: &ViewGate,
        form: &StaffForm,
    ) -> AppResult<bool> {
        require(gate, Affordance::ManageStaff)?;
        reject_invalid(Self::validate(form, true))?;

        let result = api.post::<_, StaffMember>(admission, "/staff", form).await;
        match settle(result, &mut self.error, "Failed to add staff member")? {
            Some(member) => {
                self.members.push(member);
                self.notice = Some("Staff member added successfully!".to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn update(
        &mut self,
        api: &ApiClient,
        admission: &Admission,
        gate: &ViewGate,
        staff_id: i64,
        form: &StaffForm,
    ) -> AppResult<bool> {
        require(gate, Affordance::ManageStaff)?;
        reject_invalid(Self::validate(form, false))?;

        let member = self
            .members
            .iter()
            .find(|member| member.id == staff_id)
            .ok_or_else(|| AppError::invalid_input(format!("staff member {staff_id} is not listed")))?;
        if member.known_role() != Some(form.role) && !Self::can_change_role(gate, member) {
            return Err(AppError::denied("you cannot change your own role"));
        }

        let mut body = form.clone();
        body.password = body.password.filter(|p| !p.trim().is_empty());

        let result = api.put::<_, StaffMember>(admission, &format!("/staff/{staff_id}"), &body).await;
        match settle(result, &mut self.error, "Failed to update staff member")? {
            Some(updated) => {
                if let Some(slot) = self.members.iter_mut().find(|member| member.id == staff_id) {
                    *slot = updated;
                }
                self.notice = Some("Staff member updated successfully!".to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn delete(
        &mut self,
        api: &ApiClient,
        admission: &Admission,
        gate: &ViewGate,
        staff_id: i64,
    ) -> AppResult<bool> {
        require(gate, Affordance::ManageStaff)?;
        let member = self
            .members
            .iter()
            .find(|member| member.id == staff_id)
            .ok_or_else(|| AppError::invalid_input(format!("staff member {staff_id} is not listed")))?;
        if !Self::can_delete(gate, member) {
            return Err(AppError::denied("you cannot delete your own account"));
        }

        let result = api.delete(admission, &format!("/staff/{staff_id}")).await;
        if settle(result, &mut self.error, "Failed to delete staff member")?.is_none() {
            return Ok(false);
        }
        self.members.retain(|member| member.id != staff_id);
        self.notice = Some("Staff member deleted successfully!".to_string());
        Ok(true)
    }
}

/// Whether `member` is the signed-in actor. No session counts as "self" so
/// nothing is offered.
fn is_self(gate: &ViewGate, member: &StaffMember) -> bool {
    match gate.session() {
        Some(session) => match session.staff_id {
            Some(id) => id == member.id,
            None => session.username == member.username,
        },
        None => true,
    }
}
