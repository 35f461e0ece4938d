use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, UnknownRoleError};

// =============================================================================
// ROLE
// =============================================================================

/// Staff role as issued by the backend. Anything else is rejected at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Owner,
    StoreManager,
    ShiftManager,
    Barista,
}

impl Role {
    /// Highest to lowest privilege.
    pub const ALL: [Role; 4] = [
        Role::Owner,
        Role::StoreManager,
        Role::ShiftManager,
        Role::Barista,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::StoreManager => "store_manager",
            Role::ShiftManager => "shift_manager",
            Role::Barista => "barista",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == value)
            .ok_or_else(|| UnknownRoleError(value.to_string()))
    }
}

pub type RoleSet = BTreeSet<Role>;

// =============================================================================
// PERMISSION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ManageProducts,
    UpdateProducts,
    UpdateAvailability,
    ManagePrices,
    ManageInventory,
    ViewReports,
    ManageStaff,
    ManageStore,
}

impl Permission {
    pub const ALL: [Permission; 8] = [
        Permission::ManageProducts,
        Permission::UpdateProducts,
        Permission::UpdateAvailability,
        Permission::ManagePrices,
        Permission::ManageInventory,
        Permission::ViewReports,
        Permission::ManageStaff,
        Permission::ManageStore,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ManageProducts => "manage_products",
            Permission::UpdateProducts => "update_products",
            Permission::UpdateAvailability => "update_availability",
            Permission::ManagePrices => "manage_prices",
            Permission::ManageInventory => "manage_inventory",
            Permission::ViewReports => "view_reports",
            Permission::ManageStaff => "manage_staff",
            Permission::ManageStore => "manage_store",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .into_iter()
            .find(|perm| perm.as_str() == value)
            .ok_or_else(|| AppError::invalid_input(format!("unknown permission: {value}")))
    }
}

pub type PermissionSet = BTreeSet<Permission>;
