use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;

use crate::errors::{AppError, UnknownRoleError};
use crate::models::rbac::{Permission, PermissionSet, Role};

use Permission::*;

/// Role policy table. Owner's reach is spelled out here like everyone else's.
const POLICY: &[(Role, &[Permission])] = &[
    (
        Role::Owner,
        &[
            ManageProducts,
            UpdateProducts,
            UpdateAvailability,
            ManageStaff,
            ManagePrices,
            ManageInventory,
            ViewReports,
            ManageStore,
        ],
    ),
    (
        Role::StoreManager,
        &[
            ManageProducts,
            UpdateProducts,
            UpdateAvailability,
            ManagePrices,
            ManageInventory,
            ViewReports,
        ],
    ),
    (
        Role::ShiftManager,
        &[UpdateAvailability, UpdateProducts, ManageInventory, ViewReports],
    ),
    (Role::Barista, &[UpdateAvailability]),
];

#[derive(Debug, Clone, Serialize)]
pub struct RoleDescription {
    pub label: &'static str,
    pub description: &'static str,
    pub capabilities: &'static [&'static str],
}

/// Static mapping from each role to the permissions it grants.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    grants: BTreeMap<Role, PermissionSet>,
}

impl RoleRegistry {
    /// The process-wide registry built from the built-in policy table.
    pub fn standard() -> &'static RoleRegistry {
        static REGISTRY: OnceLock<RoleRegistry> = OnceLock::new();
        REGISTRY.get_or_init(|| {
            // The built-in table is covered by tests; failing here means it was edited badly.
            RoleRegistry::from_table(POLICY).unwrap_or_else(|err| panic!("built-in role policy is invalid: {err}"))
        })
    }

    /// Builds a registry, rejecting tables that miss a role or leave one empty.
    pub fn from_table(table: &[(Role, &[Permission])]) -> Result<Self, AppError> {
        let mut grants = BTreeMap::new();
        for (role, permissions) in table {
            if grants.contains_key(role) {
                return Err(AppError::configuration(format!("role {role} listed twice")));
            }
            let set: PermissionSet = permissions.iter().copied().collect();
            if set.is_empty() {
                return Err(AppError::configuration(format!("role {role} grants no permissions")));
            }
            grants.insert(*role, set);
        }

        if let Some(missing) = Role::ALL.into_iter().find(|role| !grants.contains_key(role)) {
            return Err(AppError::configuration(format!("role {missing} has no policy entry")));
        }

        Ok(Self { grants })
    }

    pub fn permissions_for(&self, role: Role) -> &PermissionSet {
        // from_table guarantees totality over Role::ALL
        &self.grants[&role]
    }

    pub fn permissions_for_name(&self, role: &str) -> Result<&PermissionSet, UnknownRoleError> {
        let role = role.parse::<Role>()?;
        Ok(self.permissions_for(role))
    }

    pub fn grants(&self, role: Role, permission: Permission) -> bool {
        self.permissions_for(role).contains(&permission)
    }
}

/// Roles-info copy for `role`.
pub fn describe(role: Role) -> RoleDescription {
    match role {
        Role::Owner => RoleDescription {
            label: "Owner",
            description: "Has full access to all features and system administration.",
            capabilities: &[
                "Create new products",
                "Delete any product",
                "Modify any product, including prices",
                "Update product availability",
                "Manage staff accounts",
                "Change store settings",
            ],
        },
        Role::StoreManager => RoleDescription {
            label: "Store Manager",
            description: "Manages products.",
            capabilities: &[
                "Create new products",
                "Delete products",
                "Update product availability",
                "Modify product prices",
            ],
        },
        Role::ShiftManager => RoleDescription {
            label: "Shift Manager",
            description: "Manages day-to-day operations.",
            capabilities: &[
                "Update product availability",
                "Update product details (except prices)",
                "Cannot create or delete products",
            ],
        },
        Role::Barista => RoleDescription {
            label: "Barista",
            description: "Front-line staff with limited system access.",
            capabilities: &[
                "View all products",
                "Update product availability (mark items as in/out of stock)",
                "Cannot create, modify, or delete products",
                "Cannot access management features",
            ],
        },
    }
}
