use serde::Serialize;

use crate::authz::{describe, RoleDescription, RoleRegistry};
use crate::models::rbac::{Permission, Role};

/// One card of the roles-info page.
#[derive(Debug, Clone, Serialize)]
pub struct RoleCard {
    pub role: Role,
    #[serde(flatten)]
    pub description: RoleDescription,
    pub permissions: Vec<Permission>,
}

/// `/roles-info`. Public; rendered straight from the registry so the page
/// cannot drift from what is enforced.
pub fn role_cards(registry: &RoleRegistry) -> Vec<RoleCard> {
    Role::ALL
        .into_iter()
        .map(|role| RoleCard {
            role,
            description: describe(role),
            permissions: registry.permissions_for(role).iter().copied().collect(),
        })
        .collect()
}
