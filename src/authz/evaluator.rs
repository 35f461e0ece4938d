use crate::models::rbac::{Permission, Role, RoleSet};
use crate::session::Session;

use super::registry::RoleRegistry;
use super::resource::Requirement;

/// Access decisions. Implementations are pure and must fail closed.
pub trait PolicyEvaluator: Send + Sync {
    /// Whether the session's role grants `permission`. No session means no.
    fn has_permission(&self, session: Option<&Session>, permission: Permission) -> bool;

    /// Whether the session's role is one of `allowed`. No session means no.
    fn has_any_role(&self, session: Option<&Session>, allowed: &RoleSet) -> bool;

    fn satisfies(&self, session: Option<&Session>, requirement: &Requirement) -> bool {
        match requirement {
            Requirement::Authenticated => session.is_some(),
            Requirement::Permission(permission) => self.has_permission(session, *permission),
            Requirement::AnyRole(allowed) => self.has_any_role(session, allowed),
        }
    }
}

/// Evaluator backed by a [`RoleRegistry`].
///
/// Evaluation is a single lookup: the role's enumerated permission set either
/// contains the permission or it does not. There is no role hierarchy and no
/// owner bypass.
#[derive(Debug, Clone, Copy)]
pub struct DefaultPolicyEvaluator {
    registry: &'static RoleRegistry,
}

impl Default for DefaultPolicyEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultPolicyEvaluator {
    pub fn new() -> Self {
        Self::with_registry(RoleRegistry::standard())
    }

    pub fn with_registry(registry: &'static RoleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'static RoleRegistry {
        self.registry
    }

    /// Permission check for a role that has not been through the typed
    /// boundary yet. Unrecognized names are denied.
    pub fn role_has_permission(&self, role: &str, permission: Permission) -> bool {
        match role.parse::<Role>() {
            Ok(role) => self.registry.grants(role, permission),
            Err(err) => {
                tracing::warn!(error = %err, permission = %permission, "denying unknown role");
                false
            }
        }
    }

    /// Role-list check for an untyped role name. Unrecognized names are denied.
    pub fn role_in(&self, role: &str, allowed: &RoleSet) -> bool {
        match role.parse::<Role>() {
            Ok(role) => allowed.contains(&role),
            Err(err) => {
                tracing::warn!(error = %err, "denying unknown role");
                false
            }
        }
    }
}

impl PolicyEvaluator for DefaultPolicyEvaluator {
    fn has_permission(&self, session: Option<&Session>, permission: Permission) -> bool {
        let Some(session) = session else {
            tracing::debug!(permission = %permission, "no session, permission denied");
            return false;
        };

        let allowed = self.registry.grants(session.role, permission);
        tracing::debug!(
            username = %session.username,
            role = %session.role,
            permission = %permission,
            allowed,
            "permission check"
        );
        allowed
    }

    fn has_any_role(&self, session: Option<&Session>, allowed: &RoleSet) -> bool {
        let Some(session) = session else {
            tracing::debug!("no session, role check denied");
            return false;
        };

        let admitted = allowed.contains(&session.role);
        tracing::debug!(
            username = %session.username,
            role = %session.role,
            admitted,
            "role check"
        );
        admitted
    }
}
