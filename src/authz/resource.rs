use std::fmt;

use crate::models::rbac::{Permission, Role, RoleSet};

/// What an actor must hold to reach a route or see an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Any signed-in actor.
    Authenticated,
    Permission(Permission),
    /// Legacy "any of these roles" rule.
    AnyRole(RoleSet),
}

impl Requirement {
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Requirement::AnyRole(roles.into_iter().collect())
    }

    /// Normalizes a list of role names. Names that are not known roles are
    /// dropped, so a list of only bad names admits nobody.
    pub fn any_role_named<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut roles = RoleSet::new();
        for name in names {
            match name.parse::<Role>() {
                Ok(role) => {
                    roles.insert(role);
                }
                Err(err) => tracing::warn!(error = %err, "ignoring unknown role in role list"),
            }
        }
        Requirement::AnyRole(roles)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Authenticated => f.write_str("authenticated"),
            Requirement::Permission(perm) => write!(f, "permission:{perm}"),
            Requirement::AnyRole(roles) => {
                let names: Vec<&str> = roles.iter().map(|r| r.as_str()).collect();
                write!(f, "any_role:[{}]", names.join(","))
            }
        }
    }
}

impl From<Permission> for Requirement {
    fn from(value: Permission) -> Self {
        Requirement::Permission(value)
    }
}

/// A route or UI element together with the requirement that protects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedResource {
    pub name: &'static str,
    pub requirement: Requirement,
}

impl ProtectedResource {
    pub fn new(name: &'static str, requirement: impl Into<Requirement>) -> Self {
        Self {
            name,
            requirement: requirement.into(),
        }
    }
}
