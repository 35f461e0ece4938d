//! View gate
//!
//! Decides which affordances a mounted screen renders. It reads the live
//! session on every call and asks the same evaluator the route guard uses.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::authz::{PolicyEvaluator, Requirement};
use crate::guard::{Access, RouteTable};
use crate::models::rbac::{Permission, Role, RoleSet};
use crate::session::{Session, SessionSnapshot};

/// Gated UI elements, each tied to exactly one requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    AddProduct,
    EditProduct,
    DeleteProduct,
    ToggleAvailability,
    /// The price input of the product editor.
    EditPrice,
    ManageInventory,
    ViewReports,
    /// Sales and financial reports beyond the inventory report.
    ExtendedReports,
    ManageStaff,
    StoreSettings,
}

impl Affordance {
    pub const ALL: [Affordance; 10] = [
        Affordance::AddProduct,
        Affordance::EditProduct,
        Affordance::DeleteProduct,
        Affordance::ToggleAvailability,
        Affordance::EditPrice,
        Affordance::ManageInventory,
        Affordance::ViewReports,
        Affordance::ExtendedReports,
        Affordance::ManageStaff,
        Affordance::StoreSettings,
    ];

    pub fn requirement(self) -> Requirement {
        match self {
            Affordance::AddProduct | Affordance::DeleteProduct => Permission::ManageProducts.into(),
            Affordance::EditProduct => Permission::UpdateProducts.into(),
            Affordance::ToggleAvailability => Permission::UpdateAvailability.into(),
            Affordance::EditPrice => Permission::ManagePrices.into(),
            Affordance::ExtendedReports => Requirement::any_of([Role::Owner, Role::StoreManager]),
            Affordance::ManageInventory => Permission::ManageInventory.into(),
            Affordance::ViewReports => Permission::ViewReports.into(),
            Affordance::ManageStaff => Permission::ManageStaff.into(),
            Affordance::StoreSettings => Permission::ManageStore.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub title: &'static str,
    pub path: &'static str,
}

#[derive(Clone)]
pub struct ViewGate {
    sessions: watch::Receiver<SessionSnapshot>,
    evaluator: Arc<dyn PolicyEvaluator>,
    routes: Arc<RouteTable>,
}

impl ViewGate {
    pub fn new(
        sessions: watch::Receiver<SessionSnapshot>,
        evaluator: Arc<dyn PolicyEvaluator>,
        routes: Arc<RouteTable>,
    ) -> Self {
        Self {
            sessions,
            evaluator,
            routes,
        }
    }

    pub fn session(&self) -> Option<Arc<Session>> {
        self.sessions.borrow().session.clone()
    }

    pub fn is_visible(&self, permission: Permission) -> bool {
        self.allows(&Requirement::Permission(permission))
    }

    pub fn is_visible_to(&self, roles: &RoleSet) -> bool {
        let session = self.session();
        self.evaluator.has_any_role(session.as_deref(), roles)
    }

    pub fn allows(&self, requirement: &Requirement) -> bool {
        let session = self.session();
        self.evaluator.satisfies(session.as_deref(), requirement)
    }

    pub fn shows(&self, affordance: Affordance) -> bool {
        self.allows(&affordance.requirement())
    }

    pub fn visible_affordances(&self) -> Vec<Affordance> {
        Affordance::ALL
            .into_iter()
            .filter(|affordance| self.shows(*affordance))
            .collect()
    }

    /// Menu entries, filtered by the same requirements the route guard enforces.
    pub fn nav_entries(&self) -> Vec<NavEntry> {
        self.routes
            .routes()
            .iter()
            .filter(|route| route.menu)
            .filter(|route| match &route.access {
                Access::Public => true,
                Access::Protected(resource) => self.allows(&resource.requirement),
                Access::Alias(_) => false,
            })
            .map(|route| NavEntry {
                title: route.title,
                path: route.pattern,
            })
            .collect()
    }

    /// Waits for the next session change. Returns false once the store is gone.
    pub async fn changed(&mut self) -> bool {
        self.sessions.changed().await.is_ok()
    }
}
