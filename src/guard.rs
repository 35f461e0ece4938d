//! Route guard
//!
//! Every navigation, including history moves, is checked against the route
//! table before a screen mounts. Denied navigations become redirects; the
//! attempted screen is never rendered and no error names it.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::authz::{PolicyEvaluator, ProtectedResource, Requirement};
use crate::errors::{AppError, AppResult};
use crate::models::rbac::Permission;
use crate::session::{Session, SessionStore};

pub const LOGIN_PATH: &str = "/login";
pub const LANDING_PATH: &str = "/products";

const MAX_REDIRECTS: usize = 4;

pub type PathParams = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    Protected(ProtectedResource),
    /// Path that only forwards somewhere else.
    Alias(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub pattern: &'static str,
    pub title: &'static str,
    /// Listed in the navigation menu.
    pub menu: bool,
    pub access: Access,
}

impl Route {
    pub fn public(pattern: &'static str, title: &'static str) -> Self {
        Self {
            pattern,
            title,
            menu: false,
            access: Access::Public,
        }
    }

    pub fn protected(pattern: &'static str, title: &'static str, requirement: impl Into<Requirement>) -> Self {
        Self {
            pattern,
            title,
            menu: false,
            access: Access::Protected(ProtectedResource::new(pattern, requirement)),
        }
    }

    pub fn alias(pattern: &'static str, target: &'static str) -> Self {
        Self {
            pattern,
            title: "",
            menu: false,
            access: Access::Alias(target),
        }
    }

    pub fn in_menu(mut self) -> Self {
        self.menu = true;
        self
    }

    /// Matches a normalized path, capturing `:name` segments.
    fn matches(&self, path: &str) -> Option<PathParams> {
        let mut pattern = self.pattern.split('/');
        let mut actual = path.split('/');
        let mut params = PathParams::new();

        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return Some(params),
                (Some(expected), Some(segment)) => {
                    if let Some(name) = expected.strip_prefix(':') {
                        if segment.is_empty() {
                            return None;
                        }
                        params.insert(name.to_string(), segment.to_string());
                    } else if expected != segment {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> AppResult<Self> {
        for required in [LOGIN_PATH, LANDING_PATH] {
            if !routes.iter().any(|route| route.pattern == required) {
                return Err(AppError::configuration(format!("route table has no {required} route")));
            }
        }
        Ok(Self { routes })
    }

    /// The console's screens and what each one demands.
    pub fn standard() -> Self {
        Self {
            routes: vec![
                Route::public(LOGIN_PATH, "Login"),
                Route::alias("/", LANDING_PATH),
                Route::public("/roles-info", "Roles & Permissions").in_menu(),
                Route::protected(LANDING_PATH, "Products", Requirement::Authenticated).in_menu(),
                Route::protected("/add-product", "Add Product", Permission::ManageProducts).in_menu(),
                Route::protected("/edit-product/:productId", "Edit Product", Permission::UpdateProducts),
                Route::protected("/management/inventory", "Inventory", Permission::ManageInventory).in_menu(),
                Route::protected("/management/reports", "Reports", Permission::ViewReports).in_menu(),
                Route::protected("/management/staff", "Staff", Permission::ManageStaff).in_menu(),
                Route::protected("/management/settings", "Store Settings", Permission::ManageStore).in_menu(),
            ],
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn resolve(&self, path: &str) -> Option<(&Route, PathParams)> {
        let path = normalize(path);
        self.routes
            .iter()
            .find_map(|route| route.matches(&path).map(|params| (route, params)))
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    NotAuthenticated,
    NotPermitted,
    NotFound,
    Alias,
}

/// Proof that the guard let a navigation through. Screens load their data
/// through an admission, never before one exists.
#[derive(Debug, Clone)]
pub struct Admission {
    pub route: Route,
    pub path: String,
    pub params: PathParams,
    pub session: Option<Arc<Session>>,
    /// Session epoch the admission was granted under.
    pub epoch: u64,
}

impl Admission {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn session(&self) -> AppResult<&Arc<Session>> {
        self.session.as_ref().ok_or(AppError::NotAuthenticated)
    }
}

#[derive(Debug, Clone)]
pub enum Navigation {
    Admit(Admission),
    Redirect {
        to: &'static str,
        reason: RedirectReason,
    },
}

impl Navigation {
    pub fn admission(&self) -> Option<&Admission> {
        match self {
            Navigation::Admit(admission) => Some(admission),
            Navigation::Redirect { .. } => None,
        }
    }
}

#[derive(Clone)]
pub struct RouteGuard {
    routes: Arc<RouteTable>,
    evaluator: Arc<dyn PolicyEvaluator>,
    sessions: Arc<SessionStore>,
}

impl RouteGuard {
    pub fn new(routes: Arc<RouteTable>, evaluator: Arc<dyn PolicyEvaluator>, sessions: Arc<SessionStore>) -> Self {
        Self {
            routes,
            evaluator,
            sessions,
        }
    }

    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }

    /// One guard decision for one navigation event.
    pub fn navigate(&self, path: &str) -> Navigation {
        let snapshot = self.sessions.snapshot();

        let Some((route, params)) = self.routes.resolve(path) else {
            tracing::debug!(path, "no such route");
            return Navigation::Redirect {
                to: LANDING_PATH,
                reason: RedirectReason::NotFound,
            };
        };

        match &route.access {
            Access::Alias(target) => {
                return Navigation::Redirect {
                    to: *target,
                    reason: RedirectReason::Alias,
                }
            }
            Access::Public => {}
            Access::Protected(resource) => {
                let Some(session) = snapshot.session.as_deref() else {
                    tracing::debug!(path, "not signed in");
                    return Navigation::Redirect {
                        to: LOGIN_PATH,
                        reason: RedirectReason::NotAuthenticated,
                    };
                };

                if !self.evaluator.satisfies(Some(session), &resource.requirement) {
                    tracing::info!(
                        path,
                        username = %session.username,
                        role = %session.role,
                        requirement = %resource.requirement,
                        "navigation denied"
                    );
                    return Navigation::Redirect {
                        to: LANDING_PATH,
                        reason: RedirectReason::NotPermitted,
                    };
                }
            }
        }

        Navigation::Admit(Admission {
            route: route.clone(),
            path: normalize(path),
            params,
            session: snapshot.session,
            epoch: snapshot.epoch,
        })
    }
}

/// Result of a navigation after following redirects.
#[derive(Debug, Clone)]
pub struct Visit {
    pub requested: String,
    pub redirects: Vec<(&'static str, RedirectReason)>,
    pub admission: Option<Admission>,
}

impl Visit {
    pub fn location(&self) -> Option<&str> {
        self.admission.as_ref().map(|admission| admission.path.as_str())
    }

    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

/// Browser-style history whose every move goes back through the guard.
#[derive(Clone)]
pub struct Navigator {
    guard: RouteGuard,
    history: Vec<String>,
    cursor: usize,
}

impl Navigator {
    pub fn new(guard: RouteGuard) -> Self {
        Self {
            guard,
            history: Vec::new(),
            cursor: 0,
        }
    }

    pub fn current(&self) -> Option<&str> {
        self.history.get(self.cursor).map(String::as_str)
    }

    pub fn push(&mut self, path: &str) -> Visit {
        let visit = self.follow(path);
        if let Some(location) = visit.location() {
            if !self.history.is_empty() {
                self.history.truncate(self.cursor + 1);
            }
            self.history.push(location.to_string());
            self.cursor = self.history.len() - 1;
        }
        visit
    }

    pub fn back(&mut self) -> Option<Visit> {
        if self.cursor == 0 || self.history.is_empty() {
            return None;
        }
        self.cursor -= 1;
        Some(self.revisit())
    }

    pub fn forward(&mut self) -> Option<Visit> {
        if self.cursor + 1 >= self.history.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.revisit())
    }

    /// Re-checks the entry under the cursor; a redirect replaces the entry.
    fn revisit(&mut self) -> Visit {
        let path = self.history[self.cursor].clone();
        let visit = self.follow(&path);
        if let Some(location) = visit.location() {
            self.history[self.cursor] = location.to_string();
        }
        visit
    }

    fn follow(&self, path: &str) -> Visit {
        let mut redirects = Vec::new();
        let mut target = path.to_string();

        for _ in 0..=MAX_REDIRECTS {
            match self.guard.navigate(&target) {
                Navigation::Admit(admission) => {
                    return Visit {
                        requested: path.to_string(),
                        redirects,
                        admission: Some(admission),
                    }
                }
                Navigation::Redirect { to, reason } => {
                    redirects.push((to, reason));
                    target = to.to_string();
                }
            }
        }

        tracing::error!(path, "redirect loop in route table");
        Visit {
            requested: path.to_string(),
            redirects,
            admission: None,
        }
    }
}
