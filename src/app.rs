use std::sync::Arc;

use crate::authz::{DefaultPolicyEvaluator, PolicyEvaluator};
use crate::client::ApiClient;
use crate::config::ConsoleConfig;
use crate::errors::AppResult;
use crate::gate::ViewGate;
use crate::guard::{Navigator, RouteGuard, RouteTable};
use crate::session::{Authenticator, FileStorage, HttpAuthenticator, SessionStorage, SessionStore};

/// Everything a running console shares. The guard and the gate hold the same
/// evaluator and route table.
#[derive(Clone)]
pub struct Console {
    pub config: Arc<ConsoleConfig>,
    pub sessions: Arc<SessionStore>,
    pub evaluator: Arc<dyn PolicyEvaluator>,
    pub routes: Arc<RouteTable>,
    pub guard: RouteGuard,
    pub api: ApiClient,
}

impl Console {
    pub fn new(
        config: ConsoleConfig,
        storage: Arc<dyn SessionStorage>,
        authenticator: Arc<dyn Authenticator>,
    ) -> AppResult<Self> {
        let config = Arc::new(config);
        let sessions = Arc::new(SessionStore::new(storage, authenticator));
        let evaluator: Arc<dyn PolicyEvaluator> = Arc::new(DefaultPolicyEvaluator::new());
        let routes = Arc::new(RouteTable::standard());
        let guard = RouteGuard::new(routes.clone(), evaluator.clone(), sessions.clone());
        let api = ApiClient::new(config.clone(), sessions.clone())?;

        Ok(Self {
            config,
            sessions,
            evaluator,
            routes,
            guard,
            api,
        })
    }

    pub fn gate(&self) -> ViewGate {
        ViewGate::new(self.sessions.subscribe(), self.evaluator.clone(), self.routes.clone())
    }

    pub fn navigator(&self) -> Navigator {
        Navigator::new(self.guard.clone())
    }
}

/// Console over file storage and the HTTP backend, with any persisted session restored.
pub fn create_console(config: ConsoleConfig) -> AppResult<Console> {
    let storage = Arc::new(FileStorage::new(config.session_dir.clone()));
    let authenticator = Arc::new(HttpAuthenticator::new(&config)?);
    let console = Console::new(config, storage, authenticator)?;
    console.sessions.restore();
    Ok(console)
}
