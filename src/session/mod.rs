//! Session store
//!
//! Holds the one current [`Session`] of this client. The slot is a
//! `tokio::sync::watch` channel: every change is a single replacement, and the
//! route guard, view gate and screens observe it through [`SessionStore::subscribe`].

mod authenticator;
mod storage;
mod token;

pub use authenticator::{Authenticator, HttpAuthenticator};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};
pub use token::{expiry_of, Claims};

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::errors::{AppError, AppResult};
use crate::models::rbac::Role;
use crate::models::user::{LoginRequest, StaffProfile};

/// The authenticated actor.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub staff_id: Option<i64>,
}

impl Session {
    pub fn new(username: impl Into<String>, role: Role, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            role,
            token: token.into(),
            expires_at: None,
            staff_id: None,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn with_staff_id(mut self, staff_id: i64) -> Self {
        self.staff_id = Some(staff_id);
        self
    }

    /// Typed session from the backend's profile. This is where an unexpected
    /// role string is caught.
    fn from_profile(profile: &StaffProfile, token: String) -> AppResult<Self> {
        let role = profile.role.parse::<Role>()?;
        Ok(Self {
            username: profile.username.clone(),
            role,
            expires_at: expiry_of(&token),
            token,
            staff_id: profile.id,
        })
    }

    fn profile(&self) -> StaffProfile {
        StaffProfile {
            id: self.staff_id,
            username: self.username.clone(),
            role: self.role.as_str().to_string(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("staff_id", &self.staff_id)
            .finish()
    }
}

/// What the slot holds at one moment. `epoch` moves forward every time the
/// occupant changes, so work started under one session can tell it is stale.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub epoch: u64,
    pub session: Option<Arc<Session>>,
}

pub struct SessionStore {
    slot: watch::Sender<SessionSnapshot>,
    storage: Arc<dyn SessionStorage>,
    authenticator: Arc<dyn Authenticator>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("snapshot", &*self.slot.borrow())
            .field("storage", &self.storage)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// An empty store. Call [`SessionStore::restore`] to pick up a persisted session.
    pub fn new(storage: Arc<dyn SessionStorage>, authenticator: Arc<dyn Authenticator>) -> Self {
        let (slot, _) = watch::channel(SessionSnapshot::default());
        Self {
            slot,
            storage,
            authenticator,
        }
    }

    pub fn current_session(&self) -> Option<Arc<Session>> {
        self.slot.borrow().session.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.slot.borrow().clone()
    }

    pub fn epoch(&self) -> u64 {
        self.slot.borrow().epoch
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.slot.subscribe()
    }

    /// Loads the session persisted by an earlier run. Anything unusable in
    /// storage is wiped and the store stays signed out.
    pub fn restore(&self) -> Option<Arc<Session>> {
        let session = match self.load_persisted() {
            Ok(Some(session)) => session,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(error = %err, "discarding persisted session");
                self.wipe_storage();
                return None;
            }
        };

        if session.is_expired() {
            tracing::info!(username = %session.username, "persisted session has expired");
            self.wipe_storage();
            return None;
        }

        let session = Arc::new(session);
        self.publish(session.clone());
        tracing::info!(username = %session.username, role = %session.role, "session restored");
        Some(session)
    }

    fn load_persisted(&self) -> AppResult<Option<Session>> {
        let token = self.storage.get(TOKEN_KEY)?;
        let user = self.storage.get(USER_KEY)?;
        let (Some(token), Some(user)) = (token, user) else {
            return Ok(None);
        };
        if token.is_empty() {
            return Ok(None);
        }

        let profile: StaffProfile = serde_json::from_str(&user)?;
        Session::from_profile(&profile, token).map(Some)
    }

    /// Verifies credentials with the backend and installs the resulting session.
    ///
    /// Rejected credentials leave whatever session was there before. A payload
    /// with an unrecognized role signs the client out.
    pub async fn sign_in(&self, username: &str, password: &str) -> AppResult<Arc<Session>> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(AppError::authentication("username and password are required"));
        }

        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.authenticator.login(&request).await.map_err(|err| {
            tracing::warn!(username = %username, error = %err, "sign-in failed");
            err
        })?;

        let token = response
            .token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AppError::authentication("no token received from server"))?;

        let session = match Session::from_profile(&response.staff, token) {
            Ok(session) => session,
            Err(err) => {
                tracing::error!(
                    username = %response.staff.username,
                    role = %response.staff.role,
                    "login payload carries an unknown role"
                );
                self.sign_out();
                return Err(err);
            }
        };

        if let Err(err) = self.persist(&session) {
            tracing::error!(username = %session.username, error = %err, "failed to persist session");
            self.roll_back_storage();
            return Err(err);
        }

        let session = Arc::new(session);
        let epoch = self.publish(session.clone());
        tracing::info!(username = %session.username, role = %session.role, epoch, "signed in");
        Ok(session)
    }

    /// Clears the session. Safe to call when nobody is signed in.
    pub fn sign_out(&self) {
        self.wipe_storage();
        if let Some(epoch) = self.clear(None) {
            tracing::info!(epoch, "signed out");
        }
    }

    /// Implicit sign-out after the backend rejected the token of the session
    /// that was current at `epoch`. Returns false if that session is already gone.
    pub fn expire(&self, epoch: u64) -> bool {
        match self.clear(Some(epoch)) {
            Some(next) => {
                self.wipe_storage();
                tracing::warn!(epoch = next, "session expired");
                true
            }
            None => false,
        }
    }

    fn persist(&self, session: &Session) -> AppResult<()> {
        let user = serde_json::to_string(&session.profile())?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        self.storage.set(USER_KEY, &user)?;
        Ok(())
    }

    /// Puts storage back in line with the slot after a failed write. If the
    /// current session cannot be written back either, the client signs out.
    fn roll_back_storage(&self) {
        let Some(current) = self.current_session() else {
            self.wipe_storage();
            return;
        };
        if let Err(err) = self.persist(&current) {
            tracing::error!(username = %current.username, error = %err, "could not restore persisted session");
            self.sign_out();
        }
    }

    fn wipe_storage(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.storage.remove(key) {
                tracing::warn!(key, error = %err, "failed to remove persisted session entry");
            }
        }
    }

    fn publish(&self, session: Arc<Session>) -> u64 {
        let mut epoch = 0;
        self.slot.send_modify(|snapshot| {
            snapshot.epoch += 1;
            snapshot.session = Some(session);
            epoch = snapshot.epoch;
        });
        epoch
    }

    /// Empties the slot, optionally only if it still belongs to `only_epoch`.
    /// Returns the new epoch when something was cleared.
    fn clear(&self, only_epoch: Option<u64>) -> Option<u64> {
        let mut cleared = None;
        self.slot.send_if_modified(|snapshot| {
            if snapshot.session.is_none() {
                return false;
            }
            if only_epoch.is_some_and(|epoch| epoch != snapshot.epoch) {
                return false;
            }
            snapshot.session = None;
            snapshot.epoch += 1;
            cleared = Some(snapshot.epoch);
            true
        });
        cleared
    }
}
