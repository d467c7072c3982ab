pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::errors::StoreError;
use crate::models::UserProfile;

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const TOKEN_EXPIRY_KEY: &str = "token_expiry";
pub const USER_PROFILE_KEY: &str = "user_profile";

/// Broadcast to every subscriber when the persisted session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { user_id: Option<String> },
    LoggedOut,
}

/// Everything written to the store after a successful login.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub refresh_token: Option<String>,
    pub expiry: DateTime<Utc>,
    pub profile: Option<UserProfile>,
}

/// Owns the session store and notifies subscribers of login/logout.
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(16);
        Self { store, events }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn token(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .store
            .get(AUTH_TOKEN_KEY)?
            .filter(|t| !t.is_empty()))
    }

    pub fn refresh_token(&self) -> Result<Option<String>, StoreError> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    pub fn expiry(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self
            .store
            .get(TOKEN_EXPIRY_KEY)?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    /// True when there is no token or its expiry has passed.
    pub fn is_expired(&self, now: DateTime<Utc>) -> Result<bool, StoreError> {
        if self.token()?.is_none() {
            return Ok(true);
        }
        Ok(self.expiry()?.map(|exp| exp <= now).unwrap_or(false))
    }

    pub fn profile(&self) -> Result<Option<UserProfile>, StoreError> {
        match self.store.get(USER_PROFILE_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn user_id(&self) -> Result<Option<String>, StoreError> {
        Ok(self.profile()?.map(|p| p.user_id))
    }

    pub fn persist(&self, session: &StoredSession) -> Result<(), StoreError> {
        self.store.set(AUTH_TOKEN_KEY, &session.token)?;
        match &session.refresh_token {
            Some(refresh) => self.store.set(REFRESH_TOKEN_KEY, refresh)?,
            None => self.store.remove(REFRESH_TOKEN_KEY)?,
        }
        self.store
            .set(TOKEN_EXPIRY_KEY, &session.expiry.to_rfc3339())?;
        match &session.profile {
            Some(profile) => self
                .store
                .set(USER_PROFILE_KEY, &serde_json::to_string(profile)?)?,
            None => self.store.remove(USER_PROFILE_KEY)?,
        }

        let user_id = session.profile.as_ref().map(|p| p.user_id.clone());
        tracing::info!(user_id = ?user_id, expiry = %session.expiry, "Session persisted");
        // No receivers is fine
        let _ = self.events.send(SessionEvent::LoggedIn { user_id });
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        for key in [
            AUTH_TOKEN_KEY,
            REFRESH_TOKEN_KEY,
            TOKEN_EXPIRY_KEY,
            USER_PROFILE_KEY,
        ] {
            self.store.remove(key)?;
        }
        tracing::info!("Session cleared");
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }
}
