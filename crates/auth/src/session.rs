//! Session context: persisted tokens, the authentication state machine and
//! the signed-in user.

use chrono::{Duration, Utc};
use log::{debug, info};
use std::sync::{Arc, RwLock};
use tokio::sync::watch;

use crate::error::ApiError;
use crate::store::{
    MemoryTokenStore, StoredToken, TokenJar, TokenStore, ACCESS_TOKEN_TTL_DAYS,
    REFRESH_TOKEN_TTL_DAYS,
};
use crate::User;

/// Where the session currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticating,
    Authenticated,
    Refreshing,
}

/// Inputs that move the session between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// Credentials (or an OAuth code) were sent.
    Submitted,
    /// A stored token was accepted on start-up.
    Restored,
    Succeeded,
    Failed,
    /// An authenticated request came back 401.
    Unauthorized,
    Refreshed,
    RefreshFailed,
    LoggedOut,
}

impl AuthState {
    /// The state after `event`, or `None` when the event does not apply.
    pub fn next(self, event: AuthEvent) -> Option<AuthState> {
        use AuthEvent::*;
        use AuthState::*;

        match (self, event) {
            (_, LoggedOut) => Some(Anonymous),
            (Anonymous, Submitted) => Some(Authenticating),
            (Anonymous, Restored) => Some(Authenticated),
            (Authenticating, Succeeded) => Some(Authenticated),
            (Authenticating, Failed) => Some(Anonymous),
            (Authenticated, Unauthorized) => Some(Refreshing),
            (Refreshing, Refreshed) => Some(Authenticated),
            (Refreshing, RefreshFailed) => Some(Anonymous),
            _ => None,
        }
    }

    pub fn is_signed_in(self) -> bool {
        matches!(self, AuthState::Authenticated | AuthState::Refreshing)
    }
}

/// Shared session for one client.
///
/// Handed around as `Arc<Session>`. The token jar is written through to the
/// backing [`TokenStore`] on every change.
#[derive(Debug)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    tokens: RwLock<TokenJar>,
    user: RwLock<Option<User>>,
    state: watch::Sender<AuthState>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl Session {
    /// Open a session over `store`, loading whatever tokens it holds.
    pub fn new(store: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let jar = store.load()?;
        let (state, _) = watch::channel(AuthState::Anonymous);

        Ok(Self {
            store,
            tokens: RwLock::new(jar),
            user: RwLock::new(None),
            state,
            access_ttl: Duration::days(ACCESS_TOKEN_TTL_DAYS),
            refresh_ttl: Duration::days(REFRESH_TOKEN_TTL_DAYS),
        })
    }

    pub fn in_memory() -> Self {
        let (state, _) = watch::channel(AuthState::Anonymous);
        Self {
            store: Arc::new(MemoryTokenStore::new()),
            tokens: RwLock::new(TokenJar::default()),
            user: RwLock::new(None),
            state,
            access_ttl: Duration::days(ACCESS_TOKEN_TTL_DAYS),
            refresh_ttl: Duration::days(REFRESH_TOKEN_TTL_DAYS),
        }
    }

    pub fn with_lifetimes(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    /// Watch state transitions, e.g. to redirect to the login page.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Feed an event into the state machine and return the resulting state.
    pub fn apply(&self, event: AuthEvent) -> AuthState {
        let current = self.state();
        match current.next(event) {
            Some(next) => {
                if next != current {
                    debug!("Session state {:?} -> {:?} on {:?}", current, next, event);
                    self.state.send_replace(next);
                }
                next
            }
            None => {
                debug!("Ignoring {:?} in state {:?}", event, current);
                current
            }
        }
    }

    pub fn user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set_user(&self, user: Option<User>) {
        let mut guard = self.user.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = user;
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().is_signed_in()
    }

    pub fn access_token(&self) -> Option<String> {
        let guard = self.tokens.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.access(Utc::now()).map(str::to_string)
    }

    pub fn refresh_token(&self) -> Option<String> {
        let guard = self.tokens.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.refresh(Utc::now()).map(str::to_string)
    }

    /// Persist a fresh access/refresh pair.
    pub fn store_tokens(&self, access: &str, refresh: &str) -> Result<(), ApiError> {
        self.update_jar(|jar| {
            jar.access_token = Some(StoredToken::new(access, self.access_ttl));
            jar.refresh_token = Some(StoredToken::new(refresh, self.refresh_ttl));
        })
    }

    /// Replace the access token only, keeping the refresh token.
    pub fn store_access_token(&self, access: &str) -> Result<(), ApiError> {
        self.update_jar(|jar| {
            jar.access_token = Some(StoredToken::new(access, self.access_ttl));
        })
    }

    pub fn clear_tokens(&self) -> Result<(), ApiError> {
        self.update_jar(|jar| *jar = TokenJar::default())
    }

    /// Forget everything and return to `Anonymous`.
    pub fn teardown(&self) -> Result<(), ApiError> {
        self.set_user(None);
        let cleared = self.clear_tokens();
        self.apply(AuthEvent::LoggedOut);
        info!("Session cleared");
        cleared
    }

    /// Teardown after the refresh flow gave up.
    pub(crate) fn expire(&self) -> Result<(), ApiError> {
        self.set_user(None);
        let cleared = self.clear_tokens();
        if self.apply(AuthEvent::RefreshFailed) != AuthState::Anonymous {
            self.apply(AuthEvent::LoggedOut);
        }
        cleared
    }

    fn update_jar(&self, change: impl FnOnce(&mut TokenJar)) -> Result<(), ApiError> {
        let snapshot = {
            let mut guard = self.tokens.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            change(&mut guard);
            guard.clone()
        };
        self.store.save(&snapshot)
    }
}
