//! Session management
//!
//! The session store owns the only truly global mutable state: the
//! bearer token and the current identity. Every other component reads
//! snapshots; only the store (and the gateway's 401 path) writes.

pub mod token_store;

use std::sync::{Arc, RwLock};

use crate::data::Identity;
use crate::error::{AppError, Result};
use crate::gateway::{Gateway, TokenCell, routes};

pub use token_store::{FsTokenStore, MemoryTokenStore, TokenStore};

/// Snapshot of the current session.
///
/// `ready` is false only before `restore()` has resolved; route guards
/// must not render protected content while it is false.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub ready: bool,
    pub identity: Option<Identity>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Shared session-state cell; the session store is the single writer.
pub type SessionCell = Arc<RwLock<SessionState>>;

/// Authenticated session store
pub struct SessionStore {
    gateway: Arc<Gateway>,
    token: TokenCell,
    state: SessionCell,
    token_store: Arc<dyn TokenStore>,
}

impl SessionStore {
    pub fn new(
        gateway: Arc<Gateway>,
        token: TokenCell,
        state: SessionCell,
        token_store: Arc<dyn TokenStore>,
    ) -> Self {
        Self {
            gateway,
            token,
            state,
            token_store,
        }
    }

    /// Current session snapshot
    pub fn snapshot(&self) -> SessionState {
        self.state.read().expect("session lock poisoned").clone()
    }

    /// Restore the session at process start.
    ///
    /// If a persisted token exists, validates it against the backend's
    /// "who am I" endpoint. Always resolves to a ready state: an expired
    /// or invalid token clears the persisted value and leaves the
    /// session unauthenticated rather than hanging in loading.
    pub async fn restore(&self) -> Result<()> {
        let persisted = self.token_store.load()?;

        let Some(token) = persisted else {
            self.mark_ready(None);
            tracing::debug!("No persisted token; session starts unauthenticated");
            return Ok(());
        };

        self.set_token(Some(token));

        match self.fetch_identity().await {
            Ok(identity) => {
                tracing::info!(user = %identity.display_name(), "Session restored");
                self.mark_ready(Some(identity));
            }
            Err(error) => {
                // The 401 path already cleared the token cell; make the
                // durable copy and in-memory identity agree.
                tracing::warn!(%error, "Persisted token rejected; clearing session");
                self.set_token(None);
                self.token_store.clear()?;
                self.mark_ready(None);
            }
        }
        Ok(())
    }

    /// Become the new current session without an extra round trip.
    ///
    /// Used by login, signup and ghost-login, all of which already hold
    /// the identity the backend returned alongside the token.
    pub fn login(&self, token: String, identity: Identity) -> Result<()> {
        identity.validate()?;
        self.token_store.save(&token)?;
        self.set_token(Some(token));
        tracing::info!(user = %identity.display_name(), level = identity.level, "Logged in");
        self.mark_ready(Some(identity));
        Ok(())
    }

    /// Clear the persisted token and in-memory identity.
    pub fn logout(&self) -> Result<()> {
        self.token_store.clear()?;
        self.set_token(None);
        self.mark_ready(None);
        tracing::info!("Logged out");
        Ok(())
    }

    /// Re-fetch the identity on demand, replacing the in-memory copy.
    ///
    /// Called after profile edits or role changes.
    pub async fn refresh(&self) -> Result<Identity> {
        let identity = self.fetch_identity().await?;
        self.mark_ready(Some(identity.clone()));
        Ok(identity)
    }

    /// Demote to unauthenticated after a 401.
    ///
    /// Idempotent: invoked by the gateway hook on every 401 response but
    /// only acts (and logs) when there is a session left to clear, so an
    /// already-public session never loops.
    pub fn handle_unauthorized(&self) {
        demote_unauthorized(&self.state, &self.token_store);
    }

    /// Authenticate with email and password.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<Identity> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let response: crate::data::LoginResponse = self
            .gateway
            .post_json(
                &routes::login(),
                &crate::data::LoginRequest {
                    email: email.to_string(),
                    password: password.to_string(),
                },
                "login",
            )
            .await?;

        self.login(response.token, response.user.clone())?;
        Ok(response.user)
    }

    /// Register a new account and become its session.
    pub async fn register(&self, request: &crate::data::SignupRequest) -> Result<Identity> {
        if request.first_name.trim().is_empty()
            || request.last_name.trim().is_empty()
            || request.email.trim().is_empty()
        {
            return Err(AppError::Validation(
                "Name and email are required".to_string(),
            ));
        }
        if request.password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let response: crate::data::LoginResponse = self
            .gateway
            .post_json(&routes::signup(), request, "signup")
            .await?;

        self.login(response.token, response.user.clone())?;
        Ok(response.user)
    }

    async fn fetch_identity(&self) -> Result<Identity> {
        let identity: Identity = self.gateway.get_json(&routes::me(), "me").await?;
        identity.validate()?;
        Ok(identity)
    }

    fn set_token(&self, token: Option<String>) {
        *self.token.write().expect("token lock poisoned") = token;
    }

    fn mark_ready(&self, identity: Option<Identity>) {
        let mut state = self.state.write().expect("session lock poisoned");
        state.ready = true;
        state.identity = identity;
    }
}

/// Shared demotion routine behind [`SessionStore::handle_unauthorized`]
/// and the gateway's 401 hook, which fires before the session store is
/// constructed and so captures the cells directly.
pub fn demote_unauthorized(state: &SessionCell, store: &Arc<dyn TokenStore>) {
    let had_identity = {
        let mut state = state.write().expect("session lock poisoned");
        let had = state.identity.is_some();
        state.identity = None;
        state.ready = true;
        had
    };
    if store.clear().is_err() {
        tracing::error!("Failed to clear persisted token after 401");
    }
    if had_identity {
        tracing::warn!("Session demoted to unauthenticated after 401");
    }
}
