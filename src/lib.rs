//! Akwaba - headless client core for a community association platform
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Rendering layer (not here)                │
//! │  - Renders service snapshots, issues operations             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Social graph, feed, events, admin, account engines       │
//! │  - Route guard, background polling                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Session + Gateway Layer                     │
//! │  - Bearer token cell, durable token store                   │
//! │  - Single HTTP egress point with global 401 handling        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `roles`: pure clearance-level to capability projection
//! - `guard`: pure route authorization decisions
//! - `session`: token persistence and the authenticated session store
//! - `gateway`: HTTP egress and the backend route catalog
//! - `service`: per-view async engines
//! - `data`: wire-format data models
//! - `poll`: background refresh loops
//! - `config`: configuration management
//! - `error`: error types

pub mod config;
pub mod data;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod poll;
pub mod roles;
pub mod service;
pub mod session;

use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::service::account::AccountService;
use crate::service::admin::AdminService;
use crate::service::events::EventsService;
use crate::service::feed::FeedService;
use crate::service::social::SocialService;

/// Application core shared with the rendering layer
///
/// Owns one gateway, one session store and one instance of each view
/// engine. Constructed once at startup and handed out behind `Arc`s.
pub struct AppCore {
    pub config: Arc<config::AppConfig>,
    pub gateway: Arc<gateway::Gateway>,
    pub session: Arc<session::SessionStore>,
    pub social: Arc<SocialService>,
    pub feed: Arc<FeedService>,
    pub events: Arc<EventsService>,
    pub admin: Arc<AdminService>,
    pub account: Arc<AccountService>,
}

impl AppCore {
    /// Initialize the core with the file-backed token store.
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        let token_store: Arc<dyn session::TokenStore> = Arc::new(session::FsTokenStore::new(
            config.session.token_path.clone(),
        ));
        Self::with_token_store(config, token_store)
    }

    /// Initialize the core with an explicit token store.
    ///
    /// # Steps
    /// 1. Create the shared token and session cells
    /// 2. Build the gateway with the 401 demotion hook
    /// 3. Build the session store over the same cells
    /// 4. Build the view engines
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn with_token_store(
        config: config::AppConfig,
        token_store: Arc<dyn session::TokenStore>,
    ) -> Result<Self, error::AppError> {
        tracing::info!(base_url = %config.api.base_url, "Initializing application core");

        // 1. Shared cells: the gateway reads the token on every request,
        //    the 401 hook writes the session state.
        let token: gateway::TokenCell = Arc::new(std::sync::RwLock::new(None));
        let state: session::SessionCell =
            Arc::new(std::sync::RwLock::new(session::SessionState::default()));

        // 2. Gateway with the demotion hook. The hook captures the cells
        //    directly so it stays a plain sync closure.
        let hook_state = state.clone();
        let hook_store = token_store.clone();
        let gateway = Arc::new(
            gateway::Gateway::new(&config.api, token.clone())?.with_unauthorized_hook(Arc::new(
                move || session::demote_unauthorized(&hook_state, &hook_store),
            )),
        );

        // 3. Session store over the same cells
        let session = Arc::new(session::SessionStore::new(
            gateway.clone(),
            token,
            state,
            token_store,
        ));

        // 4. View engines
        let debounce = std::time::Duration::from_millis(config.search.debounce_ms);
        let social = Arc::new(SocialService::new(
            gateway.clone(),
            session.clone(),
            debounce,
            config.search.min_query_len,
        ));
        let feed = Arc::new(FeedService::new(gateway.clone(), session.clone()));
        let events = Arc::new(EventsService::new(gateway.clone(), session.clone()));
        let admin = Arc::new(AdminService::new(gateway.clone(), session.clone()));
        let account = Arc::new(AccountService::new(gateway.clone(), session.clone()));

        Ok(Self {
            config: Arc::new(config),
            gateway,
            session,
            social,
            feed,
            events,
            admin,
            account,
        })
    }

    /// Restore the persisted session, resolving the loading state.
    ///
    /// Must run before any route guard decision is trusted.
    pub async fn start(&self) -> Result<(), error::AppError> {
        self.session.restore().await
    }

    /// Keep the pending-request list fresh in the background.
    ///
    /// The loop stops when the handle is dropped; ticks while signed out
    /// fail fast and are logged at debug.
    pub fn spawn_pending_poll(&self) -> poll::PollHandle {
        let social = self.social.clone();
        let session = self.session.clone();
        let interval = std::time::Duration::from_secs(self.config.polling.interval_seconds);

        poll::spawn_poller(interval, move || {
            let social = social.clone();
            let session = session.clone();
            async move {
                if !session.snapshot().is_authenticated() {
                    return Ok(());
                }
                social.fetch_pending_incoming().await
            }
        })
    }
}

/// Initialize tracing for binaries and long-lived embedders.
///
/// Honors `RUST_LOG` when set; otherwise falls back to the configured
/// level for this crate.
pub fn init_tracing(logging: &config::LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("akwaba={}", logging.level).into());

    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
