//! Social interaction engine
//!
//! Friend-request lifecycle, debounced member/event search, and the
//! pending-incoming list. Updates are optimistic where the outcome is
//! unambiguous (a sent request becomes pending, an answered request
//! leaves the queue) and reverted if the backend call fails. The engine
//! never invents a `Connected` state locally; mutual connection is only
//! trusted once a backend fetch confirms it.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;

use crate::data::{ConnectionStatus, Event, MemberSearchResult, PendingRequest};
use crate::error::Result;
use crate::gateway::{Gateway, routes};
use crate::service::search::SearchSequencer;
use crate::session::SessionStore;

/// View state owned by the engine
#[derive(Debug, Default, Clone)]
pub struct SocialState {
    pub members: Vec<MemberSearchResult>,
    pub events: Vec<Event>,
    pub friends: Vec<MemberSearchResult>,
    pub pending: Vec<PendingRequest>,
    pub loading: bool,
}

/// Social interaction engine
pub struct SocialService {
    gateway: Arc<Gateway>,
    session: Arc<SessionStore>,
    state: RwLock<SocialState>,
    member_search: SearchSequencer,
    event_search: SearchSequencer,
    /// Request ids with an answer call in flight; blocks double-fire
    answering: Mutex<HashSet<String>>,
    min_query_len: usize,
}

impl SocialService {
    pub fn new(
        gateway: Arc<Gateway>,
        session: Arc<SessionStore>,
        debounce: Duration,
        min_query_len: usize,
    ) -> Self {
        Self {
            gateway,
            session,
            state: RwLock::new(SocialState::default()),
            member_search: SearchSequencer::new(debounce),
            event_search: SearchSequencer::new(debounce),
            answering: Mutex::new(HashSet::new()),
            min_query_len,
        }
    }

    /// Current view state snapshot
    pub async fn state(&self) -> SocialState {
        self.state.read().await.clone()
    }

    /// Debounced member search.
    ///
    /// An empty or whitespace query clears the results without a call;
    /// a query shorter than the configured minimum is a no-op. Rapid
    /// edits inside the debounce window collapse into a single call for
    /// the final text, and a response to a superseded query is dropped.
    pub async fn search_members(&self, query: &str) -> Result<()> {
        let query = query.trim().to_string();
        if query.is_empty() {
            self.state.write().await.members.clear();
            return Ok(());
        }
        if query.chars().count() < self.min_query_len {
            return Ok(());
        }

        let ticket = self.member_search.begin();
        if !self.member_search.settle(ticket).await {
            return Ok(());
        }

        self.state.write().await.loading = true;
        let result: Result<Vec<MemberSearchResult>> = self
            .gateway
            .get_json(&routes::search_members(&query), "search_members")
            .await;

        // Only the current search owns the loading flag; a superseded
        // response must not clear it under a newer in-flight query.
        let mut state = self.state.write().await;
        let current = self.member_search.is_current(ticket);
        if current {
            state.loading = false;
        }
        match result {
            Ok(members) => {
                if current {
                    state.members = members;
                }
                Ok(())
            }
            Err(error) => {
                tracing::debug!(%error, "Member search failed");
                Err(error)
            }
        }
    }

    /// Debounced event search; same rules as member search.
    pub async fn search_events(&self, query: &str) -> Result<()> {
        let query = query.trim().to_string();
        if query.is_empty() {
            self.state.write().await.events.clear();
            return Ok(());
        }
        if query.chars().count() < self.min_query_len {
            return Ok(());
        }

        let ticket = self.event_search.begin();
        if !self.event_search.settle(ticket).await {
            return Ok(());
        }

        self.state.write().await.loading = true;
        let result: Result<Vec<Event>> = self
            .gateway
            .get_json(&routes::search_events(&query), "search_events")
            .await;

        let mut state = self.state.write().await;
        let current = self.event_search.is_current(ticket);
        if current {
            state.loading = false;
        }
        match result {
            Ok(events) => {
                if current {
                    state.events = events;
                }
                Ok(())
            }
            Err(error) => {
                tracing::debug!(%error, "Event search failed");
                Err(error)
            }
        }
    }

    /// Send a connection request.
    ///
    /// A request to self is a silent no-op. On success the cached search
    /// entry flips to `PendingSent` immediately; if the call fails the
    /// flip is reverted so the UI never shows a request that was not
    /// actually created.
    pub async fn send_request(&self, target_id: &str) -> Result<()> {
        if let Some(me) = self.session.snapshot().identity
            && me.id == target_id
        {
            tracing::debug!("Ignoring connection request to self");
            return Ok(());
        }

        let previous = self
            .set_member_status(target_id, ConnectionStatus::PendingSent)
            .await;

        match self.gateway.post_empty(&routes::send_request(target_id)).await {
            Ok(()) => {
                tracing::info!(target = %target_id, "Connection request sent");
                Ok(())
            }
            Err(error) => {
                if let Some(previous) = previous {
                    self.set_member_status(target_id, previous).await;
                }
                Err(error)
            }
        }
    }

    /// Accept a pending incoming request.
    ///
    /// Removes the entry from the pending list optimistically and
    /// restores it on failure. Returns true when the backend confirmed,
    /// so the caller can decide whether to re-fetch dependent lists.
    /// A second call while the first is in flight is a no-op.
    pub async fn accept_request(&self, requester_id: &str) -> Result<bool> {
        self.answer_request(requester_id, &routes::accept_request(requester_id))
            .await
    }

    /// Decline a pending incoming request; same lockout and optimistic
    /// removal semantics as accept.
    pub async fn decline_request(&self, requester_id: &str) -> Result<bool> {
        self.answer_request(requester_id, &routes::decline_request(requester_id))
            .await
    }

    async fn answer_request(&self, requester_id: &str, path: &str) -> Result<bool> {
        {
            let mut answering = self.answering.lock().expect("answering lock poisoned");
            if !answering.insert(requester_id.to_string()) {
                tracing::debug!(requester = %requester_id, "Answer already in flight; ignoring");
                return Ok(false);
            }
        }

        let removed = self.take_pending(requester_id).await;
        let result = self.gateway.post_empty(path).await;

        {
            let mut answering = self.answering.lock().expect("answering lock poisoned");
            answering.remove(requester_id);
        }

        match result {
            Ok(()) => Ok(true),
            Err(error) => {
                if let Some(entry) = removed {
                    self.state.write().await.pending.push(entry);
                }
                Err(error)
            }
        }
    }

    /// Replace the friend list from the backend.
    pub async fn fetch_friends(&self) -> Result<()> {
        let friends: Vec<MemberSearchResult> = self
            .gateway
            .get_json(&routes::friends(), "friends")
            .await?;
        self.state.write().await.friends = friends;
        Ok(())
    }

    /// Remove an established connection, then re-fetch the friend list
    /// for the authoritative state.
    pub async fn remove_friend(&self, friend_id: &str) -> Result<()> {
        self.gateway
            .delete(&routes::remove_connection(friend_id))
            .await?;
        tracing::info!(friend = %friend_id, "Connection removed");
        self.fetch_friends().await
    }

    /// Replace the pending-incoming list wholesale. Idempotent; safe to
    /// poll.
    pub async fn fetch_pending_incoming(&self) -> Result<()> {
        let pending: Vec<PendingRequest> = self
            .gateway
            .get_json(&routes::pending_requests(), "pending_requests")
            .await?;
        self.state.write().await.pending = pending;
        Ok(())
    }

    async fn set_member_status(
        &self,
        member_id: &str,
        status: ConnectionStatus,
    ) -> Option<ConnectionStatus> {
        let mut state = self.state.write().await;
        let member = state.members.iter_mut().find(|m| m.id == member_id)?;
        let previous = member.connection_status;
        member.connection_status = status;
        Some(previous)
    }

    async fn take_pending(&self, requester_id: &str) -> Option<PendingRequest> {
        let mut state = self.state.write().await;
        let index = state
            .pending
            .iter()
            .position(|request| request.from.id == requester_id)?;
        Some(state.pending.remove(index))
    }
}
