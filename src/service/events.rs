//! Events engine
//!
//! Upcoming-events list, event creation, RSVP, and organizer-side
//! deletion. RSVP is a backend-owned toggle like post likes, so the
//! engine re-fetches after every attendance change instead of editing
//! the attendee list locally.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::data::Event;
use crate::error::{AppError, Result};
use crate::gateway::{Gateway, routes};
use crate::roles::Role;
use crate::service::{Confirmation, ImageUpload};
use crate::session::SessionStore;

/// Draft of a new event
#[derive(Debug, Clone)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: Option<String>,
    /// Optional banner image; switches the payload to multipart
    pub image: Option<ImageUpload>,
}

/// View state owned by the engine
#[derive(Debug, Default, Clone)]
pub struct EventsState {
    /// Soonest-first, as returned by the backend
    pub events: Vec<Event>,
    pub loading: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateEventBody<'a> {
    title: &'a str,
    description: &'a str,
    date: DateTime<Utc>,
    location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
}

/// Events engine
pub struct EventsService {
    gateway: Arc<Gateway>,
    session: Arc<SessionStore>,
    state: RwLock<EventsState>,
}

impl EventsService {
    pub fn new(gateway: Arc<Gateway>, session: Arc<SessionStore>) -> Self {
        Self {
            gateway,
            session,
            state: RwLock::new(EventsState::default()),
        }
    }

    /// Current view state snapshot
    pub async fn state(&self) -> EventsState {
        self.state.read().await.clone()
    }

    /// Replace the event list from the backend.
    pub async fn fetch_events(&self) -> Result<()> {
        self.state.write().await.loading = true;
        let result: Result<Vec<Event>> = self.gateway.get_json(&routes::events(), "events").await;

        let mut state = self.state.write().await;
        state.loading = false;
        state.events = result?;
        Ok(())
    }

    /// Create an event with the current identity as organizer.
    ///
    /// Title, description and location are required; banned and
    /// unverified identities cannot organize.
    pub async fn create_event(&self, draft: &EventDraft) -> Result<()> {
        let Some(me) = self.session.snapshot().identity else {
            return Err(AppError::Unauthorized);
        };
        if !me.is_verified || Role::from_level(Some(me.level)).capabilities.is_banned {
            return Err(AppError::Forbidden);
        }

        let title = draft.title.trim();
        let description = draft.description.trim();
        let location = draft.location.trim();
        if title.is_empty() || description.is_empty() || location.is_empty() {
            return Err(AppError::Validation(
                "Title, description and location are required".to_string(),
            ));
        }

        match draft.image.clone() {
            Some(image) => {
                let mut form = reqwest::multipart::Form::new()
                    .text("title", title.to_string())
                    .text("description", description.to_string())
                    .text("date", draft.date.to_rfc3339())
                    .text("location", location.to_string())
                    .part("eventImage", image.into_part()?);
                if let Some(category) = &draft.category {
                    form = form.text("category", category.clone());
                }
                let _: Event = self
                    .gateway
                    .post_multipart(&routes::events(), form, "create_event")
                    .await?;
            }
            None => {
                let _: Event = self
                    .gateway
                    .post_json(
                        &routes::events(),
                        &CreateEventBody {
                            title,
                            description,
                            date: draft.date,
                            location,
                            category: draft.category.as_deref(),
                        },
                        "create_event",
                    )
                    .await?;
            }
        }

        tracing::info!(%title, "Event created");
        self.fetch_events().await
    }

    /// Toggle the current identity's attendance, then re-fetch for the
    /// authoritative attendee list.
    pub async fn rsvp(&self, event_id: &str) -> Result<()> {
        let Some(me) = self.session.snapshot().identity else {
            return Err(AppError::Unauthorized);
        };
        if Role::from_level(Some(me.level)).capabilities.is_banned {
            return Err(AppError::Forbidden);
        }

        self.gateway.post_empty(&routes::rsvp(event_id)).await?;
        self.fetch_events().await
    }

    /// Delete an event. Permitted only for its organizer or an identity
    /// with moderation capability; irreversible, hence the confirmation
    /// token.
    pub async fn delete_event(&self, event_id: &str, _confirm: Confirmation) -> Result<()> {
        let Some(me) = self.session.snapshot().identity else {
            return Err(AppError::Unauthorized);
        };

        let known = {
            let state = self.state.read().await;
            state.events.iter().find(|e| e.id == event_id).cloned()
        };
        if let Some(event) = known
            && !event.organized_by(&me.id)
            && !Role::from_level(Some(me.level)).capabilities.can_moderate
        {
            return Err(AppError::Forbidden);
        }

        self.gateway.delete(&routes::event(event_id)).await?;
        tracing::info!(event = %event_id, "Event deleted");
        self.fetch_events().await
    }
}
