//! Data models
//!
//! Rust structs representing backend entities. The backend owns every
//! mutable entity here; the client holds per-view cache copies and must
//! treat them as possibly stale. Field names follow the backend's wire
//! format (camelCase JSON, Mongo-style `_id`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::roles::OWNER_LEVEL;

// =============================================================================
// Identity
// =============================================================================

/// The signed-in principal, or another member as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    /// Clearance level, 0-6. Source of all authorization decisions.
    pub level: u8,
    #[serde(default)]
    pub is_verified: bool,
    /// Ids of connected (mutual) members
    #[serde(default)]
    pub connections: Vec<String>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Reject identities whose clearance level is outside [0,6].
    /// Applied at the gateway parse boundary.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.level > OWNER_LEVEL {
            return Err(AppError::BadResponse {
                operation: "identity",
                detail: format!("clearance level {} out of range", self.level),
            });
        }
        Ok(())
    }

    pub fn is_banned(&self) -> bool {
        self.level == 0
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A notification attached to an identity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    /// Type: request, accept, like, comment, event
    pub kind: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Social graph
// =============================================================================

/// Relationship between the current identity and another member.
///
/// `None` is the absence state; it is never stored server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    #[default]
    None,
    PendingSent,
    PendingReceived,
    Connected,
}

/// A member row in the directory search results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSearchResult {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub level: Option<u8>,
    #[serde(default)]
    pub connection_status: ConnectionStatus,
}

impl MemberSearchResult {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A pending incoming connection request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRequest {
    #[serde(rename = "_id")]
    pub id: String,
    /// The requesting member
    pub from: MemberSearchResult,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Feed
// =============================================================================

/// Minimal author projection embedded in posts, comments and events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub level: Option<u8>,
}

impl AuthorRef {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A community feed item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: AuthorRef,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Identity ids; an id appears at most once (toggle semantics)
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub reports: Vec<Report>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn liked_by(&self, identity_id: &str) -> bool {
        self.likes.iter().any(|id| id == identity_id)
    }

    pub fn is_reported(&self) -> bool {
        !self.reports.is_empty()
    }
}

/// A comment attached to exactly one post.
///
/// Replies are flattened: `parent_comment_id` is rendering context for a
/// single-level "@name" mention, not a recursive tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub author: AuthorRef,
    pub text: String,
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub parent_comment_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn liked_by(&self, identity_id: &str) -> bool {
        self.likes.iter().any(|id| id == identity_id)
    }
}

/// One report record on a post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub reason: String,
    pub reported_by: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Events
// =============================================================================

/// A scheduled gathering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "_id")]
    pub id: String,
    pub organizer: AuthorRef,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub event_image: Option<String>,
    /// Identity ids; RSVP is idempotent per identity
    #[serde(default)]
    pub attendees: Vec<String>,
}

impl Event {
    pub fn organized_by(&self, identity_id: &str) -> bool {
        self.organizer.id == identity_id
    }

    pub fn attended_by(&self, identity_id: &str) -> bool {
        self.attendees.iter().any(|id| id == identity_id)
    }
}

// =============================================================================
// Admin
// =============================================================================

/// Aggregate counters for the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSummary {
    pub total_users: u64,
    pub verified_users: u64,
    pub total_posts: u64,
    pub total_events: u64,
    pub verification_rate: f64,
}

/// Per-level user count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelCount {
    #[serde(rename = "_id")]
    pub level: u8,
    pub count: u64,
}

/// Admin stats payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub summary: AdminSummary,
    #[serde(default)]
    pub recent_users: Vec<Identity>,
    #[serde(default)]
    pub users_by_level: Vec<LevelCount>,
}

/// System maintenance flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    pub maintenance: bool,
}

// =============================================================================
// Auth payloads
// =============================================================================

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login / ghost-login response: token plus the authenticated identity
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: Identity,
}

/// Signup request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Profile update body; only set fields are sent
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}
