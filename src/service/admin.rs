//! Admin engine
//!
//! Dashboard statistics, the moderation review queue, and user
//! management (role cycling, bans, deletion, ghost login). Every
//! operation is gated client-side on the current identity's
//! capabilities before any call is issued; the backend enforces the
//! same rules authoritatively.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::data::{AdminStats, Identity, LoginResponse, Post, SystemStatus};
use crate::error::{AppError, Result};
use crate::gateway::{Gateway, routes};
use crate::roles::Role;
use crate::service::Confirmation;
use crate::session::SessionStore;

/// View state owned by the engine
#[derive(Debug, Default, Clone)]
pub struct AdminState {
    pub stats: Option<AdminStats>,
    /// Posts carrying at least one undismissed report
    pub review_queue: Vec<Post>,
    pub system: Option<SystemStatus>,
    pub loading: bool,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct UserIdBody<'a> {
    user_id: &'a str,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct RoleBody<'a> {
    user_id: &'a str,
    level: u8,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct BanBody<'a> {
    user_id: &'a str,
    reason: &'a str,
}

#[derive(serde::Serialize)]
struct MaintenanceBody {
    maintenance: bool,
}

/// Admin engine
pub struct AdminService {
    gateway: Arc<Gateway>,
    session: Arc<SessionStore>,
    state: RwLock<AdminState>,
}

impl AdminService {
    pub fn new(gateway: Arc<Gateway>, session: Arc<SessionStore>) -> Self {
        Self {
            gateway,
            session,
            state: RwLock::new(AdminState::default()),
        }
    }

    /// Current view state snapshot
    pub async fn state(&self) -> AdminState {
        self.state.read().await.clone()
    }

    /// Fetch the dashboard aggregates.
    pub async fn fetch_stats(&self) -> Result<()> {
        self.require_user_management()?;

        self.state.write().await.loading = true;
        let result: Result<AdminStats> = self
            .gateway
            .get_json(&routes::admin_stats(), "admin_stats")
            .await;

        let mut state = self.state.write().await;
        state.loading = false;
        state.stats = Some(result?);
        Ok(())
    }

    /// Rebuild the review queue: the full post list filtered to posts
    /// with at least one report. The queue is derived, never stored
    /// server-side as its own collection.
    pub async fn fetch_review_queue(&self) -> Result<()> {
        self.require_moderation()?;

        let posts: Vec<Post> = self.gateway.get_json(&routes::posts(), "posts").await?;
        let queue: Vec<Post> = posts.into_iter().filter(Post::is_reported).collect();

        tracing::debug!(reported = queue.len(), "Review queue refreshed");
        self.state.write().await.review_queue = queue;
        Ok(())
    }

    /// Clear all reports on a post, keeping the post. The entry leaves
    /// the local queue immediately.
    pub async fn dismiss_reports(&self, post_id: &str) -> Result<()> {
        self.require_moderation()?;

        self.gateway
            .put_empty(&routes::dismiss_reports(post_id))
            .await?;
        self.state
            .write()
            .await
            .review_queue
            .retain(|post| post.id != post_id);
        tracing::info!(post = %post_id, "Reports dismissed");
        Ok(())
    }

    /// Delete a reported post outright.
    pub async fn delete_reported_post(
        &self,
        post_id: &str,
        _confirm: Confirmation,
    ) -> Result<()> {
        self.require_moderation()?;

        self.gateway.delete(&routes::post(post_id)).await?;
        self.state
            .write()
            .await
            .review_queue
            .retain(|post| post.id != post_id);
        tracing::info!(post = %post_id, "Reported post deleted");
        Ok(())
    }

    /// Advance a user's clearance level one step in the management
    /// cycle: member tiers climb toward administrator, administrator
    /// and above wrap back to the first member tier. Banning is not
    /// part of the cycle; see [`ban_user`](Self::ban_user).
    pub async fn cycle_role(&self, user: &Identity) -> Result<u8> {
        self.require_user_management()?;

        let next = Role::next_cycle_level(user.level);
        self.gateway
            .patch_json_empty(
                &routes::admin_update_role(),
                &RoleBody {
                    user_id: &user.id,
                    level: next,
                },
            )
            .await?;
        tracing::info!(user = %user.id, from = user.level, to = next, "Role updated");
        Ok(next)
    }

    /// Ban a user (set level 0). The reason is mandatory and recorded
    /// server-side; an empty reason aborts client-side without a call.
    pub async fn ban_user(
        &self,
        user_id: &str,
        reason: &str,
        _confirm: Confirmation,
    ) -> Result<()> {
        self.require_user_management()?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation("A ban needs a reason".to_string()));
        }

        self.gateway
            .patch_json_empty(&routes::admin_ban(), &BanBody { user_id, reason })
            .await?;
        tracing::warn!(user = %user_id, "User banned");
        Ok(())
    }

    /// Permanently delete a user account and its content.
    pub async fn delete_user(&self, user_id: &str, _confirm: Confirmation) -> Result<()> {
        self.require_user_management()?;

        self.gateway
            .delete(&routes::admin_delete_user(user_id))
            .await?;
        tracing::warn!(user = %user_id, "User deleted");
        Ok(())
    }

    /// Sign in as another member for support purposes.
    ///
    /// The backend issues a token scoped to the target user; the current
    /// session is replaced wholesale, exactly as if the target had
    /// logged in. Returning to the admin account requires a fresh login.
    pub async fn ghost_login(&self, user_id: &str, _confirm: Confirmation) -> Result<Identity> {
        self.require_user_management()?;

        let response: LoginResponse = self
            .gateway
            .post_json(
                &routes::admin_ghost_login(),
                &UserIdBody { user_id },
                "ghost_login",
            )
            .await?;

        tracing::warn!(target = %user_id, "Ghost login");
        self.session.login(response.token, response.user.clone())?;
        Ok(response.user)
    }

    /// Re-send the verification email to a user.
    pub async fn resend_verification(&self, user_id: &str) -> Result<()> {
        self.require_user_management()?;

        self.gateway
            .post_json_empty(&routes::admin_resend_verification(), &UserIdBody { user_id })
            .await?;
        tracing::info!(user = %user_id, "Verification email re-sent");
        Ok(())
    }

    /// Trigger a password-reset email for a user.
    pub async fn trigger_password_reset(&self, user_id: &str) -> Result<()> {
        self.require_user_management()?;

        self.gateway
            .post_json_empty(&routes::admin_trigger_reset(), &UserIdBody { user_id })
            .await?;
        tracing::info!(user = %user_id, "Password reset triggered");
        Ok(())
    }

    /// Fetch the system maintenance flag.
    pub async fn fetch_system_status(&self) -> Result<SystemStatus> {
        self.require_system_access()?;

        let status: SystemStatus = self
            .gateway
            .get_json(&routes::admin_system_status(), "system_status")
            .await?;
        self.state.write().await.system = Some(status.clone());
        Ok(status)
    }

    /// Flip the system maintenance flag. Owner only.
    pub async fn set_maintenance(&self, maintenance: bool, _confirm: Confirmation) -> Result<()> {
        self.require_system_access()?;

        self.gateway
            .patch_json_empty(
                &routes::admin_system_status(),
                &MaintenanceBody { maintenance },
            )
            .await?;
        self.state.write().await.system = Some(SystemStatus { maintenance });
        tracing::warn!(maintenance, "Maintenance flag changed");
        Ok(())
    }

    fn capabilities(&self) -> Result<crate::roles::Capabilities> {
        let Some(me) = self.session.snapshot().identity else {
            return Err(AppError::Unauthorized);
        };
        Ok(Role::from_level(Some(me.level)).capabilities)
    }

    fn require_moderation(&self) -> Result<()> {
        if self.capabilities()?.can_moderate {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    fn require_user_management(&self) -> Result<()> {
        if self.capabilities()?.can_manage_users {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    fn require_system_access(&self) -> Result<()> {
        if self.capabilities()?.can_access_system {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
