//! Account engine
//!
//! Self-service profile operations: edits, password changes, avatar
//! upload, verification and password-reset mails, deactivation, and
//! notification acknowledgement. Mutations that change the identity
//! refresh the session store afterwards so every consumer sees the
//! backend's authoritative copy.

use std::sync::Arc;

use crate::data::{Identity, ProfileUpdate};
use crate::error::{AppError, Result};
use crate::gateway::{Gateway, routes};
use crate::service::{Confirmation, ImageUpload};
use crate::session::SessionStore;

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordBody<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

#[derive(serde::Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordBody<'a> {
    token: &'a str,
    new_password: &'a str,
}

/// Account engine
pub struct AccountService {
    gateway: Arc<Gateway>,
    session: Arc<SessionStore>,
}

impl AccountService {
    pub fn new(gateway: Arc<Gateway>, session: Arc<SessionStore>) -> Self {
        Self { gateway, session }
    }

    /// Fetch another member's public profile.
    pub async fn fetch_profile(&self, user_id: &str) -> Result<Identity> {
        let identity: Identity = self
            .gateway
            .get_json(&routes::profile_of(user_id), "profile")
            .await?;
        identity.validate()?;
        Ok(identity)
    }

    /// Apply a partial profile update, then refresh the session identity.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Identity> {
        let _: Identity = self
            .gateway
            .put_json(&routes::profile(), update, "update_profile")
            .await?;
        tracing::info!("Profile updated");
        self.session.refresh().await
    }

    /// Change the account password.
    ///
    /// The confirmation copy is compared client-side; a mismatch or a
    /// short new password aborts without a call.
    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm_copy: &str,
    ) -> Result<()> {
        if new != confirm_copy {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        if new.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        self.gateway
            .put_json_empty(
                &routes::change_password(),
                &ChangePasswordBody {
                    current_password: current,
                    new_password: new,
                },
            )
            .await?;
        tracing::info!("Password changed");
        Ok(())
    }

    /// Upload a new avatar image, then refresh the session identity so
    /// the new image URL is visible everywhere.
    pub async fn upload_avatar(&self, image: ImageUpload) -> Result<Identity> {
        let form = reqwest::multipart::Form::new().part("profilePicture", image.into_part()?);

        let _: Identity = self
            .gateway
            .post_multipart(&routes::upload_avatar(), form, "upload_avatar")
            .await?;
        tracing::info!("Avatar uploaded");
        self.session.refresh().await
    }

    /// Deactivate the account and end the session.
    pub async fn deactivate(&self, _confirm: Confirmation) -> Result<()> {
        self.gateway.patch_empty(&routes::deactivate()).await?;
        tracing::warn!("Account deactivated");
        self.session.logout()
    }

    /// Permanently delete the account and end the session.
    pub async fn delete_self(&self, _confirm: Confirmation) -> Result<()> {
        self.gateway.delete(&routes::profile()).await?;
        tracing::warn!("Account deleted");
        self.session.logout()
    }

    /// Re-send the verification email for the current account.
    pub async fn resend_verification(&self) -> Result<()> {
        self.gateway
            .post_empty(&routes::resend_verification())
            .await?;
        tracing::info!("Verification email requested");
        Ok(())
    }

    /// Request a password-reset email. Unauthenticated; the backend
    /// answers success regardless of whether the address exists.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }

        self.gateway
            .post_json_empty(&routes::forgot_password(), &EmailBody { email })
            .await?;
        tracing::info!("Password reset requested");
        Ok(())
    }

    /// Complete a password reset with the emailed token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        if new_password.len() < 8 {
            return Err(AppError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        self.gateway
            .post_json_empty(
                &routes::reset_password(),
                &ResetPasswordBody {
                    token,
                    new_password,
                },
            )
            .await?;
        tracing::info!("Password reset completed");
        Ok(())
    }

    /// Mark all notifications read, then refresh the session identity so
    /// the unread badge clears.
    pub async fn mark_notifications_read(&self) -> Result<Identity> {
        self.gateway
            .patch_empty(&routes::mark_notifications_read())
            .await?;
        self.session.refresh().await
    }
}
