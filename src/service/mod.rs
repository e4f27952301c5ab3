//! Service layer
//!
//! Async engines driving the member directory, community feed, events
//! and admin views. Each service holds its view's fetched lists as a
//! local copy, refreshed by explicit re-fetch; the only cross-service
//! shared state is the session, which the services read but never write.

pub mod account;
pub mod admin;
pub mod events;
pub mod feed;
pub mod search;
pub mod social;

use crate::error::{AppError, Result};

/// An image selected for upload
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub(crate) fn into_part(self) -> Result<reqwest::multipart::Part> {
        reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)
            .map_err(|e| AppError::Validation(format!("Invalid image content type: {e}")))
    }
}

/// Typed proof that the user confirmed a destructive action.
///
/// Delete / deactivate / ban-class operations take this as a
/// precondition argument: the rendering layer constructs it only after
/// its confirmation prompt, so the call cannot be issued accidentally.
#[derive(Debug, Clone, Copy)]
pub struct Confirmation(());

impl Confirmation {
    pub fn confirmed() -> Self {
        Self(())
    }
}
