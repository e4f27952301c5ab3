//! Community feed engine
//!
//! Post list, compose draft, per-post comment panels, and the member
//! side of moderation (delete own content, report). Posts are never
//! optimistically inserted: the backend computes derived author and
//! role display data the client does not have, so every mutation is
//! followed by a full re-fetch of the authoritative feed.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::data::Post;
use crate::error::{AppError, Result};
use crate::gateway::{Gateway, routes};
use crate::roles::Role;
use crate::service::{Confirmation, ImageUpload};
use crate::session::SessionStore;

/// Draft of the post being composed
#[derive(Debug, Default, Clone)]
pub struct ComposeDraft {
    pub content: String,
    pub image: Option<ImageUpload>,
}

/// UI state for one post's comment panel
#[derive(Debug, Default, Clone)]
pub struct PostPanel {
    pub open: bool,
    pub draft: String,
    /// Comment being replied to: (comment id, author display name).
    /// Replies are flattened into an "@name" mention, not nested.
    pub reply_target: Option<(String, String)>,
}

/// View state owned by the engine
#[derive(Debug, Default, Clone)]
pub struct FeedState {
    /// Most-recent-first, as returned by the backend
    pub posts: Vec<Post>,
    pub compose: ComposeDraft,
    pub panels: HashMap<String, PostPanel>,
    pub loading: bool,
}

#[derive(serde::Serialize)]
struct CreatePostBody<'a> {
    content: &'a str,
    location: &'a str,
}

#[derive(serde::Serialize)]
struct CommentBody<'a> {
    text: &'a str,
    #[serde(rename = "parentCommentId", skip_serializing_if = "Option::is_none")]
    parent_comment_id: Option<&'a str>,
}

#[derive(serde::Serialize)]
struct ReportBody<'a> {
    reason: &'a str,
}

/// Community feed engine
pub struct FeedService {
    gateway: Arc<Gateway>,
    session: Arc<SessionStore>,
    state: RwLock<FeedState>,
}

impl FeedService {
    pub fn new(gateway: Arc<Gateway>, session: Arc<SessionStore>) -> Self {
        Self {
            gateway,
            session,
            state: RwLock::new(FeedState::default()),
        }
    }

    /// Current view state snapshot
    pub async fn state(&self) -> FeedState {
        self.state.read().await.clone()
    }

    /// Whether the current identity may compose posts.
    ///
    /// Unverified members see a verification prompt instead of the
    /// compose control; banned identities never compose.
    pub fn can_compose(&self) -> bool {
        match self.session.snapshot().identity {
            Some(identity) => {
                identity.is_verified
                    && !Role::from_level(Some(identity.level)).capabilities.is_banned
            }
            None => false,
        }
    }

    /// Replace the post list from the backend (most-recent-first).
    pub async fn fetch_feed(&self) -> Result<()> {
        self.state.write().await.loading = true;
        let result: Result<Vec<Post>> = self.gateway.get_json(&routes::posts(), "posts").await;

        let mut state = self.state.write().await;
        state.loading = false;
        state.posts = result?;
        Ok(())
    }

    /// Update the compose draft text.
    pub async fn set_compose_content(&self, content: &str) {
        self.state.write().await.compose.content = content.to_string();
    }

    /// Attach or clear the compose draft image.
    pub async fn set_compose_image(&self, image: Option<ImageUpload>) {
        self.state.write().await.compose.image = image;
    }

    /// Submit the compose draft as a new post.
    ///
    /// Requires content or an image. Uses a multipart payload when an
    /// image is present, JSON otherwise. On success the draft is cleared
    /// and the feed re-fetched; nothing is inserted optimistically.
    pub async fn create_post(&self) -> Result<()> {
        if !self.can_compose() {
            return Err(AppError::Forbidden);
        }

        let draft = {
            let state = self.state.read().await;
            state.compose.clone()
        };

        let content = draft.content.trim().to_string();
        if content.is_empty() && draft.image.is_none() {
            return Err(AppError::Validation(
                "A post needs text or an image".to_string(),
            ));
        }

        let location = self
            .session
            .snapshot()
            .identity
            .and_then(|identity| identity.city)
            .unwrap_or_default();

        match draft.image {
            Some(image) => {
                let form = reqwest::multipart::Form::new()
                    .text("content", content)
                    .text("location", location)
                    .part("image", image.into_part()?);
                let _: Post = self
                    .gateway
                    .post_multipart(&routes::posts(), form, "create_post")
                    .await?;
            }
            None => {
                let _: Post = self
                    .gateway
                    .post_json(
                        &routes::posts(),
                        &CreatePostBody {
                            content: &content,
                            location: &location,
                        },
                        "create_post",
                    )
                    .await?;
            }
        }

        tracing::info!("Post created");
        self.state.write().await.compose = ComposeDraft::default();
        self.fetch_feed().await
    }

    /// Toggle the current identity's like on a post.
    ///
    /// The backend owns the toggle: the same call likes or unlikes
    /// depending on prior state, so the client never tracks the
    /// transition itself and re-fetches for the authoritative set.
    pub async fn toggle_like(&self, post_id: &str) -> Result<()> {
        self.gateway.put_empty(&routes::like_post(post_id)).await?;
        self.fetch_feed().await
    }

    /// Toggle the current identity's like on a comment.
    pub async fn toggle_comment_like(&self, post_id: &str, comment_id: &str) -> Result<()> {
        self.gateway
            .put_empty(&routes::like_comment(post_id, comment_id))
            .await?;
        self.fetch_feed().await
    }

    /// Open or close a post's comment panel.
    pub async fn toggle_comments(&self, post_id: &str) {
        let mut state = self.state.write().await;
        let panel = state.panels.entry(post_id.to_string()).or_default();
        panel.open = !panel.open;
    }

    /// Set or clear the reply target for a post's comment draft.
    pub async fn set_reply_target(&self, post_id: &str, target: Option<(String, String)>) {
        let mut state = self.state.write().await;
        state
            .panels
            .entry(post_id.to_string())
            .or_default()
            .reply_target = target;
    }

    /// Update a post's comment draft text.
    pub async fn set_comment_draft(&self, post_id: &str, draft: &str) {
        let mut state = self.state.write().await;
        state.panels.entry(post_id.to_string()).or_default().draft = draft.to_string();
    }

    /// Submit a post's comment draft.
    ///
    /// When a reply target is set, the text is prefixed with an
    /// "@name " mention and the parent comment id is sent for context;
    /// replies stay single-level. Clears the draft and reply target on
    /// success, then re-fetches.
    pub async fn add_comment(&self, post_id: &str) -> Result<()> {
        let (draft, reply_target) = {
            let state = self.state.read().await;
            let panel = state.panels.get(post_id).cloned().unwrap_or_default();
            (panel.draft, panel.reply_target)
        };

        let draft = draft.trim().to_string();
        if draft.is_empty() {
            return Err(AppError::Validation("Comment text is required".to_string()));
        }

        let (text, parent_id) = match &reply_target {
            Some((comment_id, name)) => (format!("@{name} {draft}"), Some(comment_id.as_str())),
            None => (draft, None),
        };

        self.gateway
            .post_json_empty(
                &routes::comments(post_id),
                &CommentBody {
                    text: &text,
                    parent_comment_id: parent_id,
                },
            )
            .await?;

        {
            let mut state = self.state.write().await;
            let panel = state.panels.entry(post_id.to_string()).or_default();
            panel.draft.clear();
            panel.reply_target = None;
        }
        self.fetch_feed().await
    }

    /// Delete a post. Permitted only for its author or an identity with
    /// moderation capability; irreversible, hence the confirmation token.
    pub async fn delete_post(&self, post_id: &str, _confirm: Confirmation) -> Result<()> {
        self.ensure_may_delete_post(post_id).await?;
        self.gateway.delete(&routes::post(post_id)).await?;
        tracing::info!(post = %post_id, "Post deleted");
        self.fetch_feed().await
    }

    /// Delete a comment. Same ownership-or-moderator rule as posts.
    pub async fn delete_comment(
        &self,
        post_id: &str,
        comment_id: &str,
        _confirm: Confirmation,
    ) -> Result<()> {
        self.ensure_may_delete_comment(post_id, comment_id).await?;
        self.gateway
            .delete(&routes::comment(post_id, comment_id))
            .await?;
        tracing::info!(post = %post_id, comment = %comment_id, "Comment deleted");
        self.fetch_feed().await
    }

    /// Report a post. The reason is mandatory: an empty reason aborts
    /// client-side without a call. The local report list is never
    /// mutated; the admin queue sees the report on its next fetch.
    pub async fn report_post(&self, post_id: &str, reason: &str) -> Result<()> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "A report needs a reason".to_string(),
            ));
        }

        self.gateway
            .post_json_empty(&routes::report_post(post_id), &ReportBody { reason })
            .await?;
        tracing::info!(post = %post_id, "Post reported");
        Ok(())
    }

    async fn ensure_may_delete_post(&self, post_id: &str) -> Result<()> {
        let Some(me) = self.session.snapshot().identity else {
            return Err(AppError::Unauthorized);
        };
        let state = self.state.read().await;
        let Some(post) = state.posts.iter().find(|post| post.id == post_id) else {
            // Unknown locally; let the backend be the judge.
            return Ok(());
        };
        if post.author.id == me.id || Role::from_level(Some(me.level)).capabilities.can_moderate {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }

    async fn ensure_may_delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        let Some(me) = self.session.snapshot().identity else {
            return Err(AppError::Unauthorized);
        };
        let state = self.state.read().await;
        let comment = state
            .posts
            .iter()
            .find(|post| post.id == post_id)
            .and_then(|post| post.comments.iter().find(|c| c.id == comment_id));
        let Some(comment) = comment else {
            return Ok(());
        };
        if comment.author.id == me.id
            || Role::from_level(Some(me.level)).capabilities.can_moderate
        {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
