//! Route catalog
//!
//! Fixed map from logical operation to backend path, parameterized where
//! an id is required. Every other module goes through these functions so
//! no call site hardcodes a path.

// --- Auth ---

pub fn login() -> String {
    "/auth/login".to_string()
}

pub fn signup() -> String {
    "/auth/signup".to_string()
}

pub fn me() -> String {
    "/auth/me".to_string()
}

pub fn resend_verification() -> String {
    "/auth/resend-verification".to_string()
}

pub fn forgot_password() -> String {
    "/auth/forgot-password".to_string()
}

pub fn reset_password() -> String {
    "/auth/reset-password".to_string()
}

// --- Users / profile ---

pub fn profile() -> String {
    "/users/profile".to_string()
}

pub fn profile_of(user_id: &str) -> String {
    format!("/users/profile/{user_id}")
}

pub fn change_password() -> String {
    "/users/profile/password".to_string()
}

pub fn deactivate() -> String {
    "/users/profile/deactivate".to_string()
}

pub fn upload_avatar() -> String {
    "/users/profile-picture".to_string()
}

pub fn search_members(query: &str) -> String {
    format!("/users/search?query={}", urlencoding::encode(query))
}

// --- Social graph ---

pub fn send_request(target_id: &str) -> String {
    format!("/users/request/{target_id}")
}

pub fn accept_request(requester_id: &str) -> String {
    format!("/users/accept/{requester_id}")
}

pub fn decline_request(requester_id: &str) -> String {
    format!("/users/decline/{requester_id}")
}

pub fn remove_connection(friend_id: &str) -> String {
    format!("/users/connection/{friend_id}")
}

pub fn friends() -> String {
    "/users/friends".to_string()
}

pub fn pending_requests() -> String {
    "/users/requests/pending".to_string()
}

pub fn mark_notifications_read() -> String {
    "/users/notifications/read".to_string()
}

// --- Posts ---

pub fn posts() -> String {
    "/posts".to_string()
}

pub fn post(post_id: &str) -> String {
    format!("/posts/{post_id}")
}

pub fn like_post(post_id: &str) -> String {
    format!("/posts/{post_id}/like")
}

pub fn comments(post_id: &str) -> String {
    format!("/posts/{post_id}/comments")
}

pub fn comment(post_id: &str, comment_id: &str) -> String {
    format!("/posts/{post_id}/comments/{comment_id}")
}

pub fn like_comment(post_id: &str, comment_id: &str) -> String {
    format!("/posts/{post_id}/comment/{comment_id}/like")
}

pub fn report_post(post_id: &str) -> String {
    format!("/posts/{post_id}/report")
}

pub fn dismiss_reports(post_id: &str) -> String {
    format!("/posts/{post_id}/dismiss-reports")
}

// --- Events ---

pub fn events() -> String {
    "/events".to_string()
}

pub fn event(event_id: &str) -> String {
    format!("/events/{event_id}")
}

pub fn search_events(query: &str) -> String {
    format!("/events/search?query={}", urlencoding::encode(query))
}

pub fn rsvp(event_id: &str) -> String {
    format!("/events/{event_id}/rsvp")
}

// --- Admin ---

pub fn admin_stats() -> String {
    "/admin/stats".to_string()
}

pub fn admin_update_role() -> String {
    "/admin/users/role".to_string()
}

pub fn admin_ban() -> String {
    "/admin/users/ban".to_string()
}

pub fn admin_delete_user(user_id: &str) -> String {
    format!("/admin/users/{user_id}")
}

pub fn admin_ghost_login() -> String {
    "/admin/ghost-login".to_string()
}

pub fn admin_resend_verification() -> String {
    "/admin/resend-verification".to_string()
}

pub fn admin_trigger_reset() -> String {
    "/admin/trigger-reset".to_string()
}

pub fn admin_system_status() -> String {
    "/admin/system-status".to_string()
}
