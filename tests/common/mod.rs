//! Common test utilities for E2E tests
//!
//! Spins up an in-process mock of the community backend on a random
//! port and builds application cores pointed at it. The mock keeps its
//! world in a single mutex-guarded state struct that tests seed and
//! inspect directly.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use akwaba::config;
use akwaba::session::{MemoryTokenStore, TokenStore};
use akwaba::AppCore;

pub type Shared = Arc<Mutex<BackendState>>;

/// Mutable world of the mock backend
#[derive(Default)]
pub struct BackendState {
    /// user id -> identity JSON (wire shape)
    pub users: HashMap<String, Value>,
    /// email -> (password, user id)
    pub credentials: HashMap<String, (String, String)>,
    /// bearer token -> user id
    pub tokens: HashMap<String, String>,
    pub posts: Vec<Value>,
    pub events: Vec<Value>,
    /// pending incoming requests for the signed-in test user
    pub pending: Vec<Value>,
    /// established connections for the signed-in test user
    pub friends: Vec<Value>,
    pub maintenance: bool,
    /// artificial latency for member search responses, in milliseconds
    pub search_delay_ms: u64,
    /// call counters for debounce / idempotency assertions
    pub search_calls: u32,
    pub accept_calls: u32,
    pub rsvp_calls: u32,
}

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: Shared,
}

impl TestServer {
    /// Create a new mock backend on a random port
    pub async fn new() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState::default()));
        let app = mock_router(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    /// Build an application core pointed at this mock, with an
    /// in-memory token store
    pub fn core(&self) -> AppCore {
        self.core_with_store(Arc::new(MemoryTokenStore::new()))
    }

    /// Build an application core with an explicit token store
    pub fn core_with_store(&self, store: Arc<dyn TokenStore>) -> AppCore {
        let config = config::AppConfig {
            api: config::ApiConfig {
                base_url: format!("{}/api", self.addr),
                timeout_seconds: 5,
                user_agent: "akwaba-e2e".to_string(),
            },
            session: config::SessionConfig {
                token_path: "/tmp/akwaba-e2e-unused".into(),
            },
            search: config::SearchConfig {
                // Short debounce keeps the suite fast while still
                // exercising the window
                debounce_ms: 25,
                min_query_len: 2,
            },
            polling: config::PollingConfig {
                interval_seconds: 30,
            },
            logging: config::LoggingConfig {
                level: "debug".to_string(),
                format: "pretty".to_string(),
            },
        };
        AppCore::with_token_store(config, store).unwrap()
    }

    /// Seed a user with credentials and a pre-issued bearer token
    pub fn seed_user(&self, id: &str, first: &str, last: &str, level: u8) -> String {
        let token = format!("token-{id}");
        let mut state = self.state.lock().unwrap();
        state.users.insert(id.to_string(), identity_json(id, first, last, level));
        state.credentials.insert(
            format!("{id}@example.com"),
            ("hunter2-long".to_string(), id.to_string()),
        );
        state.tokens.insert(token.clone(), id.to_string());
        token
    }

    pub fn seed_post(&self, post: Value) {
        self.state.lock().unwrap().posts.push(post);
    }

    pub fn seed_event(&self, event: Value) {
        self.state.lock().unwrap().events.push(event);
    }

    pub fn seed_pending(&self, request: Value) {
        self.state.lock().unwrap().pending.push(request);
    }

    /// Revoke a token so the next authenticated call gets a 401
    pub fn revoke_token(&self, token: &str) {
        self.state.lock().unwrap().tokens.remove(token);
    }
}

/// Identity in the backend wire shape
pub fn identity_json(id: &str, first: &str, last: &str, level: u8) -> Value {
    json!({
        "_id": id,
        "firstName": first,
        "lastName": last,
        "email": format!("{id}@example.com"),
        "level": level,
        "isVerified": true,
        "connections": [],
        "notifications": [],
        "createdAt": "2025-01-15T12:00:00Z"
    })
}

/// Post in the backend wire shape
pub fn post_json(id: &str, author_id: &str, content: &str) -> Value {
    json!({
        "_id": id,
        "author": {"_id": author_id, "firstName": "Ama", "lastName": "Kone"},
        "content": content,
        "likes": [],
        "comments": [],
        "reports": [],
        "createdAt": "2025-01-15T12:00:00Z"
    })
}

/// Comment in the backend wire shape
pub fn comment_json(id: &str, author_id: &str, text: &str) -> Value {
    json!({
        "_id": id,
        "author": {"_id": author_id, "firstName": "Yao", "lastName": "Bla"},
        "text": text,
        "parentCommentId": Value::Null,
        "likes": [],
        "createdAt": "2025-01-15T13:00:00Z"
    })
}

/// Event in the backend wire shape
pub fn event_json(id: &str, organizer_id: &str, title: &str) -> Value {
    json!({
        "_id": id,
        "organizer": {"_id": organizer_id, "firstName": "Ama", "lastName": "Kone"},
        "title": title,
        "description": "A gathering",
        "date": "2025-06-01T18:00:00Z",
        "location": "Community hall",
        "attendees": []
    })
}

fn mock_router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/users/search", get(search_members))
        .route("/api/users/profile/:id", get(profile_of))
        .route("/api/users/request/:id", post(send_request))
        .route("/api/users/accept/:id", post(accept_request))
        .route("/api/users/decline/:id", post(decline_request))
        .route("/api/users/friends", get(friends))
        .route("/api/users/requests/pending", get(pending_requests))
        .route("/api/users/connection/:id", delete(remove_connection))
        .route("/api/users/profile/deactivate", patch(deactivate))
        .route("/api/users/notifications/read", patch(mark_notifications_read))
        .route("/api/users/profile-picture", post(upload_avatar))
        .route("/api/posts", get(list_posts).post(create_post))
        .route("/api/posts/:id", delete(delete_post))
        .route("/api/posts/:id/like", put(like_post))
        .route("/api/posts/:id/comments", post(add_comment))
        .route("/api/posts/:id/comments/:comment_id", delete(delete_comment))
        .route("/api/posts/:id/comment/:comment_id/like", put(like_comment))
        .route("/api/posts/:id/report", post(report_post))
        .route("/api/posts/:id/dismiss-reports", put(dismiss_reports))
        .route("/api/events", get(list_events))
        .route("/api/events/:id", delete(delete_event))
        .route("/api/events/:id/rsvp", post(rsvp))
        .route("/api/admin/stats", get(admin_stats))
        .route("/api/admin/users/role", patch(update_role))
        .route("/api/admin/users/ban", patch(ban_user))
        .route("/api/admin/ghost-login", post(ghost_login))
        .route("/api/admin/system-status", get(system_status).patch(set_system_status))
        .with_state(state)
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn auth_user(state: &BackendState, headers: &HeaderMap) -> Result<String, StatusCode> {
    bearer(headers)
        .and_then(|token| state.tokens.get(token).cloned())
        .ok_or(StatusCode::UNAUTHORIZED)
}

fn error_body(message: &str) -> Json<Value> {
    Json(json!({ "message": message }))
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    match state.credentials.get(&email) {
        Some((expected, user_id)) if expected == password => {
            let user_id = user_id.clone();
            let token = format!("token-{user_id}");
            state.tokens.insert(token.clone(), user_id.clone());
            let user = state.users[&user_id].clone();
            (StatusCode::OK, Json(json!({ "token": token, "user": user }))).into_response()
        }
        _ => (StatusCode::BAD_REQUEST, error_body("Invalid credentials")).into_response(),
    }
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    let state = state.lock().unwrap();
    match auth_user(&state, &headers) {
        Ok(user_id) => Json(state.users[&user_id].clone()).into_response(),
        Err(status) => (status, error_body("Not authenticated")).into_response(),
    }
}

async fn profile_of(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> impl IntoResponse {
    let state = state.lock().unwrap();
    if let Err(status) = auth_user(&state, &headers) {
        return (status, error_body("Not authenticated")).into_response();
    }
    match state.users.get(&user_id) {
        Some(user) => Json(user.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, error_body("User not found")).into_response(),
    }
}

async fn search_members(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    // Compute under the lock, then release it before the artificial
    // latency so concurrent requests are not serialized by the mutex.
    let (results, delay) = {
        let mut state = state.lock().unwrap();
        if let Err(status) = auth_user(&state, &headers) {
            return (status, error_body("Not authenticated")).into_response();
        }
        state.search_calls += 1;

        let query = params.get("query").cloned().unwrap_or_default().to_lowercase();
        let results: Vec<Value> = state
            .users
            .values()
            .filter(|user| {
                user["firstName"]
                    .as_str()
                    .unwrap_or_default()
                    .to_lowercase()
                    .contains(&query)
            })
            .map(|user| {
                json!({
                    "_id": user["_id"],
                    "firstName": user["firstName"],
                    "lastName": user["lastName"],
                    "level": user["level"],
                    "connectionStatus": "none"
                })
            })
            .collect();
        (results, state.search_delay_ms)
    };

    if delay > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
    }
    Json(results).into_response()
}

async fn deactivate(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    let user_id = match auth_user(&state, &headers) {
        Ok(id) => id,
        Err(status) => return (status, error_body("Not authenticated")).into_response(),
    };
    state.users.remove(&user_id);
    StatusCode::OK.into_response()
}

async fn mark_notifications_read(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    let user_id = match auth_user(&state, &headers) {
        Ok(id) => id,
        Err(status) => return (status, error_body("Not authenticated")).into_response(),
    };
    let user = state.users.get_mut(&user_id).unwrap();
    if let Some(notifications) = user["notifications"].as_array_mut() {
        for notification in notifications {
            notification["read"] = json!(true);
        }
    }
    StatusCode::OK.into_response()
}

async fn send_request(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(target_id): Path<String>,
) -> impl IntoResponse {
    let state = state.lock().unwrap();
    if let Err(status) = auth_user(&state, &headers) {
        return (status, error_body("Not authenticated")).into_response();
    }
    if !state.users.contains_key(&target_id) {
        return (StatusCode::NOT_FOUND, error_body("User not found")).into_response();
    }
    StatusCode::OK.into_response()
}

async fn accept_request(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(requester_id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    if let Err(status) = auth_user(&state, &headers) {
        return (status, error_body("Not authenticated")).into_response();
    }
    state.accept_calls += 1;
    state
        .pending
        .retain(|request| request["from"]["_id"] != requester_id);
    StatusCode::OK.into_response()
}

async fn decline_request(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(requester_id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    if let Err(status) = auth_user(&state, &headers) {
        return (status, error_body("Not authenticated")).into_response();
    }
    state
        .pending
        .retain(|request| request["from"]["_id"] != requester_id);
    StatusCode::OK.into_response()
}

async fn pending_requests(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    let state = state.lock().unwrap();
    match auth_user(&state, &headers) {
        Ok(_) => Json(state.pending.clone()).into_response(),
        Err(status) => (status, error_body("Not authenticated")).into_response(),
    }
}

async fn friends(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    let state = state.lock().unwrap();
    match auth_user(&state, &headers) {
        Ok(_) => Json(state.friends.clone()).into_response(),
        Err(status) => (status, error_body("Not authenticated")).into_response(),
    }
}

async fn remove_connection(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(friend_id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    match auth_user(&state, &headers) {
        Ok(_) => {
            state.friends.retain(|friend| friend["_id"] != friend_id);
            StatusCode::OK.into_response()
        }
        Err(status) => (status, error_body("Not authenticated")).into_response(),
    }
}

async fn upload_avatar(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: axum::extract::Multipart,
) -> impl IntoResponse {
    let user_id = {
        let state = state.lock().unwrap();
        match auth_user(&state, &headers) {
            Ok(id) => id,
            Err(status) => return (status, error_body("Not authenticated")).into_response(),
        }
    };

    let mut saw_picture = false;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("profilePicture") {
            saw_picture = field.bytes().await.map(|b| !b.is_empty()).unwrap_or(false);
        }
    }
    if !saw_picture {
        return (StatusCode::BAD_REQUEST, error_body("Missing picture")).into_response();
    }

    let mut state = state.lock().unwrap();
    let user = state.users.get_mut(&user_id).unwrap();
    user["profileImage"] = json!("https://cdn.example.com/avatar.png");
    Json(user.clone()).into_response()
}

async fn list_posts(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    let state = state.lock().unwrap();
    match auth_user(&state, &headers) {
        Ok(_) => Json(state.posts.clone()).into_response(),
        Err(status) => (status, error_body("Not authenticated")).into_response(),
    }
}

async fn create_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    let user_id = match auth_user(&state, &headers) {
        Ok(id) => id,
        Err(status) => return (status, error_body("Not authenticated")).into_response(),
    };

    let user = state.users[&user_id].clone();
    let post = json!({
        "_id": ulid::Ulid::new().to_string(),
        "author": {
            "_id": user["_id"],
            "firstName": user["firstName"],
            "lastName": user["lastName"]
        },
        "content": body["content"],
        "location": body["location"],
        "likes": [],
        "comments": [],
        "reports": [],
        "createdAt": "2025-02-01T09:00:00Z"
    });
    state.posts.insert(0, post.clone());
    (StatusCode::CREATED, Json(post)).into_response()
}

async fn delete_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    if let Err(status) = auth_user(&state, &headers) {
        return (status, error_body("Not authenticated")).into_response();
    }
    state.posts.retain(|post| post["_id"] != post_id);
    StatusCode::OK.into_response()
}

async fn like_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    let user_id = match auth_user(&state, &headers) {
        Ok(id) => id,
        Err(status) => return (status, error_body("Not authenticated")).into_response(),
    };

    let Some(post) = state.posts.iter_mut().find(|post| post["_id"] == post_id) else {
        return (StatusCode::NOT_FOUND, error_body("Post not found")).into_response();
    };
    let likes = post["likes"].as_array_mut().unwrap();
    if let Some(index) = likes.iter().position(|id| *id == json!(user_id)) {
        likes.remove(index);
    } else {
        likes.push(json!(user_id));
    }
    StatusCode::OK.into_response()
}

async fn add_comment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    let user_id = match auth_user(&state, &headers) {
        Ok(id) => id,
        Err(status) => return (status, error_body("Not authenticated")).into_response(),
    };

    let user = state.users[&user_id].clone();
    let comment = json!({
        "_id": ulid::Ulid::new().to_string(),
        "author": {
            "_id": user["_id"],
            "firstName": user["firstName"],
            "lastName": user["lastName"]
        },
        "text": body["text"],
        "parentCommentId": body.get("parentCommentId").cloned().unwrap_or(Value::Null),
        "likes": [],
        "createdAt": "2025-02-01T10:00:00Z"
    });
    let Some(post) = state.posts.iter_mut().find(|post| post["_id"] == post_id) else {
        return (StatusCode::NOT_FOUND, error_body("Post not found")).into_response();
    };
    post["comments"].as_array_mut().unwrap().push(comment);
    StatusCode::CREATED.into_response()
}

async fn delete_comment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    let user_id = match auth_user(&state, &headers) {
        Ok(id) => id,
        Err(status) => return (status, error_body("Not authenticated")).into_response(),
    };
    let level = state.users[&user_id]["level"].as_u64().unwrap_or(0);

    let Some(post) = state.posts.iter_mut().find(|post| post["_id"] == post_id) else {
        return (StatusCode::NOT_FOUND, error_body("Post not found")).into_response();
    };
    let comments = post["comments"].as_array_mut().unwrap();
    let Some(index) = comments.iter().position(|c| c["_id"] == comment_id) else {
        return (StatusCode::NOT_FOUND, error_body("Comment not found")).into_response();
    };
    // Author or moderator only
    if comments[index]["author"]["_id"] != json!(user_id) && level < 4 {
        return (StatusCode::FORBIDDEN, error_body("Not allowed")).into_response();
    }
    comments.remove(index);
    StatusCode::OK.into_response()
}

async fn like_comment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((post_id, comment_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    let user_id = match auth_user(&state, &headers) {
        Ok(id) => id,
        Err(status) => return (status, error_body("Not authenticated")).into_response(),
    };

    let Some(post) = state.posts.iter_mut().find(|post| post["_id"] == post_id) else {
        return (StatusCode::NOT_FOUND, error_body("Post not found")).into_response();
    };
    let Some(comment) = post["comments"]
        .as_array_mut()
        .unwrap()
        .iter_mut()
        .find(|c| c["_id"] == comment_id)
    else {
        return (StatusCode::NOT_FOUND, error_body("Comment not found")).into_response();
    };
    let likes = comment["likes"].as_array_mut().unwrap();
    if let Some(index) = likes.iter().position(|id| *id == json!(user_id)) {
        likes.remove(index);
    } else {
        likes.push(json!(user_id));
    }
    StatusCode::OK.into_response()
}

async fn report_post(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    let user_id = match auth_user(&state, &headers) {
        Ok(id) => id,
        Err(status) => return (status, error_body("Not authenticated")).into_response(),
    };

    let Some(post) = state.posts.iter_mut().find(|post| post["_id"] == post_id) else {
        return (StatusCode::NOT_FOUND, error_body("Post not found")).into_response();
    };
    post["reports"].as_array_mut().unwrap().push(json!({
        "reason": body["reason"],
        "reportedBy": user_id,
        "createdAt": "2025-02-01T11:00:00Z"
    }));
    StatusCode::OK.into_response()
}

async fn dismiss_reports(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    if let Err(status) = require_level(&state, &headers, 4) {
        return status.into_response();
    }
    let Some(post) = state.posts.iter_mut().find(|post| post["_id"] == post_id) else {
        return (StatusCode::NOT_FOUND, error_body("Post not found")).into_response();
    };
    post["reports"] = json!([]);
    StatusCode::OK.into_response()
}

async fn list_events(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    let state = state.lock().unwrap();
    match auth_user(&state, &headers) {
        Ok(_) => Json(state.events.clone()).into_response(),
        Err(status) => (status, error_body("Not authenticated")).into_response(),
    }
}

async fn delete_event(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    if let Err(status) = auth_user(&state, &headers) {
        return (status, error_body("Not authenticated")).into_response();
    }
    state.events.retain(|event| event["_id"] != event_id);
    StatusCode::OK.into_response()
}

async fn rsvp(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(event_id): Path<String>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    let user_id = match auth_user(&state, &headers) {
        Ok(id) => id,
        Err(status) => return (status, error_body("Not authenticated")).into_response(),
    };
    state.rsvp_calls += 1;

    let Some(event) = state.events.iter_mut().find(|event| event["_id"] == event_id) else {
        return (StatusCode::NOT_FOUND, error_body("Event not found")).into_response();
    };
    let attendees = event["attendees"].as_array_mut().unwrap();
    if let Some(index) = attendees.iter().position(|id| *id == json!(user_id)) {
        attendees.remove(index);
    } else {
        attendees.push(json!(user_id));
    }
    StatusCode::OK.into_response()
}

fn require_level(
    state: &BackendState,
    headers: &HeaderMap,
    minimum: u64,
) -> Result<String, (StatusCode, Json<Value>)> {
    let user_id = auth_user(state, headers)
        .map_err(|status| (status, error_body("Not authenticated")))?;
    let level = state.users[&user_id]["level"].as_u64().unwrap_or(0);
    if level < minimum {
        return Err((StatusCode::FORBIDDEN, error_body("Insufficient clearance")));
    }
    Ok(user_id)
}

async fn admin_stats(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    let state = state.lock().unwrap();
    if let Err(status) = require_level(&state, &headers, 5) {
        return status.into_response();
    }
    Json(json!({
        "summary": {
            "totalUsers": state.users.len(),
            "verifiedUsers": state.users.len(),
            "totalPosts": state.posts.len(),
            "totalEvents": state.events.len(),
            "verificationRate": 100.0
        },
        "recentUsers": [],
        "usersByLevel": []
    }))
    .into_response()
}

async fn update_role(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    if let Err(status) = require_level(&state, &headers, 5) {
        return status.into_response();
    }
    let target = body["userId"].as_str().unwrap_or_default().to_string();
    let level = body["level"].clone();
    match state.users.get_mut(&target) {
        Some(user) => {
            user["level"] = level;
            StatusCode::OK.into_response()
        }
        None => (StatusCode::NOT_FOUND, error_body("User not found")).into_response(),
    }
}

async fn ban_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    if let Err(status) = require_level(&state, &headers, 5) {
        return status.into_response();
    }
    if body["reason"].as_str().unwrap_or_default().is_empty() {
        return (StatusCode::BAD_REQUEST, error_body("Reason required")).into_response();
    }
    let target = body["userId"].as_str().unwrap_or_default().to_string();
    match state.users.get_mut(&target) {
        Some(user) => {
            user["level"] = json!(0);
            StatusCode::OK.into_response()
        }
        None => (StatusCode::NOT_FOUND, error_body("User not found")).into_response(),
    }
}

async fn ghost_login(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    if let Err(status) = require_level(&state, &headers, 5) {
        return status.into_response();
    }
    let target = body["userId"].as_str().unwrap_or_default().to_string();
    let Some(user) = state.users.get(&target).cloned() else {
        return (StatusCode::NOT_FOUND, error_body("User not found")).into_response();
    };
    let token = format!("ghost-{target}");
    state.tokens.insert(token.clone(), target);
    Json(json!({ "token": token, "user": user })).into_response()
}

async fn system_status(State(state): State<Shared>, headers: HeaderMap) -> impl IntoResponse {
    let state = state.lock().unwrap();
    if let Err(status) = require_level(&state, &headers, 6) {
        return status.into_response();
    }
    Json(json!({ "maintenance": state.maintenance })).into_response()
}

async fn set_system_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let mut state = state.lock().unwrap();
    if let Err(status) = require_level(&state, &headers, 6) {
        return status.into_response();
    }
    state.maintenance = body["maintenance"].as_bool().unwrap_or(false);
    StatusCode::OK.into_response()
}
