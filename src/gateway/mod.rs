//! HTTP gateway
//!
//! Single point of egress to the backend. Every request carries the
//! bearer token when one is present; a 401 on any response clears the
//! token and fires the session's unauthorized hook exactly once per
//! response. All other errors propagate unmodified so call sites can
//! render specific messages.

pub mod routes;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::{AppError, Result};

/// Shared bearer-token cell.
///
/// The session store is the only writer; the gateway reads it for every
/// outbound request and clears it on 401.
pub type TokenCell = Arc<RwLock<Option<String>>>;

/// Callback invoked when any response comes back 401.
///
/// Wired to the session store so the identity is demoted in the same
/// place regardless of which call hit the expired token.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// Backend error body shape: `{ "message": "..." }`
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Configured HTTP client for the backend
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    token: TokenCell,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl Gateway {
    /// Build the gateway from API configuration.
    ///
    /// # Errors
    /// Returns error if the underlying client cannot be constructed.
    pub fn new(config: &ApiConfig, token: TokenCell) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        Ok(Self {
            http,
            base_url: config.normalized_base_url(),
            token,
            on_unauthorized: None,
        })
    }

    /// Attach the session's unauthorized hook.
    pub fn with_unauthorized_hook(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(token) = self.bearer() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Send a request and apply the global response policy.
    ///
    /// 401 clears the token cell and invokes the unauthorized hook; other
    /// non-2xx statuses are parsed into `AppError::Api` with the backend
    /// message when the body carries one.
    async fn send(&self, builder: RequestBuilder, path: &str) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!(path = %path, "Backend rejected bearer token; clearing session");
            if let Ok(mut guard) = self.token.write() {
                guard.take();
            }
            if let Some(hook) = &self.on_unauthorized {
                hook();
            }
            return Err(AppError::Unauthorized);
        }

        if status == StatusCode::FORBIDDEN {
            return Err(AppError::Forbidden);
        }

        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message);
            tracing::debug!(path = %path, status = status.as_u16(), "Backend error response");
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn parse<T: DeserializeOwned>(
        response: Response,
        operation: &'static str,
    ) -> Result<T> {
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(operation, error = %e, "Response did not match expected shape");
            AppError::BadResponse {
                operation,
                detail: e.to_string(),
            }
        })
    }

    /// GET a JSON resource
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        operation: &'static str,
    ) -> Result<T> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        Self::parse(response, operation).await
    }

    /// POST a JSON body and parse a JSON response
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        operation: &'static str,
    ) -> Result<T> {
        let response = self
            .send(self.request(Method::POST, path).json(body), path)
            .await?;
        Self::parse(response, operation).await
    }

    /// POST with no body, ignoring any response payload
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::POST, path), path).await?;
        Ok(())
    }

    /// POST a JSON body, ignoring any response payload
    pub async fn post_json_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.request(Method::POST, path).json(body), path)
            .await?;
        Ok(())
    }

    /// POST a multipart form and parse a JSON response.
    ///
    /// The transport sets the multipart boundary itself; the payload must
    /// not be forced into a JSON content type.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        operation: &'static str,
    ) -> Result<T> {
        let response = self
            .send(self.request(Method::POST, path).multipart(form), path)
            .await?;
        Self::parse(response, operation).await
    }

    /// PUT with no body, ignoring any response payload
    pub async fn put_empty(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::PUT, path), path).await?;
        Ok(())
    }

    /// PUT a JSON body and parse a JSON response
    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        operation: &'static str,
    ) -> Result<T> {
        let response = self
            .send(self.request(Method::PUT, path).json(body), path)
            .await?;
        Self::parse(response, operation).await
    }

    /// PUT a JSON body, ignoring any response payload
    pub async fn put_json_empty<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.request(Method::PUT, path).json(body), path)
            .await?;
        Ok(())
    }

    /// PATCH with no body, ignoring any response payload
    pub async fn patch_empty(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::PATCH, path), path).await?;
        Ok(())
    }

    /// PATCH a JSON body, ignoring any response payload
    pub async fn patch_json_empty<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<()> {
        self.send(self.request(Method::PATCH, path).json(body), path)
            .await?;
        Ok(())
    }

    /// DELETE a resource, ignoring any response payload
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path), path).await?;
        Ok(())
    }
}
