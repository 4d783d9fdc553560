//! REST-backed resource service client.
//!
//! Speaks the community API's JSON shape: one resource collection per kind
//! under `/api`, sub-field mutations as nested routes (`/{id}/likes`,
//! `/{id}/comments`, `/{id}/views`, `/{id}/status`). Every non-success
//! response is folded into a human-readable [`Error`] value.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{Error, Result};
use crate::models::{
    AuthPayload, Author, Comment, CommentId, Credentials, Event, EventId, EventPatch, EventStatus,
    NewEvent, NewPost, NewUser, Post, PostId, PostPatch, Registration, User, UserId, UserPatch,
};
use crate::services::{AuthService, EventService, PostService, UserService};

/// HTTP client for the remote community API
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
    token: Option<String>,
}

impl HttpBackend {
    /// Create a client for the given API root, e.g. `https://api.example.com/api`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        Ok(Self {
            base_url,
            client: Client::builder().build()?,
            token: None,
        })
    }

    /// Attach a bearer token to every request
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.authorize(self.client.get(self.url(path))).send().await?;
        expect_json(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let response = self
            .authorize(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await?;
        expect_json(response).await
    }

    async fn put_json<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        let response = self
            .authorize(self.client.put(self.url(path)))
            .json(body)
            .send()
            .await?;
        expect_json(response).await
    }

    async fn delete_ok(&self, path: &str) -> Result<()> {
        let response = self
            .authorize(self.client.delete(self.url(path)))
            .send()
            .await?;
        expect_ok(response).await
    }

    async fn post_ok(&self, path: &str, body: &impl Serialize) -> Result<()> {
        let response = self
            .authorize(self.client.post(self.url(path)))
            .json(body)
            .send()
            .await?;
        expect_ok(response).await
    }
}

#[async_trait]
impl PostService for HttpBackend {
    async fn fetch_all(&self) -> Result<Vec<Post>> {
        self.get_json("posts").await
    }

    async fn create(&self, draft: NewPost) -> Result<Post> {
        draft.validate()?;
        self.post_json("posts", &draft).await
    }

    async fn update(&self, id: &PostId, patch: PostPatch) -> Result<Post> {
        self.put_json(&format!("posts/{id}"), &patch).await
    }

    async fn delete(&self, id: &PostId) -> Result<PostId> {
        self.delete_ok(&format!("posts/{id}")).await?;
        Ok(*id)
    }

    async fn toggle_like(&self, id: &PostId, user: &UserId) -> Result<()> {
        self.post_ok(&format!("posts/{id}/likes"), &json!({ "userId": user }))
            .await
    }

    async fn add_comment(&self, id: &PostId, content: &str, author: &Author) -> Result<Comment> {
        self.post_json(
            &format!("posts/{id}/comments"),
            &json!({ "content": content, "author": author }),
        )
        .await
    }

    async fn delete_comment(&self, id: &PostId, comment: &CommentId) -> Result<()> {
        self.delete_ok(&format!("posts/{id}/comments/{comment}")).await
    }

    async fn increment_views(&self, id: &PostId) -> Result<()> {
        self.post_ok(&format!("posts/{id}/views"), &json!({})).await
    }
}

#[async_trait]
impl EventService for HttpBackend {
    async fn fetch_all(&self) -> Result<Vec<Event>> {
        self.get_json("events").await
    }

    async fn create(&self, draft: NewEvent) -> Result<Event> {
        draft.validate()?;
        self.post_json("events", &draft).await
    }

    async fn set_status(
        &self,
        id: &EventId,
        status: EventStatus,
        message: Option<&str>,
    ) -> Result<Event> {
        self.put_json(
            &format!("events/{id}/status"),
            &json!({ "status": status, "message": message }),
        )
        .await
    }

    async fn update(&self, id: &EventId, patch: EventPatch) -> Result<Event> {
        self.put_json(&format!("events/{id}"), &patch).await
    }

    async fn delete(&self, id: &EventId) -> Result<EventId> {
        self.delete_ok(&format!("events/{id}")).await?;
        Ok(*id)
    }

    async fn notify(&self, id: &EventId, message: &str) -> Result<()> {
        self.post_ok(
            &format!("events/{id}/notifications"),
            &json!({ "message": message }),
        )
        .await
    }
}

#[async_trait]
impl UserService for HttpBackend {
    async fn fetch_all(&self) -> Result<Vec<User>> {
        self.get_json("users").await
    }

    async fn add(&self, draft: NewUser) -> Result<User> {
        draft.validate()?;
        self.post_json("users", &draft).await
    }

    async fn update_profile(&self, id: &UserId, patch: UserPatch) -> Result<User> {
        self.put_json(&format!("users/{id}"), &patch).await
    }

    async fn delete(&self, id: &UserId) -> Result<UserId> {
        self.delete_ok(&format!("users/{id}")).await?;
        Ok(*id)
    }

    async fn set_online(&self, id: &UserId, online: bool) -> Result<()> {
        let response = self
            .authorize(self.client.put(self.url(&format!("users/{id}/status"))))
            .json(&json!({ "isOnline": online }))
            .send()
            .await?;
        expect_ok(response).await
    }
}

#[async_trait]
impl AuthService for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload> {
        self.post_json("auth/login", credentials).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthPayload> {
        self.post_json("auth/register", registration).await
    }

    async fn logout(&self) -> Result<()> {
        self.post_ok("auth/logout", &json!({})).await
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

async fn api_error(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = parse_api_error(status, &body);
    if status == StatusCode::NOT_FOUND {
        Error::NotFound(message)
    } else {
        Error::Service(message)
    }
}

async fn expect_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(response.json::<T>().await?)
}

async fn expect_ok(response: Response) -> Result<()> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(())
}

fn normalize_base_url(raw: String) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("API base URL must not be empty".to_string()));
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.trim_end_matches('/').to_string())
    } else {
        Err(Error::Validation(
            "API base URL must include http:// or https://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn normalize_base_url_rejects_invalid_values() {
        assert!(normalize_base_url(String::new()).is_err());
        assert!(normalize_base_url("api.example.com".to_string()).is_err());
        assert_eq!(
            normalize_base_url("https://api.example.com/api/".to_string()).unwrap(),
            "https://api.example.com/api"
        );
    }

    #[test]
    fn parse_api_error_prefers_message_field() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(
            parse_api_error(status, r#"{"message":"Event not found"}"#),
            "Event not found (400)"
        );
        assert_eq!(parse_api_error(status, ""), "HTTP 400");
        assert_eq!(parse_api_error(status, "boom"), "boom (400)");
    }
}
