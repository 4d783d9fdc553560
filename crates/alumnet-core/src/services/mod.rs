//! Service boundaries between the store and the remote world.
//!
//! One async trait per resource kind, plus the credential store used to seed
//! the session at startup. The store only ever talks to these traits; the
//! concrete transports live in [`memory`] (mock directory with simulated
//! latency) and [`http`] (REST client).

pub mod credentials;
pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AuthPayload, Author, Comment, CommentId, Credentials, Event, EventId, EventPatch, EventStatus,
    NewEvent, NewPost, NewUser, Post, PostId, PostPatch, Registration, User, UserId, UserPatch,
};

pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use http::HttpBackend;
pub use memory::MemoryBackend;

/// Remote operations on the posts resource
///
/// All calls are request/response; failures come back as error values and
/// never partially apply on the client side.
#[async_trait]
pub trait PostService: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Post>>;
    async fn create(&self, draft: NewPost) -> Result<Post>;
    async fn update(&self, id: &PostId, patch: PostPatch) -> Result<Post>;
    /// Returns the deleted id; deleting a missing post is a success-no-op
    async fn delete(&self, id: &PostId) -> Result<PostId>;
    async fn toggle_like(&self, id: &PostId, user: &UserId) -> Result<()>;
    async fn add_comment(&self, id: &PostId, content: &str, author: &Author) -> Result<Comment>;
    async fn delete_comment(&self, id: &PostId, comment: &CommentId) -> Result<()>;
    async fn increment_views(&self, id: &PostId) -> Result<()>;
}

/// Remote operations on the events resource
#[async_trait]
pub trait EventService: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Event>>;
    async fn create(&self, draft: NewEvent) -> Result<Event>;
    async fn set_status(
        &self,
        id: &EventId,
        status: EventStatus,
        message: Option<&str>,
    ) -> Result<Event>;
    async fn update(&self, id: &EventId, patch: EventPatch) -> Result<Event>;
    async fn delete(&self, id: &EventId) -> Result<EventId>;
    async fn notify(&self, id: &EventId, message: &str) -> Result<()>;
}

/// Remote operations on the alumni directory
#[async_trait]
pub trait UserService: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<User>>;
    async fn add(&self, draft: NewUser) -> Result<User>;
    async fn update_profile(&self, id: &UserId, patch: UserPatch) -> Result<User>;
    async fn delete(&self, id: &UserId) -> Result<UserId>;
    async fn set_online(&self, id: &UserId, online: bool) -> Result<()>;
}

/// Login, registration, and logout against the auth provider
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload>;
    async fn register(&self, registration: &Registration) -> Result<AuthPayload>;
    async fn logout(&self) -> Result<()>;
}
