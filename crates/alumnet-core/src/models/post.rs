//! Post and comment models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::user::UserId;

/// A unique identifier for a post, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(Uuid);

impl PostId {
    /// Create a new unique post ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PostId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A unique identifier for a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(Uuid);

impl CommentId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CommentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Compact author reference embedded in posts and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub name: String,
    pub avatar: Option<String>,
}

/// A comment attached to a post, in append order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment with the given content and author
    #[must_use]
    pub fn new(content: impl Into<String>, author: Author) -> Self {
        Self {
            id: CommentId::new(),
            content: content.into(),
            author,
            created_at: Utc::now(),
        }
    }
}

/// A community post
///
/// The synchronization layer only inspects `id` and the fields it maintains
/// itself (`likes`, `liked_by`, `comments`, `views`); everything else is
/// opaque payload owned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier, assigned by the service on creation
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub author: Author,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Like count, kept consistent with `liked_by` by the merge rules
    pub likes: u32,
    /// Users who currently like this post
    pub liked_by: Vec<UserId>,
    /// Comments in append order
    pub comments: Vec<Comment>,
    /// View counter, increment-only
    pub views: u64,
    pub tags: Vec<String>,
}

impl Post {
    /// Whether the given user currently likes this post
    #[must_use]
    pub fn liked_by_user(&self, user: &UserId) -> bool {
        self.liked_by.contains(user)
    }
}

/// Fields required to create a new post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub category: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
}

impl NewPost {
    /// Reject drafts with blank required fields before any service call
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty()
            || self.content.trim().is_empty()
            || self.category.trim().is_empty()
        {
            return Err(Error::Validation(
                "Please fill in all required fields".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial edit of an existing post; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
}

impl PostPatch {
    /// Shallow-merge the patch into an existing post
    pub fn apply(&self, post: &mut Post) {
        if let Some(title) = &self.title {
            post.title.clone_from(title);
        }
        if let Some(content) = &self.content {
            post.content.clone_from(content);
        }
        if let Some(category) = &self.category {
            post.category.clone_from(category);
        }
        if let Some(image) = &self.image {
            post.image = Some(image.clone());
        }
    }
}
