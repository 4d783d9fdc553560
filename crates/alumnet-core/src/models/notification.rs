//! Transient user-dismissible notifications

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::event::{EventId, EventStatus};
use crate::models::post::PostId;
use crate::models::user::UserId;

/// A unique identifier for a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(Uuid);

impl NotificationId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of notification this is, used for display styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    /// Event status changes carry the new status as their kind
    Status(EventStatus),
}

/// The entity a notification refers to, if any
///
/// Deleting an entity drops every queued notification keyed to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKey {
    Post(PostId),
    Event(EventId),
    User(UserId),
}

/// A transient message shown until dismissed individually or cleared in bulk
///
/// Distinct from collection-level `error`: notifications acknowledge
/// successful operations. Duplicates are deliberately allowed, since each
/// user action deserves its own acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub entity: Option<NotificationKey>,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    /// Create a notification with a fresh id and the current timestamp
    #[must_use]
    pub fn new(
        message: impl Into<String>,
        kind: NotificationKind,
        entity: Option<NotificationKey>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            message: message.into(),
            kind,
            entity,
            timestamp: Utc::now(),
        }
    }

    /// Shorthand for an unkeyed success notification
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success, None)
    }
}
