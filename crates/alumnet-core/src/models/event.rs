//! Event model

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A unique identifier for an event (service-assigned sequence number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(i64);

impl EventId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Lifecycle status of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Completed,
    Cancelled,
    Postponed,
}

impl EventStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Postponed => "postponed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "ongoing" => Ok(Self::Ongoing),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "postponed" => Ok(Self::Postponed),
            other => Err(Error::Validation(format!("Unknown event status: {other}"))),
        }
    }
}

/// A community event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier, assigned by the service on creation
    pub id: EventId,
    pub title: String,
    pub description: String,
    /// Display date, e.g. "10 Aug"
    pub date: String,
    /// Display time range, e.g. "8:00 am - 1:00 pm"
    pub time: String,
    pub location: String,
    pub dress_code: String,
    pub category: String,
    pub status: EventStatus,
    pub attendance: u32,
    pub max_capacity: u32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Set on every status or detail change
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields required to create a new event
///
/// The service fills in `status = Upcoming`, `attendance = 0`, and a default
/// capacity of 100 when none is given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub dress_code: String,
    pub category: String,
    pub max_capacity: Option<u32>,
    pub image: Option<String>,
}

impl NewEvent {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.description.trim().is_empty() {
            return Err(Error::Validation(
                "Event title and description are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Partial edit of an existing event; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub dress_code: Option<String>,
    pub category: Option<String>,
    pub max_capacity: Option<u32>,
    pub image: Option<String>,
}

impl EventPatch {
    /// Shallow-merge the patch into an existing event
    pub fn apply(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            event.description.clone_from(description);
        }
        if let Some(date) = &self.date {
            event.date.clone_from(date);
        }
        if let Some(time) = &self.time {
            event.time.clone_from(time);
        }
        if let Some(location) = &self.location {
            event.location.clone_from(location);
        }
        if let Some(dress_code) = &self.dress_code {
            event.dress_code.clone_from(dress_code);
        }
        if let Some(category) = &self.category {
            event.category.clone_from(category);
        }
        if let Some(max_capacity) = self.max_capacity {
            event.max_capacity = max_capacity;
        }
        if let Some(image) = &self.image {
            event.image = Some(image.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn event_status_serializes_lowercase() {
        let json = serde_json::to_string(&EventStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn event_status_parses_case_insensitively() {
        assert_eq!("Postponed".parse::<EventStatus>().unwrap(), EventStatus::Postponed);
        assert!("someday".parse::<EventStatus>().is_err());
    }

    #[test]
    fn event_id_roundtrips_through_display() {
        let id = EventId::new(42);
        let parsed: EventId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn new_event_validate_rejects_blank_description() {
        let draft = NewEvent {
            title: "Graduation Ceremony".to_string(),
            description: "  ".to_string(),
            date: "10 Aug".to_string(),
            time: "8:00 am - 1:00 pm".to_string(),
            location: "Nairobi".to_string(),
            dress_code: "Smart Casual".to_string(),
            category: "Educational".to_string(),
            max_capacity: None,
            image: None,
        };
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));
    }
}
