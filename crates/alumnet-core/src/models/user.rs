//! Alumni directory user model

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A unique identifier for a directory user (service-assigned sequence number)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Community contribution counters shown on a profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributions {
    pub mentoring: u32,
    pub talks: u32,
    pub blog_posts: u32,
}

/// An alumni directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier, assigned by the service on creation
    pub id: UserId,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    /// Current job title, e.g. "Software Engineer"
    pub role: String,
    pub company: String,
    pub location: String,
    pub cohort: String,
    pub course: String,
    pub specialization: String,
    /// Employment status label, e.g. "Employed", "Freelancing", "New"
    pub status: String,
    pub skills: Vec<String>,
    pub contributions: Contributions,
    /// Updated whenever the user's online flag changes
    pub last_seen: Option<DateTime<Utc>>,
}

/// Fields required to add a new directory user
///
/// The service fills in zeroed contributions and `status = "New"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
    pub role: String,
    pub company: String,
    pub location: String,
    pub cohort: String,
    pub course: String,
    pub specialization: String,
    pub skills: Vec<String>,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("User name is required".to_string()));
        }
        Ok(())
    }
}

/// Partial profile edit; `None` fields are left untouched, the id never changes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub specialization: Option<String>,
    pub status: Option<String>,
    pub skills: Option<Vec<String>>,
}

impl UserPatch {
    /// Shallow-merge the patch into an existing user
    pub fn apply(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            user.email = Some(email.clone());
        }
        if let Some(avatar) = &self.avatar {
            user.avatar = Some(avatar.clone());
        }
        if let Some(role) = &self.role {
            user.role.clone_from(role);
        }
        if let Some(company) = &self.company {
            user.company.clone_from(company);
        }
        if let Some(location) = &self.location {
            user.location.clone_from(location);
        }
        if let Some(specialization) = &self.specialization {
            user.specialization.clone_from(specialization);
        }
        if let Some(status) = &self.status {
            user.status.clone_from(status);
        }
        if let Some(skills) = &self.skills {
            user.skills.clone_from(skills);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn user() -> User {
        User {
            id: UserId::new(1),
            name: "Mishael".to_string(),
            email: None,
            avatar: None,
            role: "Software Engineer".to_string(),
            company: "Microsoft".to_string(),
            location: "Nairobi, Kenya".to_string(),
            cohort: "2023".to_string(),
            course: "Software Engineering".to_string(),
            specialization: "Full Stack Development".to_string(),
            status: "Employed".to_string(),
            skills: vec!["Rust".to_string()],
            contributions: Contributions::default(),
            last_seen: None,
        }
    }

    #[test]
    fn patch_never_touches_unset_fields() {
        let mut user = user();
        let patch = UserPatch {
            company: Some("Safaricom".to_string()),
            ..UserPatch::default()
        };
        patch.apply(&mut user);
        assert_eq!(user.company, "Safaricom");
        assert_eq!(user.name, "Mishael");
        assert_eq!(user.status, "Employed");
    }

    #[test]
    fn new_user_validate_requires_name() {
        let draft = NewUser {
            name: String::new(),
            email: None,
            role: String::new(),
            company: String::new(),
            location: String::new(),
            cohort: String::new(),
            course: String::new(),
            specialization: String::new(),
            skills: vec![],
        };
        assert!(matches!(draft.validate(), Err(Error::Validation(_))));
    }
}
