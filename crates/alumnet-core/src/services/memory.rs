//! In-memory backend with simulated latency.
//!
//! Serves as the demo directory for the CLI and as the service double for
//! store tests. It keeps its own authoritative copy of every collection, the
//! way a remote document store would, so client-side merges are always
//! confirmations of a server-side change.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{Error, Result};
use crate::models::{
    AuthPayload, AuthUser, Author, Comment, CommentId, Contributions, Credentials, Event, EventId,
    EventPatch, EventStatus, NewEvent, NewPost, NewUser, Post, PostId, PostPatch, Registration,
    Role, User, UserId, UserPatch,
};
use crate::services::{AuthService, EventService, PostService, UserService};

const ADMIN_EMAIL: &str = "admin@example.com";
const ADMIN_PASSWORD: &str = "admin123";

#[derive(Debug, Default)]
struct Inner {
    posts: Vec<Post>,
    events: Vec<Event>,
    users: Vec<User>,
    online: HashMap<UserId, bool>,
    next_event_id: i64,
    next_user_id: i64,
}

/// Mock resource/auth service over in-process collections
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    inner: Arc<Mutex<Inner>>,
    latency: Duration,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    /// Empty backend with zero latency (the test configuration)
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next_event_id: 1,
                next_user_id: 1,
                ..Inner::default()
            })),
            latency: Duration::ZERO,
        }
    }

    /// Simulate network latency on every call
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Seed the posts collection
    #[must_use]
    pub fn seed_posts(self, posts: Vec<Post>) -> Self {
        self.lock().posts = posts;
        self
    }

    /// Seed the events collection, advancing the id sequence past the seeds
    #[must_use]
    pub fn seed_events(self, events: Vec<Event>) -> Self {
        {
            let mut inner = self.lock();
            inner.next_event_id = events.iter().map(|e| e.id.raw()).max().unwrap_or(0) + 1;
            inner.events = events;
        }
        self
    }

    /// Seed the directory, advancing the id sequence past the seeds
    #[must_use]
    pub fn seed_users(self, users: Vec<User>) -> Self {
        {
            let mut inner = self.lock();
            inner.next_user_id = users.iter().map(|u| u.id.raw()).max().unwrap_or(0) + 1;
            inner.users = users;
        }
        self
    }

    /// A small alumni community for the demo CLI
    #[must_use]
    pub fn with_sample_data() -> Self {
        Self::new()
            .seed_posts(sample_posts())
            .seed_events(sample_events())
            .seed_users(sample_users())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl PostService for MemoryBackend {
    async fn fetch_all(&self) -> Result<Vec<Post>> {
        self.simulate_latency().await;
        Ok(self.lock().posts.clone())
    }

    async fn create(&self, draft: NewPost) -> Result<Post> {
        self.simulate_latency().await;
        draft.validate()?;
        let post = Post {
            id: PostId::new(),
            title: draft.title,
            content: draft.content,
            category: draft.category,
            author: Author {
                id: UserId::new(0),
                name: "Current User".to_string(),
                avatar: None,
            },
            image: draft.image,
            created_at: Utc::now(),
            likes: 0,
            liked_by: vec![],
            comments: vec![],
            views: 0,
            tags: draft.tags,
        };
        self.lock().posts.push(post.clone());
        Ok(post)
    }

    async fn update(&self, id: &PostId, patch: PostPatch) -> Result<Post> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        let post = inner
            .posts
            .iter_mut()
            .find(|p| p.id == *id)
            .ok_or_else(|| Error::NotFound(format!("post {id}")))?;
        patch.apply(post);
        Ok(post.clone())
    }

    async fn delete(&self, id: &PostId) -> Result<PostId> {
        self.simulate_latency().await;
        self.lock().posts.retain(|p| p.id != *id);
        Ok(*id)
    }

    async fn toggle_like(&self, id: &PostId, user: &UserId) -> Result<()> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        if let Some(post) = inner.posts.iter_mut().find(|p| p.id == *id) {
            if let Some(index) = post.liked_by.iter().position(|u| u == user) {
                post.liked_by.remove(index);
                post.likes = post.likes.saturating_sub(1);
            } else {
                post.liked_by.push(*user);
                post.likes += 1;
            }
        }
        Ok(())
    }

    async fn add_comment(&self, id: &PostId, content: &str, author: &Author) -> Result<Comment> {
        self.simulate_latency().await;
        let comment = Comment::new(content, author.clone());
        let mut inner = self.lock();
        if let Some(post) = inner.posts.iter_mut().find(|p| p.id == *id) {
            post.comments.push(comment.clone());
        }
        Ok(comment)
    }

    async fn delete_comment(&self, id: &PostId, comment: &CommentId) -> Result<()> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        if let Some(post) = inner.posts.iter_mut().find(|p| p.id == *id) {
            post.comments.retain(|c| c.id != *comment);
        }
        Ok(())
    }

    async fn increment_views(&self, id: &PostId) -> Result<()> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        if let Some(post) = inner.posts.iter_mut().find(|p| p.id == *id) {
            post.views += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl EventService for MemoryBackend {
    async fn fetch_all(&self) -> Result<Vec<Event>> {
        self.simulate_latency().await;
        Ok(self.lock().events.clone())
    }

    async fn create(&self, draft: NewEvent) -> Result<Event> {
        self.simulate_latency().await;
        draft.validate()?;
        let mut inner = self.lock();
        let id = EventId::new(inner.next_event_id);
        inner.next_event_id += 1;
        let event = Event {
            id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            time: draft.time,
            location: draft.location,
            dress_code: draft.dress_code,
            category: draft.category,
            status: EventStatus::Upcoming,
            attendance: 0,
            max_capacity: draft.max_capacity.unwrap_or(100),
            image: draft.image,
            created_at: Utc::now(),
            updated_at: None,
        };
        inner.events.push(event.clone());
        Ok(event)
    }

    async fn set_status(
        &self,
        id: &EventId,
        status: EventStatus,
        _message: Option<&str>,
    ) -> Result<Event> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        let event = inner
            .events
            .iter_mut()
            .find(|e| e.id == *id)
            .ok_or_else(|| Error::NotFound(format!("event {id}")))?;
        event.status = status;
        event.updated_at = Some(Utc::now());
        Ok(event.clone())
    }

    async fn update(&self, id: &EventId, patch: EventPatch) -> Result<Event> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        let event = inner
            .events
            .iter_mut()
            .find(|e| e.id == *id)
            .ok_or_else(|| Error::NotFound(format!("event {id}")))?;
        patch.apply(event);
        event.updated_at = Some(Utc::now());
        Ok(event.clone())
    }

    async fn delete(&self, id: &EventId) -> Result<EventId> {
        self.simulate_latency().await;
        self.lock().events.retain(|e| e.id != *id);
        Ok(*id)
    }

    async fn notify(&self, id: &EventId, _message: &str) -> Result<()> {
        self.simulate_latency().await;
        let inner = self.lock();
        if inner.events.iter().any(|e| e.id == *id) {
            Ok(())
        } else {
            Err(Error::NotFound(format!("event {id}")))
        }
    }
}

#[async_trait]
impl UserService for MemoryBackend {
    async fn fetch_all(&self) -> Result<Vec<User>> {
        self.simulate_latency().await;
        Ok(self.lock().users.clone())
    }

    async fn add(&self, draft: NewUser) -> Result<User> {
        self.simulate_latency().await;
        draft.validate()?;
        let mut inner = self.lock();
        let id = UserId::new(inner.next_user_id);
        inner.next_user_id += 1;
        let user = User {
            id,
            name: draft.name,
            email: draft.email,
            avatar: None,
            role: draft.role,
            company: draft.company,
            location: draft.location,
            cohort: draft.cohort,
            course: draft.course,
            specialization: draft.specialization,
            status: "New".to_string(),
            skills: draft.skills,
            contributions: Contributions::default(),
            last_seen: None,
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(&self, id: &UserId, patch: UserPatch) -> Result<User> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        let user = inner
            .users
            .iter_mut()
            .find(|u| u.id == *id)
            .ok_or_else(|| Error::NotFound(format!("user {id}")))?;
        patch.apply(user);
        Ok(user.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<UserId> {
        self.simulate_latency().await;
        let mut inner = self.lock();
        inner.users.retain(|u| u.id != *id);
        inner.online.remove(id);
        Ok(*id)
    }

    async fn set_online(&self, id: &UserId, online: bool) -> Result<()> {
        self.simulate_latency().await;
        self.lock().online.insert(*id, online);
        Ok(())
    }
}

#[async_trait]
impl AuthService for MemoryBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload> {
        self.simulate_latency().await;
        if credentials.email == ADMIN_EMAIL && credentials.password == ADMIN_PASSWORD {
            return Ok(AuthPayload {
                user: AuthUser {
                    id: UserId::new(1),
                    name: "Admin User".to_string(),
                    email: credentials.email.clone(),
                    role: Role::Admin,
                },
                token: "mock-admin-token".to_string(),
            });
        }
        if !credentials.email.trim().is_empty() && !credentials.password.is_empty() {
            return Ok(AuthPayload {
                user: AuthUser {
                    id: UserId::new(2),
                    name: "Regular User".to_string(),
                    email: credentials.email.clone(),
                    role: Role::Member,
                },
                token: "mock-user-token".to_string(),
            });
        }
        Err(Error::InvalidCredentials)
    }

    async fn register(&self, registration: &Registration) -> Result<AuthPayload> {
        self.simulate_latency().await;
        if registration.email.trim().is_empty() || registration.password.is_empty() {
            return Err(Error::Validation("Invalid user data".to_string()));
        }
        let mut inner = self.lock();
        let id = UserId::new(inner.next_user_id);
        inner.next_user_id += 1;
        Ok(AuthPayload {
            user: AuthUser {
                id,
                name: registration.full_name.clone(),
                email: registration.email.clone(),
                role: Role::Member,
            },
            token: "mock-token".to_string(),
        })
    }

    async fn logout(&self) -> Result<()> {
        self.simulate_latency().await;
        Ok(())
    }
}

fn sample_posts() -> Vec<Post> {
    vec![Post {
        id: PostId::new(),
        title: "Getting Started with React".to_string(),
        content: "React is a powerful library for building user interfaces...".to_string(),
        category: "Technology".to_string(),
        author: Author {
            id: UserId::new(1),
            name: "John Doe".to_string(),
            avatar: None,
        },
        image: None,
        created_at: Utc::now(),
        likes: 15,
        liked_by: vec![UserId::new(2), UserId::new(3)],
        comments: vec![],
        views: 230,
        tags: vec![
            "react".to_string(),
            "javascript".to_string(),
            "frontend".to_string(),
        ],
    }]
}

fn sample_events() -> Vec<Event> {
    let template = Event {
        id: EventId::new(0),
        title: String::new(),
        description: String::new(),
        date: String::new(),
        time: String::new(),
        location: String::new(),
        dress_code: String::new(),
        category: String::new(),
        status: EventStatus::Upcoming,
        attendance: 0,
        max_capacity: 100,
        image: None,
        created_at: Utc::now(),
        updated_at: None,
    };
    vec![
        Event {
            id: EventId::new(1),
            title: "2025 Graduation Ceremony".to_string(),
            description: "Celebrate the accomplishments of our talented students.".to_string(),
            date: "10 Aug".to_string(),
            time: "8:00 am - 1:00 pm".to_string(),
            location: "Moringa School, Nairobi".to_string(),
            dress_code: "Smart Casual".to_string(),
            category: "Educational".to_string(),
            max_capacity: 200,
            ..template.clone()
        },
        Event {
            id: EventId::new(2),
            title: "Cybersecurity Webinar".to_string(),
            description: "An in-depth webinar on cyber threat intelligence and security."
                .to_string(),
            date: "18 Jul".to_string(),
            time: "5:30 pm - 8:00 pm".to_string(),
            location: "Zoom Webinar".to_string(),
            dress_code: "No dress code (Virtual)".to_string(),
            category: "Technical".to_string(),
            ..template.clone()
        },
        Event {
            id: EventId::new(3),
            title: "Alumni Cocktail Night".to_string(),
            description: "Network and celebrate with fellow alumni.".to_string(),
            date: "25 Sep".to_string(),
            time: "6:00 pm - 9:00 pm".to_string(),
            location: "Westlands, Nairobi".to_string(),
            dress_code: "Formal/Smart Casual".to_string(),
            category: "Social".to_string(),
            max_capacity: 150,
            ..template
        },
    ]
}

fn sample_users() -> Vec<User> {
    vec![
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
            skills: vec![
                "React".to_string(),
                "Node.js".to_string(),
                "Python".to_string(),
            ],
            contributions: Contributions {
                mentoring: 5,
                talks: 2,
                blog_posts: 3,
            },
            last_seen: None,
        },
        User {
            id: UserId::new(2),
            name: "Vinter".to_string(),
            email: None,
            avatar: None,
            role: "UX Designer".to_string(),
            company: "Safaricom".to_string(),
            location: "Mombasa, Kenya".to_string(),
            cohort: "2023".to_string(),
            course: "UI/UX Design".to_string(),
            specialization: "Product Design".to_string(),
            status: "Freelancing".to_string(),
            skills: vec!["Figma".to_string(), "Design Systems".to_string()],
            contributions: Contributions::default(),
            last_seen: None,
        },
    ]
}
