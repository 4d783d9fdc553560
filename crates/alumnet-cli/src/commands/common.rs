//! Shared output formatting for the command handlers.

use alumnet_core::models::{Event, Notification, Post, User};
use alumnet_core::Store;

/// One-line listing entry for a post
pub fn format_post_line(post: &Post) -> String {
    format!(
        "{}  [{}] {} - {} like(s), {} comment(s), {} view(s)",
        post.id, post.category, post.title, post.likes, post.comments.len(), post.views
    )
}

/// One-line listing entry for an event
pub fn format_event_line(event: &Event) -> String {
    format!(
        "#{}  {} - {} @ {} ({})",
        event.id, event.date, event.title, event.location, event.status
    )
}

/// One-line listing entry for a directory user
pub fn format_user_line(user: &User, online: bool) -> String {
    let presence = if online { "online" } else { "offline" };
    format!(
        "#{}  {} - {} at {} [{}]",
        user.id, user.name, user.role, user.company, presence
    )
}

fn format_notification(notification: &Notification) -> String {
    format!(
        "  • {} ({})",
        notification.message,
        notification.timestamp.format("%H:%M:%S")
    )
}

/// Print any notifications the last operation queued
pub fn print_notifications(store: &Store) {
    let notifications = store.notifications();
    if notifications.is_empty() {
        return;
    }
    println!("Notifications:");
    for notification in &notifications {
        println!("{}", format_notification(notification));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alumnet_core::models::{Author, Contributions, PostId, UserId};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    #[test]
    fn post_line_includes_counts() {
        let post = Post {
            id: PostId::new(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            category: "Tech".to_string(),
            author: Author {
                id: UserId::new(1),
                name: "A".to_string(),
                avatar: None,
            },
            image: None,
            created_at: Utc::now(),
            likes: 2,
            liked_by: vec![UserId::new(1), UserId::new(2)],
            comments: vec![],
            views: 9,
            tags: vec![],
        };
        let line = format_post_line(&post);
        assert!(line.contains("2 like(s)"));
        assert!(line.contains("9 view(s)"));
    }

    #[test]
    fn user_line_reflects_presence() {
        let user = User {
            id: UserId::new(3),
            name: "Vinter".to_string(),
            email: None,
            avatar: None,
            role: "UX Designer".to_string(),
            company: "Safaricom".to_string(),
            location: "Mombasa".to_string(),
            cohort: "2023".to_string(),
            course: "UI/UX Design".to_string(),
            specialization: "Product Design".to_string(),
            status: "Freelancing".to_string(),
            skills: vec![],
            contributions: Contributions::default(),
            last_seen: None,
        };
        assert_eq!(
            format_user_line(&user, true),
            "#3  Vinter - UX Designer at Safaricom [online]"
        );
    }
}
