//! Notification queue: transient, dismissible, newest-first.

use crate::models::{Notification, NotificationId, NotificationKey};
use crate::store::Store;

/// Ordered queue of transient messages, most recent first
///
/// No deduplication: two identical messages may coexist, since duplicate
/// user actions should each be acknowledged.
#[derive(Debug, Default)]
pub(crate) struct NotificationQueue {
    items: Vec<Notification>,
}

impl NotificationQueue {
    /// Prepend a notification (newest-first ordering)
    pub(crate) fn push(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    /// Remove one entry by id; no-op when absent
    pub(crate) fn dismiss(&mut self, id: NotificationId) {
        self.items.retain(|n| n.id != id);
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// Drop every entry keyed to the given entity (used by deletes)
    pub(crate) fn drop_keyed(&mut self, key: NotificationKey) {
        self.items.retain(|n| n.entity != Some(key));
    }

    pub(crate) fn items(&self) -> &[Notification] {
        &self.items
    }
}

impl Store {
    /// Current notifications, newest first
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.read(|state| state.notifications.items().to_vec())
    }

    /// Dismiss a single notification; unknown ids are ignored
    pub fn dismiss_notification(&self, id: NotificationId) {
        self.update(|state| state.notifications.dismiss(id));
    }

    /// Empty the queue
    pub fn clear_notifications(&self) {
        self.update(|state| state.notifications.clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventId, NotificationKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn push_prepends_and_dismiss_removes_by_id() {
        let mut queue = NotificationQueue::default();
        let first = Notification::success("first");
        let second = Notification::success("second");
        queue.push(first.clone());
        queue.push(second.clone());

        assert_eq!(queue.items()[0].id, second.id);
        queue.dismiss(first.id);
        assert_eq!(queue.items().len(), 1);
        assert_eq!(queue.items()[0].id, second.id);
    }

    #[test]
    fn dismissing_unknown_id_is_a_noop() {
        let mut queue = NotificationQueue::default();
        queue.push(Notification::success("only"));
        queue.dismiss(NotificationId::new());
        assert_eq!(queue.items().len(), 1);
    }

    #[test]
    fn duplicate_messages_coexist() {
        let mut queue = NotificationQueue::default();
        queue.push(Notification::success("Event successfully deleted"));
        queue.push(Notification::success("Event successfully deleted"));
        assert_eq!(queue.items().len(), 2);
    }

    #[test]
    fn drop_keyed_only_touches_matching_entries() {
        let mut queue = NotificationQueue::default();
        let keyed = Notification::new(
            "Event cancelled",
            NotificationKind::Error,
            Some(NotificationKey::Event(EventId::new(1))),
        );
        let other = Notification::new(
            "Event postponed",
            NotificationKind::Error,
            Some(NotificationKey::Event(EventId::new(2))),
        );
        let unkeyed = Notification::success("saved");
        queue.push(keyed);
        queue.push(other.clone());
        queue.push(unkeyed.clone());

        queue.drop_keyed(NotificationKey::Event(EventId::new(1)));
        let remaining: Vec<_> = queue.items().iter().map(|n| n.id).collect();
        assert_eq!(remaining, vec![unkeyed.id, other.id]);
    }
}
