//! Events collection: state, merge rules, operations, and selectors.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    Event, EventId, EventPatch, EventStatus, NewEvent, Notification, NotificationKey,
    NotificationKind,
};
use crate::store::{OpStatus, Store};

/// Operation families tracked independently on the events collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFamily {
    Fetch,
    Create,
    Update,
    Delete,
}

/// Fixed-shape aggregate of the events collection's statuses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsStatus {
    pub fetch: OpStatus,
    pub create: OpStatus,
    pub update: OpStatus,
    pub delete: OpStatus,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct EventsState {
    items: Vec<Event>,
    removed: HashSet<EventId>,
    fetch: OpStatus,
    create: OpStatus,
    update: OpStatus,
    delete: OpStatus,
    error: Option<String>,
    /// Observability only; correctness never depends on it
    last_updated: Option<DateTime<Utc>>,
}

impl EventsState {
    fn status_mut(&mut self, family: EventFamily) -> &mut OpStatus {
        match family {
            EventFamily::Fetch => &mut self.fetch,
            EventFamily::Create => &mut self.create,
            EventFamily::Update => &mut self.update,
            EventFamily::Delete => &mut self.delete,
        }
    }

    pub(crate) fn begin(&mut self, family: EventFamily) {
        *self.status_mut(family) = OpStatus::Pending;
        self.error = None;
    }

    pub(crate) fn succeed(&mut self, family: EventFamily) {
        *self.status_mut(family) = OpStatus::Succeeded;
        self.error = None;
        self.last_updated = Some(Utc::now());
    }

    pub(crate) fn fail(&mut self, family: EventFamily, reason: String) {
        *self.status_mut(family) = OpStatus::Failed;
        self.error = Some(reason);
    }

    fn merge_fetched(&mut self, fetched: &[Event]) {
        for event in fetched {
            if self.removed.contains(&event.id) {
                continue;
            }
            if !self.items.iter().any(|existing| existing.id == event.id) {
                self.items.push(event.clone());
            }
        }
    }

    /// New events go to the end of the calendar listing
    fn merge_created(&mut self, event: &Event) {
        self.items.retain(|existing| existing.id != event.id);
        self.items.push(event.clone());
    }

    fn apply_status(&mut self, id: &EventId, status: EventStatus) {
        if let Some(event) = self.items.iter_mut().find(|e| e.id == *id) {
            event.status = status;
            event.updated_at = Some(Utc::now());
        }
    }

    fn apply_patch(&mut self, id: &EventId, patch: &EventPatch) {
        if let Some(event) = self.items.iter_mut().find(|e| e.id == *id) {
            patch.apply(event);
            event.updated_at = Some(Utc::now());
        }
    }

    fn remove(&mut self, id: &EventId) {
        self.items.retain(|e| e.id != *id);
        self.removed.insert(*id);
    }

    fn status(&self) -> EventsStatus {
        EventsStatus {
            fetch: self.fetch,
            create: self.create,
            update: self.update,
            delete: self.delete,
            error: self.error.clone(),
        }
    }
}

impl Store {
    /// Fetch all events and merge unseen ids
    pub async fn fetch_events(&self) -> Result<Vec<Event>> {
        let service = self.event_service();
        self.dispatch(
            "events/fetch",
            |state| state.events.begin(EventFamily::Fetch),
            async move { service.fetch_all().await },
            |state, fetched: &Vec<Event>| {
                state.events.merge_fetched(fetched);
                state.events.succeed(EventFamily::Fetch);
            },
            |state, reason| state.events.fail(EventFamily::Fetch, reason),
        )
        .await
    }

    /// Create an event; blank title/description is rejected before the call
    pub async fn create_event(&self, draft: NewEvent) -> Result<Event> {
        if let Err(error) = draft.validate() {
            self.update(|state| state.events.fail(EventFamily::Create, error.to_string()));
            return Err(error);
        }
        let service = self.event_service();
        self.dispatch(
            "events/create",
            |state| state.events.begin(EventFamily::Create),
            async move { service.create(draft).await },
            |state, event: &Event| {
                state.events.merge_created(event);
                state.events.succeed(EventFamily::Create);
            },
            |state, reason| state.events.fail(EventFamily::Create, reason),
        )
        .await
    }

    /// Change an event's status and queue a notification carrying the new
    /// status as its kind
    pub async fn set_event_status(
        &self,
        id: EventId,
        status: EventStatus,
        message: impl Into<String>,
    ) -> Result<Event> {
        let message = message.into();
        let service = self.event_service();
        let call_message = message.clone();
        self.dispatch(
            "events/set_status",
            |state| state.events.begin(EventFamily::Update),
            async move {
                service
                    .set_status(&id, status, Some(&call_message))
                    .await
            },
            move |state, _confirmed: &Event| {
                state.events.apply_status(&id, status);
                state.notifications.push(Notification::new(
                    message,
                    NotificationKind::Status(status),
                    Some(NotificationKey::Event(id)),
                ));
                state.events.succeed(EventFamily::Update);
            },
            |state, reason| state.events.fail(EventFamily::Update, reason),
        )
        .await
    }

    /// Edit event details; the patch merges into the record at settlement
    pub async fn update_event(&self, id: EventId, patch: EventPatch) -> Result<Event> {
        let service = self.event_service();
        let applied = patch.clone();
        self.dispatch(
            "events/update",
            |state| state.events.begin(EventFamily::Update),
            async move { service.update(&id, patch).await },
            move |state, _confirmed: &Event| {
                state.events.apply_patch(&id, &applied);
                state.events.succeed(EventFamily::Update);
            },
            |state, reason| state.events.fail(EventFamily::Update, reason),
        )
        .await
    }

    /// Send an attendee notification for an event
    pub async fn send_event_notification(
        &self,
        id: EventId,
        message: impl Into<String>,
    ) -> Result<()> {
        let message = message.into();
        let service = self.event_service();
        let queued = message.clone();
        self.dispatch(
            "events/notify",
            |state| state.events.begin(EventFamily::Update),
            async move { service.notify(&id, &message).await },
            move |state, (): &()| {
                state.notifications.push(Notification::new(
                    queued,
                    NotificationKind::Success,
                    Some(NotificationKey::Event(id)),
                ));
                state.events.succeed(EventFamily::Update);
            },
            |state, reason| state.events.fail(EventFamily::Update, reason),
        )
        .await
    }

    /// Delete an event, drop notifications keyed to it, and acknowledge
    pub async fn delete_event(&self, id: EventId) -> Result<EventId> {
        let service = self.event_service();
        self.dispatch(
            "events/delete",
            |state| state.events.begin(EventFamily::Delete),
            async move { service.delete(&id).await },
            |state, deleted: &EventId| {
                state.events.remove(deleted);
                state
                    .notifications
                    .drop_keyed(NotificationKey::Event(*deleted));
                state
                    .notifications
                    .push(Notification::success("Event successfully deleted"));
                state.events.succeed(EventFamily::Delete);
            },
            |state, reason| state.events.fail(EventFamily::Delete, reason),
        )
        .await
    }

    /// All events in current display order
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.read(|state| state.events.items.clone())
    }

    /// One event by id; `None` is the not-found sentinel
    #[must_use]
    pub fn event(&self, id: &EventId) -> Option<Event> {
        self.read(|state| state.events.items.iter().find(|e| e.id == *id).cloned())
    }

    /// Aggregate per-family status snapshot
    #[must_use]
    pub fn events_status(&self) -> EventsStatus {
        self.read(|state| state.events.status())
    }

    /// Timestamp of the last successful events mutation
    #[must_use]
    pub fn events_last_updated(&self) -> Option<DateTime<Utc>> {
        self.read(|state| state.events.last_updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MemoryBackend, MemoryCredentialStore};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn seed_event(id: i64, title: &str) -> Event {
        Event {
            id: EventId::new(id),
            title: title.to_string(),
            description: "desc".to_string(),
            date: "10 Aug".to_string(),
            time: "8:00 am - 1:00 pm".to_string(),
            location: "Nairobi".to_string(),
            dress_code: "Smart Casual".to_string(),
            category: "Educational".to_string(),
            status: EventStatus::Upcoming,
            attendance: 0,
            max_capacity: 200,
            image: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn store_with(events: Vec<Event>) -> Store {
        let backend = MemoryBackend::new().seed_events(events);
        Store::with_backend(backend, Arc::new(MemoryCredentialStore::new()))
    }

    #[tokio::test]
    async fn status_change_patches_record_and_queues_typed_notification() {
        let store = store_with(vec![seed_event(1, "Graduation Ceremony")]);
        store.fetch_events().await.unwrap();

        store
            .set_event_status(
                EventId::new(1),
                EventStatus::Cancelled,
                "Cancelled due to weather",
            )
            .await
            .unwrap();

        let event = store.event(&EventId::new(1)).unwrap();
        assert_eq!(event.status, EventStatus::Cancelled);
        assert!(event.updated_at.is_some());

        let notifications = store.notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].message, "Cancelled due to weather");
        assert_eq!(
            notifications[0].kind,
            NotificationKind::Status(EventStatus::Cancelled)
        );
        assert_eq!(store.events_status().update, OpStatus::Succeeded);
    }

    #[tokio::test]
    async fn status_change_of_missing_event_rejects_without_mutation() {
        let store = store_with(vec![]);
        store.fetch_events().await.unwrap();

        let result = store
            .set_event_status(EventId::new(9), EventStatus::Ongoing, "kickoff")
            .await;
        assert!(result.is_err());
        assert_eq!(store.events_status().update, OpStatus::Failed);
        assert!(store.events_status().error.is_some());
        assert!(store.notifications().is_empty());
    }

    #[tokio::test]
    async fn delete_drops_keyed_notifications_and_acknowledges() {
        let store = store_with(vec![seed_event(1, "Cocktail Night"), seed_event(2, "Hike")]);
        store.fetch_events().await.unwrap();
        store
            .set_event_status(EventId::new(1), EventStatus::Postponed, "Venue issue")
            .await
            .unwrap();

        store.delete_event(EventId::new(1)).await.unwrap();

        assert!(store.event(&EventId::new(1)).is_none());
        assert_eq!(store.events().len(), 1);
        let notifications = store.notifications();
        // The keyed "Venue issue" entry is gone; only the delete ack remains
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].message, "Event successfully deleted");
    }

    #[tokio::test]
    async fn deleted_event_is_not_resurrected_by_refetch() {
        let backend = MemoryBackend::new().seed_events(vec![seed_event(1, "Bootcamp")]);
        let store = Store::with_backend(backend.clone(), Arc::new(MemoryCredentialStore::new()));
        store.fetch_events().await.unwrap();
        store.delete_event(EventId::new(1)).await.unwrap();

        // Stale payload still containing the deleted id
        let _ = backend.seed_events(vec![seed_event(1, "Bootcamp")]);
        store.fetch_events().await.unwrap();
        assert!(store.event(&EventId::new(1)).is_none());
    }

    #[tokio::test]
    async fn create_appends_and_stamps_last_updated() {
        let store = store_with(vec![seed_event(1, "Webinar")]);
        store.fetch_events().await.unwrap();
        assert!(store.events_last_updated().is_some());

        let created = store
            .create_event(NewEvent {
                title: "Frontend Workshop".to_string(),
                description: "Master React and Next.js.".to_string(),
                date: "22 Jan".to_string(),
                time: "9:00 am - 4:00 pm".to_string(),
                location: "Kikao64, Eldoret".to_string(),
                dress_code: "Smart Casual".to_string(),
                category: "Technical".to_string(),
                max_capacity: Some(40),
                image: None,
            })
            .await
            .unwrap();

        let events = store.events();
        assert_eq!(events.last().map(|e| e.id), Some(created.id));
    }

    #[tokio::test]
    async fn send_notification_queues_keyed_entry() {
        let store = store_with(vec![seed_event(1, "Hike")]);
        store.fetch_events().await.unwrap();

        store
            .send_event_notification(EventId::new(1), "Meet at the gate at 7am")
            .await
            .unwrap();

        let notifications = store.notifications();
        assert_eq!(notifications[0].message, "Meet at the gate at 7am");
        assert_eq!(
            notifications[0].entity,
            Some(NotificationKey::Event(EventId::new(1)))
        );
    }
}
