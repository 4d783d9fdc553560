//! Alumni directory collection: state, merge rules, operations, selectors.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{
    NewUser, Notification, NotificationKey, NotificationKind, User, UserId, UserPatch,
};
use crate::store::{OpStatus, Store};

/// Operation families tracked independently on the directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserFamily {
    Fetch,
    Add,
    Update,
    Delete,
}

/// Fixed-shape aggregate of the directory's statuses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersStatus {
    pub fetch: OpStatus,
    pub add: OpStatus,
    pub update: OpStatus,
    pub delete: OpStatus,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct UsersState {
    items: Vec<User>,
    /// Presence flags; absence simply means "not known online"
    online: HashMap<UserId, bool>,
    removed: HashSet<UserId>,
    fetch: OpStatus,
    add: OpStatus,
    update: OpStatus,
    delete: OpStatus,
    error: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

impl UsersState {
    fn status_mut(&mut self, family: UserFamily) -> &mut OpStatus {
        match family {
            UserFamily::Fetch => &mut self.fetch,
            UserFamily::Add => &mut self.add,
            UserFamily::Update => &mut self.update,
            UserFamily::Delete => &mut self.delete,
        }
    }

    pub(crate) fn begin(&mut self, family: UserFamily) {
        *self.status_mut(family) = OpStatus::Pending;
        self.error = None;
    }

    pub(crate) fn succeed(&mut self, family: UserFamily) {
        *self.status_mut(family) = OpStatus::Succeeded;
        self.error = None;
        self.last_updated = Some(Utc::now());
    }

    pub(crate) fn fail(&mut self, family: UserFamily, reason: String) {
        *self.status_mut(family) = OpStatus::Failed;
        self.error = Some(reason);
    }

    fn merge_fetched(&mut self, fetched: &[User]) {
        for user in fetched {
            if self.removed.contains(&user.id) {
                continue;
            }
            if !self.items.iter().any(|existing| existing.id == user.id) {
                self.items.push(user.clone());
            }
        }
    }

    /// New members go to the end of the directory
    fn merge_added(&mut self, user: &User) {
        self.items.retain(|existing| existing.id != user.id);
        self.items.push(user.clone());
    }

    fn apply_patch(&mut self, id: &UserId, patch: &UserPatch) {
        if let Some(user) = self.items.iter_mut().find(|u| u.id == *id) {
            patch.apply(user);
        }
    }

    fn apply_presence(&mut self, id: &UserId, online: bool) {
        self.online.insert(*id, online);
        if let Some(user) = self.items.iter_mut().find(|u| u.id == *id) {
            user.last_seen = Some(Utc::now());
        }
    }

    fn remove(&mut self, id: &UserId) {
        self.items.retain(|u| u.id != *id);
        self.online.remove(id);
        self.removed.insert(*id);
    }

    fn status(&self) -> UsersStatus {
        UsersStatus {
            fetch: self.fetch,
            add: self.add,
            update: self.update,
            delete: self.delete,
            error: self.error.clone(),
        }
    }
}

impl Store {
    /// Fetch the directory and merge unseen ids
    pub async fn fetch_users(&self) -> Result<Vec<User>> {
        let service = self.user_service();
        self.dispatch(
            "users/fetch",
            |state| state.users.begin(UserFamily::Fetch),
            async move { service.fetch_all().await },
            |state, fetched: &Vec<User>| {
                state.users.merge_fetched(fetched);
                state.users.succeed(UserFamily::Fetch);
            },
            |state, reason| state.users.fail(UserFamily::Fetch, reason),
        )
        .await
    }

    /// Add a member to the directory and acknowledge with a notification
    pub async fn add_user(&self, draft: NewUser) -> Result<User> {
        if let Err(error) = draft.validate() {
            self.update(|state| state.users.fail(UserFamily::Add, error.to_string()));
            return Err(error);
        }
        let service = self.user_service();
        self.dispatch(
            "users/add",
            |state| state.users.begin(UserFamily::Add),
            async move { service.add(draft).await },
            |state, user: &User| {
                state.users.merge_added(user);
                state.notifications.push(Notification::new(
                    format!("{} joined the directory", user.name),
                    NotificationKind::Success,
                    Some(NotificationKey::User(user.id)),
                ));
                state.users.succeed(UserFamily::Add);
            },
            |state, reason| state.users.fail(UserFamily::Add, reason),
        )
        .await
    }

    /// Edit a member's profile; the id never changes
    pub async fn update_user_profile(&self, id: UserId, patch: UserPatch) -> Result<User> {
        let service = self.user_service();
        let applied = patch.clone();
        self.dispatch(
            "users/update_profile",
            |state| state.users.begin(UserFamily::Update),
            async move { service.update_profile(&id, patch).await },
            move |state, _confirmed: &User| {
                state.users.apply_patch(&id, &applied);
                state.users.succeed(UserFamily::Update);
            },
            |state, reason| state.users.fail(UserFamily::Update, reason),
        )
        .await
    }

    /// Remove a member, their presence flag, and notifications keyed to them
    pub async fn delete_user(&self, id: UserId) -> Result<UserId> {
        let service = self.user_service();
        self.dispatch(
            "users/delete",
            |state| state.users.begin(UserFamily::Delete),
            async move { service.delete(&id).await },
            |state, deleted: &UserId| {
                state.users.remove(deleted);
                state
                    .notifications
                    .drop_keyed(NotificationKey::User(*deleted));
                state
                    .notifications
                    .push(Notification::success("User successfully deleted"));
                state.users.succeed(UserFamily::Delete);
            },
            |state, reason| state.users.fail(UserFamily::Delete, reason),
        )
        .await
    }

    /// Flag a member online/offline through the service
    pub async fn set_user_online(&self, id: UserId, online: bool) -> Result<()> {
        let service = self.user_service();
        self.dispatch(
            "users/set_online",
            |state| state.users.begin(UserFamily::Update),
            async move { service.set_online(&id, online).await },
            move |state, (): &()| {
                state.users.apply_presence(&id, online);
                state.users.succeed(UserFamily::Update);
            },
            |state, reason| state.users.fail(UserFamily::Update, reason),
        )
        .await
    }

    /// Locally record a presence change pushed from elsewhere (no service
    /// round-trip); writes only when the flag actually changes
    pub fn set_local_user_online(&self, id: UserId, online: bool) {
        self.update(|state| {
            if state.users.online.get(&id).copied() != Some(online) {
                state.users.online.insert(id, online);
            }
        });
    }

    pub fn clear_user_error(&self) {
        self.update(|state| state.users.error = None);
    }

    /// All directory members in current order
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.read(|state| state.users.items.clone())
    }

    /// One member by id; `None` is the not-found sentinel
    #[must_use]
    pub fn user(&self, id: &UserId) -> Option<User> {
        self.read(|state| state.users.items.iter().find(|u| u.id == *id).cloned())
    }

    /// Whether a member is currently flagged online; absence means `false`
    #[must_use]
    pub fn is_user_online(&self, id: &UserId) -> bool {
        self.read(|state| state.users.online.get(id).copied().unwrap_or(false))
    }

    /// Aggregate per-family status snapshot
    #[must_use]
    pub fn users_status(&self) -> UsersStatus {
        self.read(|state| state.users.status())
    }

    /// Timestamp of the last successful directory mutation
    #[must_use]
    pub fn users_last_updated(&self) -> Option<DateTime<Utc>> {
        self.read(|state| state.users.last_updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Contributions;
    use crate::services::{MemoryBackend, MemoryCredentialStore};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn seed_user(id: i64, name: &str) -> User {
        User {
            id: UserId::new(id),
            name: name.to_string(),
            email: None,
            avatar: None,
            role: "Software Engineer".to_string(),
            company: "Microsoft".to_string(),
            location: "Nairobi, Kenya".to_string(),
            cohort: "2023".to_string(),
            course: "Software Engineering".to_string(),
            specialization: "Full Stack Development".to_string(),
            status: "Employed".to_string(),
            skills: vec![],
            contributions: Contributions::default(),
            last_seen: None,
        }
    }

    fn store_with(users: Vec<User>) -> Store {
        let backend = MemoryBackend::new().seed_users(users);
        Store::with_backend(backend, Arc::new(MemoryCredentialStore::new()))
    }

    #[tokio::test]
    async fn presence_defaults_to_offline_and_tracks_updates() {
        let store = store_with(vec![seed_user(1, "Mishael")]);
        store.fetch_users().await.unwrap();

        let id = UserId::new(1);
        assert!(!store.is_user_online(&id));

        store.set_user_online(id, true).await.unwrap();
        assert!(store.is_user_online(&id));
        assert!(store.user(&id).unwrap().last_seen.is_some());

        store.set_user_online(id, false).await.unwrap();
        assert!(!store.is_user_online(&id));
    }

    #[tokio::test]
    async fn local_presence_flag_needs_no_service() {
        let store = store_with(vec![]);
        let id = UserId::new(42);
        store.set_local_user_online(id, true);
        assert!(store.is_user_online(&id));
    }

    #[tokio::test]
    async fn add_user_appends_and_queues_notification() {
        let store = store_with(vec![seed_user(1, "Mishael")]);
        store.fetch_users().await.unwrap();

        let added = store
            .add_user(NewUser {
                name: "Wanjiru".to_string(),
                email: None,
                role: "Data Scientist".to_string(),
                company: "Twiga".to_string(),
                location: "Nairobi".to_string(),
                cohort: "2024".to_string(),
                course: "Data Science".to_string(),
                specialization: "ML".to_string(),
                skills: vec![],
            })
            .await
            .unwrap();

        assert_eq!(added.status, "New");
        assert_eq!(store.users().last().map(|u| u.id), Some(added.id));
        assert_eq!(
            store.notifications()[0].message,
            "Wanjiru joined the directory"
        );
    }

    #[tokio::test]
    async fn delete_user_clears_presence_and_keyed_notifications() {
        let store = store_with(vec![seed_user(1, "Mishael"), seed_user(2, "Vinter")]);
        store.fetch_users().await.unwrap();
        let id = UserId::new(1);
        store.set_user_online(id, true).await.unwrap();

        store.delete_user(id).await.unwrap();

        assert!(store.user(&id).is_none());
        assert!(!store.is_user_online(&id));
        assert_eq!(store.users().len(), 1);
        assert_eq!(
            store.notifications()[0].message,
            "User successfully deleted"
        );
    }

    #[tokio::test]
    async fn profile_patch_preserves_identity() {
        let store = store_with(vec![seed_user(1, "Mishael")]);
        store.fetch_users().await.unwrap();
        let id = UserId::new(1);

        store
            .update_user_profile(
                id,
                UserPatch {
                    company: Some("Safaricom".to_string()),
                    ..UserPatch::default()
                },
            )
            .await
            .unwrap();

        let user = store.user(&id).unwrap();
        assert_eq!(user.company, "Safaricom");
        assert_eq!(user.name, "Mishael");
        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn profile_patch_for_unknown_user_rejects_without_synthesizing() {
        let store = store_with(vec![]);
        store.fetch_users().await.unwrap();

        let result = store
            .update_user_profile(
                UserId::new(99),
                UserPatch {
                    company: Some("Ghost Corp".to_string()),
                    ..UserPatch::default()
                },
            )
            .await;

        assert!(result.is_err());
        assert!(store.users().is_empty());
        assert_eq!(store.users_status().update, OpStatus::Failed);
    }
}
