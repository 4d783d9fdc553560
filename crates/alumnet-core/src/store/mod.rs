//! Client-side entity store and operation lifecycle.
//!
//! One [`Store`] holds every collection (posts, events, users), the session,
//! and the notification queue behind a single mutex. All mutation funnels
//! through [`Store::dispatch`], which produces the pending → settled
//! lifecycle: the collection is marked pending, the service call is awaited
//! with the lock released, and the settlement merge runs atomically against
//! the state current at settlement time. Concurrent operations are allowed;
//! whichever settles last wins the visible per-family status.

pub mod events;
pub mod notifications;
pub mod posts;
pub mod session;
pub mod users;

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::{
    AuthService, CredentialStore, EventService, PostService, UserService,
};

pub use events::{EventFamily, EventsStatus};
pub use posts::{PostFamily, PostsStatus};
pub use session::SessionSnapshot;
pub use users::{UserFamily, UsersStatus};

/// Lifecycle status of one operation family on a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl OpStatus {
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for OpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the client mirrors locally
#[derive(Debug, Default)]
pub(crate) struct AppState {
    pub(crate) posts: posts::PostsState,
    pub(crate) events: events::EventsState,
    pub(crate) users: users::UsersState,
    pub(crate) session: session::SessionState,
    pub(crate) notifications: notifications::NotificationQueue,
}

/// The application store: collections, session, and notification queue
///
/// Cheap to clone; clones share state. Consumers issue operations and read
/// selectors; nobody outside this module touches collection items directly.
#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<AppState>>,
    posts: Arc<dyn PostService>,
    events: Arc<dyn EventService>,
    users: Arc<dyn UserService>,
    auth: Arc<dyn AuthService>,
    credentials: Arc<dyn CredentialStore>,
}

impl Store {
    /// Build a store over explicit service handles
    ///
    /// The credential store is consulted once, here, to seed the session
    /// from a prior login. A restore failure logs a warning and yields an
    /// unauthenticated session.
    pub fn from_parts(
        posts: Arc<dyn PostService>,
        events: Arc<dyn EventService>,
        users: Arc<dyn UserService>,
        auth: Arc<dyn AuthService>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let mut state = AppState::default();
        match credentials.restore() {
            Ok(Some(stored)) => state.session.restore(stored),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!("Failed to restore stored session: {error}");
            }
        }
        Self {
            state: Arc::new(Mutex::new(state)),
            posts,
            events,
            users,
            auth,
            credentials,
        }
    }

    /// Build a store over one backend implementing every service boundary
    pub fn with_backend<B>(backend: B, credentials: Arc<dyn CredentialStore>) -> Self
    where
        B: PostService + EventService + UserService + AuthService + 'static,
    {
        let backend = Arc::new(backend);
        Self::from_parts(
            backend.clone(),
            backend.clone(),
            backend.clone(),
            backend,
            credentials,
        )
    }

    pub(crate) fn post_service(&self) -> Arc<dyn PostService> {
        Arc::clone(&self.posts)
    }

    pub(crate) fn event_service(&self) -> Arc<dyn EventService> {
        Arc::clone(&self.events)
    }

    pub(crate) fn user_service(&self) -> Arc<dyn UserService> {
        Arc::clone(&self.users)
    }

    pub(crate) fn auth_service(&self) -> Arc<dyn AuthService> {
        Arc::clone(&self.auth)
    }

    pub(crate) fn credential_store(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.credentials)
    }

    /// Run one reducer atomically against current state
    ///
    /// The lock is never held across an await point, so every settlement is
    /// observable only in its entirety.
    pub(crate) fn update<R>(&self, reducer: impl FnOnce(&mut AppState) -> R) -> R {
        reducer(&mut self.lock())
    }

    /// Read a selector over current state
    pub(crate) fn read<R>(&self, selector: impl FnOnce(&AppState) -> R) -> R {
        selector(&self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        // Reducers are pure state transitions and cannot panic mid-write,
        // so a poisoned lock still guards consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The uniform operation lifecycle: pending, then exactly one settlement
    ///
    /// `begin` runs synchronously before the service call (status ← pending,
    /// error cleared). Exactly one of `fulfil`/`reject` then runs under the
    /// lock once the call settles, reading collection state current at that
    /// moment rather than a pre-call snapshot. The settled outcome is also
    /// returned so callers never see an unhandled fault.
    pub(crate) async fn dispatch<T, Fut>(
        &self,
        operation: &'static str,
        begin: impl FnOnce(&mut AppState),
        call: Fut,
        fulfil: impl FnOnce(&mut AppState, &T),
        reject: impl FnOnce(&mut AppState, String),
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        tracing::debug!(operation, "dispatching");
        self.update(begin);
        match call.await {
            Ok(payload) => {
                self.update(|state| fulfil(state, &payload));
                tracing::debug!(operation, "fulfilled");
                Ok(payload)
            }
            Err(error) => {
                let reason = error.to_string();
                tracing::warn!(operation, %reason, "rejected");
                self.update(|state| reject(state, reason));
                Err(error)
            }
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("Store").finish_non_exhaustive()
    }
}
