//! Session state: the single-instance "collection" holding the identity.

use crate::error::Result;
use crate::models::{AuthPayload, AuthUser, Credentials, Registration, Role, StoredCredentials};
use crate::services::CredentialStore;
use crate::store::{OpStatus, Store};

/// Point-in-time view of the session for consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub user: Option<AuthUser>,
    pub is_authenticated: bool,
    pub is_admin: bool,
    pub status: OpStatus,
    pub error: Option<String>,
    /// One-shot flag set by a successful logout; callers reset it explicitly
    pub logout_success: bool,
}

#[derive(Debug, Default)]
pub(crate) struct SessionState {
    user: Option<AuthUser>,
    token: Option<String>,
    is_authenticated: bool,
    /// Always derived from `user.role`; never set independently
    is_admin: bool,
    status: OpStatus,
    error: Option<String>,
    logout_success: bool,
}

impl SessionState {
    fn begin(&mut self) {
        self.status = OpStatus::Pending;
        self.error = None;
    }

    /// Install an authenticated identity; `is_admin` is recomputed from the
    /// role so the invariant holds after every transition
    fn establish(&mut self, payload: &AuthPayload) {
        self.is_admin = payload.user.role == Role::Admin;
        self.user = Some(payload.user.clone());
        self.token = Some(payload.token.clone());
        self.is_authenticated = true;
        self.logout_success = false;
        self.status = OpStatus::Succeeded;
        self.error = None;
    }

    fn reject(&mut self, reason: String) {
        self.status = OpStatus::Failed;
        self.error = Some(reason);
    }

    fn clear(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
        self.is_admin = false;
        self.status = OpStatus::Succeeded;
        self.error = None;
        self.logout_success = true;
    }

    /// Seed from credentials a prior session persisted
    pub(crate) fn restore(&mut self, stored: StoredCredentials) {
        self.is_admin = stored.user.role == Role::Admin;
        self.user = Some(stored.user);
        self.token = Some(stored.token);
        self.is_authenticated = true;
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            is_authenticated: self.is_authenticated,
            is_admin: self.is_admin,
            status: self.status,
            error: self.error.clone(),
            logout_success: self.logout_success,
        }
    }
}

fn persist_credentials(store: &dyn CredentialStore, payload: &AuthPayload) {
    let stored = StoredCredentials {
        token: payload.token.clone(),
        user: payload.user.clone(),
    };
    if let Err(error) = store.persist(&stored) {
        tracing::warn!("Failed to persist session credentials: {error}");
    }
}

impl Store {
    /// Log in; on success the identity is installed and persisted exactly once
    pub async fn login(&self, credentials: Credentials) -> Result<AuthPayload> {
        let auth = self.auth_service();
        let credential_store = self.credential_store();
        self.dispatch(
            "auth/login",
            |state| state.session.begin(),
            async move { auth.login(&credentials).await },
            move |state, payload: &AuthPayload| {
                state.session.establish(payload);
                persist_credentials(credential_store.as_ref(), payload);
            },
            |state, reason| state.session.reject(reason),
        )
        .await
    }

    /// Register a new account; fulfilment behaves exactly like login
    pub async fn register(&self, registration: Registration) -> Result<AuthPayload> {
        let auth = self.auth_service();
        let credential_store = self.credential_store();
        self.dispatch(
            "auth/register",
            |state| state.session.begin(),
            async move { auth.register(&registration).await },
            move |state, payload: &AuthPayload| {
                state.session.establish(payload);
                persist_credentials(credential_store.as_ref(), payload);
            },
            |state, reason| state.session.reject(reason),
        )
        .await
    }

    /// Log out; either fully logged out or (on rejection) unchanged except
    /// for `error`; partial logout is never observable
    pub async fn logout(&self) -> Result<()> {
        let auth = self.auth_service();
        let credential_store = self.credential_store();
        self.dispatch(
            "auth/logout",
            |state| state.session.begin(),
            async move { auth.logout().await },
            move |state, (): &()| {
                state.session.clear();
                if let Err(error) = credential_store.clear() {
                    tracing::warn!("Failed to clear stored credentials: {error}");
                }
            },
            |state, reason| state.session.reject(reason),
        )
        .await
    }

    /// Reset the one-shot logout flag after the UI consumed it
    pub fn reset_logout_flag(&self) {
        self.update(|state| state.session.logout_success = false);
    }

    pub fn clear_auth_error(&self) {
        self.update(|state| state.session.error = None);
    }

    /// Current session view
    #[must_use]
    pub fn session(&self) -> SessionSnapshot {
        self.read(|state| state.session.snapshot())
    }
}
