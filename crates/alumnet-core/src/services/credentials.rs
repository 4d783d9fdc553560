//! Credential persistence across process restarts.
//!
//! Consulted exactly once at store construction to seed the session, written
//! exactly once per successful login/registration, and cleared exactly once
//! per successful logout.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::StoredCredentials;

/// Pluggable credential storage
pub trait CredentialStore: Send + Sync {
    /// Load previously persisted credentials, if any
    fn restore(&self) -> Result<Option<StoredCredentials>>;
    fn persist(&self, credentials: &StoredCredentials) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// In-memory credential store for tests and the demo CLI
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<StoredCredentials>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the store, as if a prior session had persisted credentials
    #[must_use]
    pub fn with_credentials(credentials: StoredCredentials) -> Self {
        Self {
            slot: Mutex::new(Some(credentials)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<StoredCredentials>> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn restore(&self) -> Result<Option<StoredCredentials>> {
        Ok(self.lock().clone())
    }

    fn persist(&self, credentials: &StoredCredentials) -> Result<()> {
        *self.lock() = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}

/// Credential store backed by a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn restore(&self) -> Result<Option<StoredCredentials>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(Error::CredentialStore(error.to_string())),
        }
    }

    fn persist(&self, credentials: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let serialized = serde_json::to_string(credentials)?;
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(Error::CredentialStore(error.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuthUser, Role, UserId};
    use pretty_assertions::assert_eq;

    fn credentials() -> StoredCredentials {
        StoredCredentials {
            token: "token-1".to_string(),
            user: AuthUser {
                id: UserId::new(1),
                name: "Admin User".to_string(),
                email: "admin@example.com".to_string(),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.restore().unwrap(), None);
        store.persist(&credentials()).unwrap();
        assert_eq!(store.restore().unwrap(), Some(credentials()));
        store.clear().unwrap();
        assert_eq!(store.restore().unwrap(), None);
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("session.json"));
        assert_eq!(store.restore().unwrap(), None);
        store.persist(&credentials()).unwrap();
        assert_eq!(store.restore().unwrap(), Some(credentials()));
        store.clear().unwrap();
        assert_eq!(store.restore().unwrap(), None);
        // Clearing an already-empty store is fine
        store.clear().unwrap();
    }
}
