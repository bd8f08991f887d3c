//! Credential storage
//!
//! The auth token lives in one of two scopes, chosen by the "remember
//! me" option at login: persistent (survives restarts) or session-only.
//! Only the HTTP client's 401 handler and the login/logout flows touch
//! the store; everything else receives an already-configured client.

use std::sync::Mutex;

/// Injectable token store with the two storage scopes
///
/// On read, a persistent ("remembered") token takes precedence over a
/// session-scoped one.
pub trait CredentialStore: Send + Sync {
    /// Current token, if any
    fn get(&self) -> Option<String>;

    /// Store a token in the chosen scope
    fn set(&self, token: &str, persistent: bool);

    /// Clear both scopes (logout, or 401 from the server)
    fn clear(&self);
}

#[derive(Debug, Default)]
struct Scopes {
    persistent: Option<String>,
    session: Option<String>,
}

/// In-memory reference implementation
///
/// Host applications with real persistence (keyring, config file) bring
/// their own `CredentialStore`; this one backs tests and kiosks that
/// only use the public, unauthenticated endpoints.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    scopes: Mutex<Scopes>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        let scopes = self.scopes.lock().expect("credential store poisoned");
        scopes.persistent.clone().or_else(|| scopes.session.clone())
    }

    fn set(&self, token: &str, persistent: bool) {
        let mut scopes = self.scopes.lock().expect("credential store poisoned");
        if persistent {
            scopes.persistent = Some(token.to_string());
        } else {
            scopes.session = Some(token.to_string());
        }
    }

    fn clear(&self) {
        let mut scopes = self.scopes.lock().expect("credential store poisoned");
        scopes.persistent = None;
        scopes.session = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_persistent_beats_session() {
        let store = MemoryCredentialStore::new();
        store.set("session-token", false);
        store.set("remembered-token", true);
        assert_eq!(store.get().as_deref(), Some("remembered-token"));
    }

    #[test]
    fn test_session_only() {
        let store = MemoryCredentialStore::new();
        store.set("session-token", false);
        assert_eq!(store.get().as_deref(), Some("session-token"));
    }

    #[test]
    fn test_clear_wipes_both_scopes() {
        let store = MemoryCredentialStore::new();
        store.set("a", true);
        store.set("b", false);
        store.clear();
        assert_eq!(store.get(), None);
    }
}
