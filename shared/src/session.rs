use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::ClientConfig;
use crate::models::TokenPair;

/// Key/value storage for credentials. The browser uses localStorage.
pub trait CredentialStore {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory store for tests and non-browser callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.store(key, value);
        store
    }
}

impl CredentialStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn store(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
}

/// The only place that reads or writes stored credentials.
#[derive(Debug, Clone)]
pub struct Session<S> {
    store: S,
    access_key: String,
    username_key: String,
}

impl<S: CredentialStore> Session<S> {
    pub fn new(store: S, config: &ClientConfig) -> Self {
        Self {
            store,
            access_key: config.access_key.clone(),
            username_key: config.username_key.clone(),
        }
    }

    /// Empty strings count as absent.
    pub fn access_token(&self) -> Option<String> {
        self.store.load(&self.access_key).filter(|t| !t.is_empty())
    }

    pub fn username(&self) -> Option<String> {
        self.store.load(&self.username_key).filter(|u| !u.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// Presence of the token is the whole check: no expiry, no refresh.
    pub fn guard(&self) -> GuardDecision {
        if self.is_authenticated() {
            GuardDecision::Allow
        } else {
            GuardDecision::RedirectToLogin
        }
    }

    pub fn sign_in(&self, tokens: &TokenPair, username: &str) {
        self.store.store(&self.access_key, &tokens.access);
        self.store.store(&self.username_key, username);
        tracing::debug!(username, "signed in");
    }

    pub fn sign_out(&self) {
        self.store.remove(&self.access_key);
        self.store.remove(&self.username_key);
        tracing::debug!("signed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(store: MemoryStore) -> Session<MemoryStore> {
        Session::new(store, &ClientConfig::default())
    }

    #[test]
    fn no_token_redirects() {
        let s = session(MemoryStore::new());
        assert_eq!(s.guard(), GuardDecision::RedirectToLogin);
        assert!(s.access_token().is_none());
    }

    #[test]
    fn empty_token_redirects() {
        let s = session(MemoryStore::with("access", ""));
        assert_eq!(s.guard(), GuardDecision::RedirectToLogin);
    }

    #[test]
    fn sign_in_then_out() {
        let store = MemoryStore::new();
        let s = session(store.clone());
        s.sign_in(
            &TokenPair {
                access: "abc".into(),
                refresh: "def".into(),
            },
            "ada",
        );
        assert_eq!(s.guard(), GuardDecision::Allow);
        assert_eq!(s.username().as_deref(), Some("ada"));
        // refresh token is never persisted
        assert!(store.load("refresh").is_none());

        s.sign_out();
        assert_eq!(s.guard(), GuardDecision::RedirectToLogin);
        assert!(s.username().is_none());
    }
}
