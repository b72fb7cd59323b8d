//! Injected session and settings storage.
//!
//! Auth and saved settings are an explicit object with a defined
//! load/save lifecycle, passed to the components that need it, instead
//! of ambient key-value storage reachable from anywhere. The storage
//! backend is a trait so the browser shell can plug in persistent
//! storage while tests use an in-memory map.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Key-value storage backend for session settings.
pub trait SettingsStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store, used in tests and headless contexts.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl SettingsStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// The signed-in user's settings, as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub user_name: String,
    pub is_admin: bool,
}

const SESSION_KEY: &str = "session";

/// An explicit session object owning its storage backend.
///
/// The current state lives in memory; the store is written on sign-in
/// and sign-out, and read once at construction.
#[derive(Debug)]
pub struct Session<S: SettingsStore> {
    store: S,
    current: Option<UserSettings>,
}

impl<S: SettingsStore> Session<S> {
    /// Load the session from the store. Unreadable or missing state
    /// means signed out.
    pub fn load(store: S) -> Self {
        let current = store.load(SESSION_KEY).and_then(|raw| {
            serde_json::from_str(&raw)
                .inspect_err(|err| debug!(%err, "discarding unreadable session state"))
                .ok()
        });
        Self { store, current }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current.as_ref().is_some_and(|user| user.is_admin)
    }

    pub fn user_name(&self) -> Option<&str> {
        self.current.as_ref().map(|user| user.user_name.as_str())
    }

    pub fn current(&self) -> Option<&UserSettings> {
        self.current.as_ref()
    }

    /// Sign in and persist the settings.
    pub fn sign_in(&mut self, settings: UserSettings) {
        if let Ok(raw) = serde_json::to_string(&settings) {
            self.store.save(SESSION_KEY, &raw);
        }
        self.current = Some(settings);
    }

    /// Sign out and clear persisted state.
    pub fn sign_out(&mut self) {
        self.store.remove(SESSION_KEY);
        self.current = None;
    }
}
