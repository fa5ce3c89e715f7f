//! Durable visitor identity storage.
//!
//! The visitor id lives in client-side persistent storage and is never
//! deleted by the widget; the server only references it. Minting happens
//! on first load (or server-side when a request arrives without one).

use std::sync::Mutex;

use crate::memory::engine::mint_visitor_id;

/// Client-side persistent store for the visitor identifier.
///
/// Browser embedders back this with local storage; tests and native
/// embedders use [`InMemoryIdentityStore`].
pub trait VisitorIdentityStore: Send + Sync {
    /// The stored visitor id, if one exists.
    fn load(&self) -> Option<String>;

    /// Persist a visitor id, replacing any previous value.
    fn store(&self, visitor_id: &str);
}

/// Resolve the durable visitor id, minting and persisting one if absent.
pub fn resolve_visitor_id<S: VisitorIdentityStore>(store: &S) -> String {
    match store.load() {
        Some(id) if !id.trim().is_empty() => id,
        _ => {
            let id = mint_visitor_id();
            store.store(&id);
            id
        }
    }
}

/// Identity store held in memory, for tests and short-lived embedders.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    value: Mutex<Option<String>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(visitor_id: &str) -> Self {
        Self { value: Mutex::new(Some(visitor_id.to_string())) }
    }
}

impl VisitorIdentityStore for InMemoryIdentityStore {
    fn load(&self) -> Option<String> {
        self.value.lock().unwrap().clone()
    }

    fn store(&self, visitor_id: &str) {
        *self.value.lock().unwrap() = Some(visitor_id.to_string());
    }
}
