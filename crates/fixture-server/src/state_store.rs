//! In-memory versioned holder for the state document pair.

use std::sync::Arc;

use fixture_core::StateFixture;
use parking_lot::RwLock;

/// Holds the DEFAULT and CURRENT state fixtures.
///
/// DEFAULT is captured once at construction and never mutated. CURRENT is
/// replaced wholesale by [`load`](StateStore::load) — readers hold an `Arc`
/// to a complete, previously committed fixture and can never observe a
/// partial write. Absence of loaded state is not an error: CURRENT starts
/// as DEFAULT, so a request arriving before the first load is served the
/// default pair.
#[derive(Debug)]
pub struct StateStore {
    default: Arc<StateFixture>,
    current: RwLock<Arc<StateFixture>>,
}

impl StateStore {
    /// Store whose DEFAULT is the empty document pair.
    pub fn new() -> Self {
        Self::with_default(StateFixture::default())
    }

    /// Store with an explicit DEFAULT fixture.
    pub fn with_default(default: StateFixture) -> Self {
        let default = Arc::new(default);
        Self {
            current: RwLock::new(Arc::clone(&default)),
            default,
        }
    }

    /// Replace CURRENT atomically.
    pub fn load(&self, fixture: StateFixture) {
        *self.current.write() = Arc::new(fixture);
    }

    /// The current fixture. Never blocks on anything but the lock itself
    /// and never fails.
    pub fn get(&self) -> Arc<StateFixture> {
        Arc::clone(&self.current.read())
    }

    /// Restore CURRENT from the immutable DEFAULT.
    pub fn reset_to_default(&self) {
        *self.current.write() = Arc::clone(&self.default);
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serves_default_before_any_load() {
        let store = StateStore::new();
        assert_eq!(*store.get(), StateFixture::default());
    }

    #[test]
    fn load_replaces_current_wholesale() {
        let store = StateStore::new();
        store.load(StateFixture::with_state(json!({"user": {"loggedIn": true}})));
        assert_eq!(store.get().state, json!({"user": {"loggedIn": true}}));

        store.load(StateFixture::with_state(json!({"user": {}})));
        assert_eq!(store.get().state, json!({"user": {}}));
    }

    #[test]
    fn load_is_idempotent() {
        let store = StateStore::new();
        let fixture = StateFixture::with_state(json!({"a": 1}));
        store.load(fixture.clone());
        let first = store.get();
        store.load(fixture);
        assert_eq!(*store.get(), *first);
    }

    #[test]
    fn reset_restores_the_untouched_default() {
        let store = StateStore::with_default(StateFixture::with_state(json!({"seed": true})));
        store.load(StateFixture::with_state(json!({"seed": false, "dirty": 1})));
        store.reset_to_default();
        assert_eq!(store.get().state, json!({"seed": true}));
    }

    #[test]
    fn readers_keep_their_snapshot_across_a_load() {
        let store = StateStore::new();
        store.load(StateFixture::with_state(json!({"v": 1})));
        let snapshot = store.get();
        store.load(StateFixture::with_state(json!({"v": 2})));
        assert_eq!(snapshot.state, json!({"v": 1}));
        assert_eq!(store.get().state, json!({"v": 2}));
    }
}
