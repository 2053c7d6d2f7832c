//! Active mock set for the running test.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::mock::{EndpointMock, MockBundle, MockDeclarationError};

/// Holds the endpoint mocks active for the current test.
///
/// `register` replaces the whole set — never appends across tests — so no
/// stale declaration from a previous test can leak into the next one. The
/// set is handed out as an immutable `Arc` snapshot: in-flight matches keep
/// the snapshot they started with, and a replacement between tests never
/// races the traffic it configures.
#[derive(Debug, Default)]
pub struct MockRegistry {
    active: RwLock<Arc<Vec<Arc<EndpointMock>>>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active set with the bundle's mocks, in registration
    /// order.
    pub fn register(&self, bundle: MockBundle) -> Result<(), MockDeclarationError> {
        let ordered: Vec<Arc<EndpointMock>> =
            bundle.into_ordered()?.into_iter().map(Arc::new).collect();
        tracing::debug!(mocks = ordered.len(), "mock set replaced");
        *self.active.write() = Arc::new(ordered);
        Ok(())
    }

    /// Drop every active mock (teardown).
    pub fn clear(&self) {
        *self.active.write() = Arc::new(Vec::new());
    }

    /// Immutable snapshot of the active set.
    pub fn active(&self) -> Arc<Vec<Arc<EndpointMock>>> {
        Arc::clone(&self.active.read())
    }

    pub fn len(&self) -> usize {
        self.active.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::EndpointMock;
    use serde_json::json;

    #[test]
    fn register_replaces_rather_than_appends() {
        let registry = MockRegistry::new();
        registry
            .register(MockBundle {
                get: vec![EndpointMock::get("/a"), EndpointMock::get("/b")],
                ..MockBundle::default()
            })
            .unwrap();
        assert_eq!(registry.len(), 2);

        registry
            .register(MockBundle {
                get: vec![EndpointMock::get("/c")],
                ..MockBundle::default()
            })
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active()[0].url(), "/c");
    }

    #[test]
    fn snapshot_survives_replacement() {
        let registry = MockRegistry::new();
        registry
            .register(MockBundle {
                get: vec![EndpointMock::get("/old").with_response(json!({"v": 1}))],
                ..MockBundle::default()
            })
            .unwrap();

        let snapshot = registry.active();
        registry.clear();

        // The snapshot taken before the clear is unaffected.
        assert_eq!(snapshot.len(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn invalid_bundle_leaves_active_set_untouched() {
        let registry = MockRegistry::new();
        registry
            .register(MockBundle {
                get: vec![EndpointMock::get("/keep")],
                ..MockBundle::default()
            })
            .unwrap();

        let bad = MockBundle {
            get: vec![EndpointMock::post("/misfiled")],
            ..MockBundle::default()
        };
        assert!(registry.register(bad).is_err());
        assert_eq!(registry.active()[0].url(), "/keep");
    }
}
