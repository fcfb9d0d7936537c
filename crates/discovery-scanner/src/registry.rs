use crate::scanner::ServiceScanner;
use indexmap::IndexMap;
use std::sync::Arc;

/// An insertion-ordered collection of registered scanners.
///
/// Order matters: the orchestrator iterates a registry's scanners in
/// registration order when it has no more specific service filter, so results
/// and progress updates are deterministic across runs.
#[derive(Debug, Default, Clone)]
pub struct ScannerRegistry {
    scanners: IndexMap<String, Arc<dyn ServiceScanner>>,
}

impl ScannerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            scanners: IndexMap::new(),
        }
    }

    /// Register a scanner under its own `service_name()`. Registering a second
    /// scanner under the same name replaces the first, preserving the original
    /// registration position.
    pub fn register(&mut self, scanner: Arc<dyn ServiceScanner>) {
        let name = scanner.service_name().to_string();
        self.scanners.insert(name, scanner);
    }

    /// Look up a scanner by service name.
    pub fn get(&self, service_name: &str) -> Option<Arc<dyn ServiceScanner>> {
        self.scanners.get(service_name).cloned()
    }

    /// Whether a scanner is registered under `service_name`.
    pub fn has(&self, service_name: &str) -> bool {
        self.scanners.contains_key(service_name)
    }

    /// All registered scanners, in registration order.
    pub fn get_all(&self) -> Vec<Arc<dyn ServiceScanner>> {
        self.scanners.values().cloned().collect()
    }

    /// All registered service names, in registration order.
    pub fn get_service_names(&self) -> Vec<String> {
        self.scanners.keys().cloned().collect()
    }

    /// Number of registered scanners.
    pub fn len(&self) -> usize {
        self.scanners.len()
    }

    /// Whether the registry has no scanners registered.
    pub fn is_empty(&self) -> bool {
        self.scanners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScannerContext;
    use crate::scanner::ScanOutcome;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Stub(&'static str, bool);

    #[async_trait]
    impl ServiceScanner for Stub {
        fn service_name(&self) -> &str {
            self.0
        }

        fn is_global(&self) -> bool {
            self.1
        }

        async fn scan(&self, _ctx: &ScannerContext) -> ScanOutcome {
            (Vec::new(), Vec::new())
        }

        fn resource_types(&self) -> Vec<String> {
            Vec::new()
        }
    }

    #[test]
    fn preserves_registration_order() {
        let mut registry = ScannerRegistry::new();
        registry.register(Arc::new(Stub("b", false)));
        registry.register(Arc::new(Stub("a", false)));
        assert_eq!(registry.get_service_names(), vec!["b", "a"]);
    }

    #[test]
    fn re_registering_replaces_value_but_not_position() {
        let mut registry = ScannerRegistry::new();
        registry.register(Arc::new(Stub("a", false)));
        registry.register(Arc::new(Stub("b", false)));
        registry.register(Arc::new(Stub("a", true)));
        assert_eq!(registry.get_service_names(), vec!["a", "b"]);
        assert!(registry.get("a").unwrap().is_global());
    }

    #[test]
    fn has_and_get_reflect_registrations() {
        let mut registry = ScannerRegistry::new();
        assert!(!registry.has("a"));
        registry.register(Arc::new(Stub("a", false)));
        assert!(registry.has("a"));
        assert!(registry.get("missing").is_none());
    }
}
