//! Registry test utilities

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;

use deltaver::parser::types::RegistryType;
use deltaver::version::error::RegistryError;
use deltaver::version::registry::{RawRelease, Registry};

/// In-memory registry that counts the lookups it serves
pub struct FakeRegistry {
    registry_type: RegistryType,
    releases: HashMap<String, Vec<RawRelease>>,
    calls: Arc<AtomicUsize>,
}

impl FakeRegistry {
    pub fn new(registry_type: RegistryType) -> Self {
        Self {
            registry_type,
            releases: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_releases(mut self, package: &str, releases: &[(&str, NaiveDate)]) -> Self {
        self.releases.insert(
            package.to_string(),
            releases
                .iter()
                .map(|(version, released)| RawRelease::new(*version, *released))
                .collect(),
        );
        self
    }

    /// Handle on the lookup counter, usable after the registry is moved
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Registry for FakeRegistry {
    fn registry_type(&self) -> RegistryType {
        self.registry_type
    }

    async fn fetch_releases(&self, package_name: &str) -> Result<Vec<RawRelease>, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.releases
            .get(package_name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(package_name.to_string()))
    }
}
