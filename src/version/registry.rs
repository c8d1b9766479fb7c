//! Registry traits and the shared release-history pipeline
//!
//! Each registry only knows how to list `(version, release date)` pairs for a
//! package ([`Registry`]). [`RegistryHistory`] turns that raw list into a
//! [`ReleaseHistory`]: normalize, drop what does not parse, drop pre-releases,
//! sort and deduplicate.

use std::sync::Arc;

use chrono::NaiveDate;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

use crate::parser::types::RegistryType;
use crate::version::error::RegistryError;
use crate::version::normalizer::Version;
use crate::version::types::{Release, ReleaseHistory};

/// A version string as published, with its release date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRelease {
    pub version: String,
    pub release_date: NaiveDate,
}

impl RawRelease {
    pub fn new(version: impl Into<String>, release_date: NaiveDate) -> Self {
        Self {
            version: version.into(),
            release_date,
        }
    }
}

/// Trait for listing package releases from a registry
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Returns the type of registry this implementation handles
    fn registry_type(&self) -> RegistryType;

    /// Fetches every published release of a package, in any order
    ///
    /// Entries the registry marks as withdrawn (yanked) are already excluded.
    async fn fetch_releases(&self, package_name: &str) -> Result<Vec<RawRelease>, RegistryError>;
}

/// Anything that can produce the release history of a package
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseHistorySource: Send + Sync {
    async fn fetch(&self, package_name: &str) -> Result<ReleaseHistory, RegistryError>;
}

/// Release history read straight from a registry
pub struct RegistryHistory {
    registry: Arc<dyn Registry>,
}

impl RegistryHistory {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self { registry }
    }
}

#[async_trait::async_trait]
impl ReleaseHistorySource for RegistryHistory {
    async fn fetch(&self, package_name: &str) -> Result<ReleaseHistory, RegistryError> {
        let raw = self.registry.fetch_releases(package_name).await?;
        let fetched = raw.len();

        let releases: Vec<Release> = raw
            .into_iter()
            .filter_map(|release| match Version::parse(&release.version) {
                Ok(version) if version.is_prerelease() => None,
                Ok(version) => Some(Release::new(package_name, version, release.release_date)),
                Err(e) => {
                    debug!("Skipping {} release: {}", package_name, e);
                    None
                }
            })
            .collect();

        let history = ReleaseHistory::new(package_name, releases);
        debug!(
            "{}/{}: {} stable releases out of {} published",
            self.registry.registry_type().as_str(),
            package_name,
            history.len(),
            fetched
        );

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::delta::days;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn fetch_normalizes_filters_and_sorts() {
        let mut registry = MockRegistry::new();
        registry.expect_registry_type().return_const(RegistryType::PyPI);
        registry
            .expect_fetch_releases()
            .withf(|name| name == "httpx")
            .times(1)
            .returning(|_| {
                Ok(vec![
                    RawRelease::new("0.26.0", date(2023, 12, 20)),
                    RawRelease::new("0.27.0b1", date(2024, 1, 5)),
                    RawRelease::new("not-a-version", date(2024, 1, 6)),
                    RawRelease::new("0.25.2", date(2023, 11, 24)),
                    RawRelease::new("0.25.2", date(2023, 11, 25)),
                ])
            });

        let history = RegistryHistory::new(Arc::new(registry))
            .fetch("httpx")
            .await
            .unwrap();

        let entries: Vec<(&str, NaiveDate)> = history
            .iter()
            .map(|r| (r.version.origin(), r.release_date))
            .collect();
        assert_eq!(
            entries,
            vec![
                ("0.25.2", date(2023, 11, 24)),
                ("0.26.0", date(2023, 12, 20)),
            ]
        );
        assert_eq!(history.name(), "httpx");
    }

    #[tokio::test]
    async fn fetch_drops_numeric_semver_prereleases() {
        let mut registry = MockRegistry::new();
        registry.expect_registry_type().return_const(RegistryType::Npm);
        registry.expect_fetch_releases().returning(|_| {
            Ok(vec![
                RawRelease::new("1.0.0", date(2024, 1, 1)),
                RawRelease::new("1.0.1-0", date(2024, 2, 1)),
                RawRelease::new("1.0.1", date(2024, 3, 1)),
            ])
        });

        let history = RegistryHistory::new(Arc::new(registry))
            .fetch("left-pad")
            .await
            .unwrap();

        let versions: Vec<&str> = history.iter().map(|r| r.version.origin()).collect();
        assert_eq!(versions, vec!["1.0.0", "1.0.1"]);
        assert_eq!(days(&history, "1.0.1", date(2024, 6, 28)), Ok(0));
        assert_eq!(days(&history, "1.0.0", date(2024, 6, 28)), Ok(119));
    }

    #[tokio::test]
    async fn fetch_propagates_registry_errors() {
        let mut registry = MockRegistry::new();
        registry.expect_registry_type().return_const(RegistryType::Npm);
        registry
            .expect_fetch_releases()
            .returning(|name| Err(RegistryError::NotFound(name.to_string())));

        let result = RegistryHistory::new(Arc::new(registry)).fetch("left-pad").await;

        assert!(matches!(result, Err(RegistryError::NotFound(name)) if name == "left-pad"));
    }
}
