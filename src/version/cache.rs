//! Day-partitioned on-disk cache of release histories
//!
//! Layout: `<cache_root>/<package_name>/<YYYY-MM-DD>.json`, each file a JSON
//! array of single-key objects mapping a version to its release timestamp:
//!
//! ```json
//! [{"0.25.2": "2023-11-24T00:00:00"}, {"0.26.0": "2023-12-20T00:00:00"}]
//! ```
//!
//! A package has at most one file, stamped with the clock's current date.
//! Anything unreadable is treated as a miss and refetched.

use std::path::{Component, Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::{CACHE_DATE_FORMAT, CACHE_TIMESTAMP_FORMAT};
use crate::version::clock::Clock;
use crate::version::error::{CacheError, RegistryError};
use crate::version::normalizer::Version;
use crate::version::registry::ReleaseHistorySource;
use crate::version::types::{Release, ReleaseHistory};

type CacheEntry = IndexMap<String, String>;

pub struct CachedHistory<S, C> {
    origin: S,
    cache_root: PathBuf,
    clock: C,
}

impl<S: ReleaseHistorySource, C: Clock> CachedHistory<S, C> {
    pub fn new(origin: S, cache_root: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            origin,
            cache_root: cache_root.into(),
            clock,
        }
    }

    /// Directory holding the cache files of one package
    ///
    /// Slash-separated names (`@types/node`, `golang.org/x/text`) nest; `.`
    /// and `..` segments are neutralized so a name cannot escape the root.
    pub fn package_dir(&self, package_name: &str) -> PathBuf {
        let mut dir = self.cache_root.clone();
        for segment in package_name.split('/') {
            match Path::new(segment).components().next() {
                Some(Component::Normal(_)) => dir.push(segment),
                _ => dir.push("_"),
            }
        }
        dir
    }

    /// Path of the cache file for `package_name` on `date`
    pub fn cache_path(&self, package_name: &str, date: NaiveDate) -> PathBuf {
        self.package_dir(package_name)
            .join(format!("{}.json", date.format(CACHE_DATE_FORMAT)))
    }

    /// Remove every cache file of the package not stamped `today`
    fn evict_stale(&self, dir: &Path, today: NaiveDate) {
        let keep = format!("{}.json", today.format(CACHE_DATE_FORMAT));
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let is_cache_file = path.is_file()
                && path.extension().is_some_and(|ext| ext == "json")
                && entry.file_name().to_str() != Some(keep.as_str());
            if !is_cache_file {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Evicted stale cache file {:?}", path),
                Err(e) => warn!("Failed to evict stale cache file {:?}: {}", path, e),
            }
        }
    }

    fn load(&self, path: &Path, package_name: &str) -> Result<ReleaseHistory, CacheError> {
        let content = std::fs::read_to_string(path)?;
        let entries: Vec<CacheEntry> = serde_json::from_str(&content)?;

        let releases = entries
            .into_iter()
            .map(|entry| {
                let mut pairs = entry.into_iter();
                let (Some((version, stamp)), None) = (pairs.next(), pairs.next()) else {
                    return Err(CacheError::Corrupt(
                        "expected exactly one version per entry".to_string(),
                    ));
                };
                let version =
                    Version::parse(&version).map_err(|e| CacheError::Corrupt(e.to_string()))?;
                let released_at = NaiveDateTime::parse_from_str(&stamp, CACHE_TIMESTAMP_FORMAT)
                    .map_err(|e| CacheError::Corrupt(format!("{stamp}: {e}")))?;
                Ok(Release::new(package_name, version, released_at.date()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReleaseHistory::new(package_name, releases))
    }

    fn store(&self, path: &Path, history: &ReleaseHistory) -> Result<(), CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let entries: Vec<CacheEntry> = history
            .iter()
            .map(|release| {
                let stamp = release
                    .release_date
                    .and_time(NaiveTime::default())
                    .format(CACHE_TIMESTAMP_FORMAT)
                    .to_string();
                CacheEntry::from([(release.version.origin().to_string(), stamp)])
            })
            .collect();

        std::fs::write(path, serde_json::to_string(&entries)?)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: ReleaseHistorySource, C: Clock> ReleaseHistorySource for CachedHistory<S, C> {
    async fn fetch(&self, package_name: &str) -> Result<ReleaseHistory, RegistryError> {
        let today = self.clock.today();
        let dir = self.package_dir(package_name);
        let path = self.cache_path(package_name, today);

        self.evict_stale(&dir, today);

        if path.exists() {
            match self.load(&path, package_name) {
                Ok(history) => {
                    debug!("Cache hit for {} ({:?})", package_name, path);
                    return Ok(history);
                }
                Err(e) => warn!("Ignoring unreadable cache file {:?}: {}", path, e),
            }
        }

        let history = self.origin.fetch(package_name).await?;

        match self.store(&path, &history) {
            Ok(()) => info!(
                "Cached {} releases of {} at {:?}",
                history.len(),
                package_name,
                path
            ),
            Err(e) => warn!("Failed to write cache file {:?}: {}", path, e),
        }

        Ok(history)
    }
}
