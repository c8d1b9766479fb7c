//! Release history types shared by registries, cache and delta calculation

use chrono::NaiveDate;

use crate::version::normalizer::Version;

/// A single published release of a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub name: String,
    pub version: Version,
    pub release_date: NaiveDate,
}

impl Release {
    pub fn new(name: impl Into<String>, version: Version, release_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            version,
            release_date,
        }
    }
}

/// Stable releases of one package, ascending by version
///
/// Construction enforces the invariants: pre-releases are dropped, entries are
/// sorted by version and duplicate versions collapse onto the earliest release.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseHistory {
    name: String,
    releases: Vec<Release>,
}

impl ReleaseHistory {
    pub fn new(name: impl Into<String>, releases: Vec<Release>) -> Self {
        let mut releases: Vec<Release> = releases
            .into_iter()
            .filter(|release| !release.version.is_prerelease())
            .collect();

        releases.sort_by(|a, b| {
            a.version
                .cmp(&b.version)
                .then(a.release_date.cmp(&b.release_date))
        });
        releases.dedup_by(|later, earlier| later.version == earlier.version);

        Self {
            name: name.into(),
            releases,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn iter(&self) -> impl Iterator<Item = &Release> {
        self.releases.iter()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    /// Newest stable release
    pub fn latest(&self) -> Option<&Release> {
        self.releases.last()
    }

    /// Index of the release equal to `version`
    pub fn position(&self, version: &Version) -> Option<usize> {
        self.releases
            .binary_search_by(|release| release.version.cmp(version))
            .ok()
    }

    /// The release published right after `version` in version order
    pub fn next_after(&self, version: &Version) -> Option<&Release> {
        self.position(version)
            .and_then(|index| self.releases.get(index + 1))
    }
}
