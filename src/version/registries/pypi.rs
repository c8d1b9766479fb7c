//! PyPI registry client for fetching Python release dates

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::parser::types::RegistryType;
use crate::version::error::RegistryError;
use crate::version::registries::{check_status, http_client, parse_release_date};
use crate::version::registry::{RawRelease, Registry};

const DEFAULT_PYPI_REGISTRY: &str = "https://pypi.org";

/// PyPI registry client
pub struct PypiRegistry {
    client: Client,
    base_url: String,
}

impl Default for PypiRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PYPI_REGISTRY)
    }
}

impl PypiRegistry {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.to_string(),
        }
    }
}

/// PyPI JSON API response structure
#[derive(Debug, Deserialize)]
struct PypiResponse {
    releases: HashMap<String, Vec<PypiFile>>,
}

/// One uploaded distribution file of a release
#[derive(Debug, Deserialize)]
struct PypiFile {
    upload_time: String,
    #[serde(default)]
    yanked: bool,
}

#[async_trait]
impl Registry for PypiRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::PyPI
    }

    async fn fetch_releases(&self, package_name: &str) -> Result<Vec<RawRelease>, RegistryError> {
        let url = format!("{}/pypi/{}/json", self.base_url, package_name);
        debug!("Fetching PyPI package: {}", url);

        let response = check_status(self.client.get(&url).send().await?, package_name)?;

        let pypi_response: PypiResponse = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        let mut releases = Vec::with_capacity(pypi_response.releases.len());
        for (version, files) in pypi_response.releases {
            // The earliest upload dates the release
            let Some(first) = files.iter().min_by(|a, b| a.upload_time.cmp(&b.upload_time))
            else {
                debug!("Skipping {} {}: no files", package_name, version);
                continue;
            };
            if first.yanked {
                debug!("Skipping {} {}: yanked", package_name, version);
                continue;
            }
            let Some(release_date) = parse_release_date(&first.upload_time) else {
                debug!(
                    "Skipping {} {}: bad upload time {}",
                    package_name, version, first.upload_time
                );
                continue;
            };
            releases.push(RawRelease::new(version, release_date));
        }

        debug!(
            "Found {} releases for package {}",
            releases.len(),
            package_name
        );

        Ok(releases)
    }
}
