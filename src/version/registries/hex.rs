//! Hex (Elixir/Erlang) registry API implementation

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::parser::types::RegistryType;
use crate::version::error::RegistryError;
use crate::version::registries::{check_status, http_client, parse_release_date};
use crate::version::registry::{RawRelease, Registry};

const DEFAULT_BASE_URL: &str = "https://hex.pm";

#[derive(Debug, Deserialize)]
struct HexPackageResponse {
    #[serde(default)]
    releases: Vec<HexRelease>,
}

#[derive(Debug, Deserialize)]
struct HexRelease {
    version: String,
    inserted_at: String,
}

pub struct HexRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl HexRegistry {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for HexRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl Registry for HexRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::Hex
    }

    async fn fetch_releases(&self, package_name: &str) -> Result<Vec<RawRelease>, RegistryError> {
        let url = format!("{}/api/packages/{}", self.base_url, package_name);
        debug!("Fetching Hex package: {}", url);

        let response = check_status(self.client.get(&url).send().await?, package_name)?;

        let package: HexPackageResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse Hex response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        let releases = package
            .releases
            .into_iter()
            .filter_map(|release| {
                parse_release_date(&release.inserted_at)
                    .map(|date| RawRelease::new(release.version, date))
            })
            .collect();

        Ok(releases)
    }
}
