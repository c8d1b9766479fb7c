//! Go proxy registry API implementation
//!
//! The module proxy has no single document with every release date: the tag
//! list comes from `@v/list`, and each tag's date from its own `@v/<tag>.info`.

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::parser::types::RegistryType;
use crate::version::error::RegistryError;
use crate::version::normalizer::Version;
use crate::version::registries::{check_status, http_client, parse_release_date};
use crate::version::registry::{RawRelease, Registry};

/// Default base URL for Go proxy
const DEFAULT_BASE_URL: &str = "https://proxy.golang.org";

/// Response of `@v/<version>.info`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct VersionInfo {
    version: String,
    time: String,
}

/// Registry implementation for Go proxy API
pub struct GoProxyRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl GoProxyRegistry {
    /// Creates a new GoProxyRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.to_string(),
        }
    }

    async fn fetch_tags(
        &self,
        encoded_module: &str,
        module: &str,
    ) -> Result<Vec<String>, RegistryError> {
        let url = format!("{}/{}/@v/list", self.base_url, encoded_module);
        debug!("Fetching Go module versions: {}", url);

        let response = check_status(self.client.get(&url).send().await?, module)?;

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read Go proxy response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        // Go proxy returns versions one per line
        Ok(body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Date of one tag; `None` when the proxy has no info for it
    async fn fetch_info(
        &self,
        encoded_module: &str,
        tag: &str,
    ) -> Result<Option<RawRelease>, RegistryError> {
        let url = format!("{}/{}/@v/{}.info", self.base_url, encoded_module, tag);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status {} for {}",
                status, url
            )));
        }

        let info: VersionInfo = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(e.to_string()))?;

        Ok(parse_release_date(&info.time).map(|date| RawRelease::new(info.version, date)))
    }
}

impl Default for GoProxyRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl Registry for GoProxyRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::GoProxy
    }

    async fn fetch_releases(&self, package_name: &str) -> Result<Vec<RawRelease>, RegistryError> {
        // Go proxy expects module path to be URL-encoded, with uppercase letters
        // escaped as !{lowercase}. For example: github.com/Azure -> github.com/!azure
        let encoded_module = encode_module_path(package_name);
        let tags: Vec<String> = self
            .fetch_tags(&encoded_module, package_name)
            .await?
            .into_iter()
            .filter(|tag| match Version::parse(tag) {
                Ok(version) => !version.is_prerelease(),
                Err(_) => {
                    debug!("Skipping {}@{}: not a version", package_name, tag);
                    false
                }
            })
            .collect();

        let infos = join_all(tags.iter().map(|tag| self.fetch_info(&encoded_module, tag))).await;

        let mut releases = Vec::with_capacity(tags.len());
        for (tag, info) in tags.iter().zip(infos) {
            match info {
                Ok(Some(release)) => releases.push(release),
                Ok(None) => debug!("No info for {}@{}", package_name, tag),
                Err(e) => warn!("Dropping {}@{}: {}", package_name, tag, e),
            }
        }

        Ok(releases)
    }
}

/// Encodes a Go module path for use in proxy URLs.
/// Uppercase letters are escaped as !{lowercase}.
fn encode_module_path(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    for c in path.chars() {
        if c.is_ascii_uppercase() {
            result.push('!');
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
