//! npm registry API implementation

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::parser::types::RegistryType;
use crate::version::error::RegistryError;
use crate::version::registries::{check_status, http_client, parse_release_date};
use crate::version::registry::{RawRelease, Registry};

/// Default base URL for npm registry
const DEFAULT_BASE_URL: &str = "https://registry.npmjs.org";

/// Keys of the `time` map that are not versions
const TIME_METADATA_KEYS: [&str; 3] = ["created", "modified", "unpublished"];

/// Response from npm registry API
#[derive(Debug, Deserialize)]
struct NpmPackageResponse {
    /// Publish timestamp of every version, plus a few metadata keys
    #[serde(default)]
    time: IndexMap<String, serde_json::Value>,
}

/// Registry implementation for npm registry API
pub struct NpmRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NpmRegistry {
    /// Creates a new NpmRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.to_string(),
        }
    }

    /// Encode package name for URL (handles scoped packages)
    fn encode_package_name(package_name: &str) -> String {
        if package_name.starts_with('@') {
            // Scoped package: @scope/name -> @scope%2Fname
            package_name.replace('/', "%2F")
        } else {
            package_name.to_string()
        }
    }
}

impl Default for NpmRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl Registry for NpmRegistry {
    fn registry_type(&self) -> RegistryType {
        RegistryType::Npm
    }

    async fn fetch_releases(&self, package_name: &str) -> Result<Vec<RawRelease>, RegistryError> {
        let encoded_name = Self::encode_package_name(package_name);
        let url = format!("{}/{}", self.base_url, encoded_name);
        debug!("Fetching npm package: {}", url);

        let response = check_status(self.client.get(&url).send().await?, package_name)?;

        let package_info: NpmPackageResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse npm registry response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        let releases = package_info
            .time
            .into_iter()
            .filter(|(key, _)| !TIME_METADATA_KEYS.contains(&key.as_str()))
            .filter_map(|(version, published)| {
                let date = published.as_str().and_then(parse_release_date);
                if date.is_none() {
                    debug!("Skipping {} {}: bad publish time", package_name, version);
                }
                date.map(|date| RawRelease::new(version, date))
            })
            .collect();

        Ok(releases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use mockito::Server;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn fetch_releases_reads_time_map_without_metadata_keys() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lodash")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "name": "lodash",
                    "versions": {"4.17.20": {}, "4.17.21": {}},
                    "time": {
                        "created": "2012-04-23T16:37:11.912Z",
                        "modified": "2023-06-12T10:00:00.000Z",
                        "4.17.20": "2020-08-13T16:53:54.152Z",
                        "4.17.21": "2021-02-20T15:42:16.891Z"
                    }
                }"#,
            )
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_releases("lodash").await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            result,
            vec![
                RawRelease::new("4.17.20", date(2020, 8, 13)),
                RawRelease::new("4.17.21", date(2021, 2, 20)),
            ]
        );
    }

    #[tokio::test]
    async fn fetch_releases_ignores_unpublished_marker() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/gone-soon")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "time": {
                        "1.0.0": "2019-01-01T00:00:00.000Z",
                        "unpublished": {"time": "2020-01-01T00:00:00.000Z", "versions": ["1.0.0"]}
                    }
                }"#,
            )
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_releases("gone-soon").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec![RawRelease::new("1.0.0", date(2019, 1, 1))]);
    }

    #[tokio::test]
    async fn fetch_releases_handles_scoped_package() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/@types%2Fnode")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"time": {"20.0.0": "2023-04-18T20:04:21.004Z"}}"#)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_releases("@types/node").await.unwrap();

        mock.assert_async().await;
        assert_eq!(result, vec![RawRelease::new("20.0.0", date(2023, 4, 18))]);
    }

    #[tokio::test]
    async fn fetch_releases_returns_not_found_for_nonexistent_package() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/nonexistent-package")
            .with_status(404)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_releases("nonexistent-package").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::NotFound(_))));
    }

    #[tokio::test]
    async fn fetch_releases_returns_invalid_response_on_server_error() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lodash")
            .with_status(503)
            .create_async()
            .await;

        let registry = NpmRegistry::new(&server.url());
        let result = registry.fetch_releases("lodash").await;

        mock.assert_async().await;
        assert!(matches!(result, Err(RegistryError::InvalidResponse(_))));
    }

    #[test]
    fn encode_package_name_escapes_scope_separator() {
        assert_eq!(NpmRegistry::encode_package_name("@babel/core"), "@babel%2Fcore");
        assert_eq!(NpmRegistry::encode_package_name("react"), "react");
    }
}
