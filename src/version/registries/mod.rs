//! Registry implementations for fetching package release dates

pub mod go_proxy;
pub mod hex;
pub mod npm;
pub mod pypi;

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

pub use go_proxy::GoProxyRegistry;
pub use hex::HexRegistry;
pub use npm::NpmRegistry;
pub use pypi::PypiRegistry;

use crate::parser::types::RegistryType;
use crate::version::error::RegistryError;
use crate::version::registry::Registry;

const USER_AGENT: &str = concat!("deltaver/", env!("CARGO_PKG_VERSION"));

/// Default registry client for a registry type
pub fn registry_for(registry_type: RegistryType) -> Arc<dyn Registry> {
    match registry_type {
        RegistryType::PyPI => Arc::new(PypiRegistry::default()),
        RegistryType::Npm => Arc::new(NpmRegistry::default()),
        RegistryType::GoProxy => Arc::new(GoProxyRegistry::default()),
        RegistryType::Hex => Arc::new(HexRegistry::default()),
    }
}

fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to create HTTP client")
}

/// Map non-success statuses of a package lookup onto registry errors
fn check_status(
    response: reqwest::Response,
    package_name: &str,
) -> Result<reqwest::Response, RegistryError> {
    let status = response.status();

    // Go proxy answers 410 for modules it refuses to serve
    if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::GONE {
        return Err(RegistryError::NotFound(package_name.to_string()));
    }

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(RegistryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        warn!("Registry returned status {}: {}", status, response.url());
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(response)
}

/// UTC calendar date of a registry timestamp
///
/// Accepts RFC 3339 (`2023-12-20T10:11:12.345Z`, `2023-12-20T10:11:12+03:00`)
/// and naive timestamps taken as UTC (`2023-12-20T10:11:12`, with or without
/// fractional seconds).
fn parse_release_date(timestamp: &str) -> Option<NaiveDate> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Some(parsed.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|parsed| parsed.date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("2023-12-20T10:11:12", Some(date(2023, 12, 20)))]
    #[case("2023-12-20T10:11:12.123456", Some(date(2023, 12, 20)))]
    #[case("2011-08-24T01:15:04.541Z", Some(date(2011, 8, 24)))]
    #[case("2014-04-23T18:58:54.000000Z", Some(date(2014, 4, 23)))]
    #[case("2023-12-20T01:00:00+03:00", Some(date(2023, 12, 19)))]
    #[case("2019-11-09T02:19:31Z", Some(date(2019, 11, 9)))]
    #[case("yesterday", None)]
    #[case("", None)]
    fn parse_release_date_returns_utc_date(
        #[case] timestamp: &str,
        #[case] expected: Option<NaiveDate>,
    ) {
        assert_eq!(parse_release_date(timestamp), expected);
    }

    #[rstest]
    #[case(RegistryType::PyPI)]
    #[case(RegistryType::Npm)]
    #[case(RegistryType::GoProxy)]
    #[case(RegistryType::Hex)]
    fn registry_for_returns_matching_registry(#[case] registry_type: RegistryType) {
        assert_eq!(registry_for(registry_type).registry_type(), registry_type);
    }
}
