use thiserror::Error;

/// Raised when a version string maps to no known version grammar
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid version: {0}")]
pub struct VersionError(pub String);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt cache entry: {0}")]
    Corrupt(String),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Package not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeltaError {
    #[error(transparent)]
    InvalidVersion(#[from] VersionError),

    /// The installed version is missing from a successfully fetched history
    #[error("Version {version} of {package} not found in release history")]
    VersionNotFound { package: String, version: String },

    /// The installed version is newer than anything the registry reports
    #[error("Version {version} of {package} is newer than latest release {latest}")]
    TargetGreaterThanLatest {
        package: String,
        version: String,
        latest: String,
    },
}
