//! Common types for parsers

use std::path::Path;

use serde::Deserialize;

/// Type of package registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryType {
    /// Python Package Index
    PyPI,
    /// npm registry
    Npm,
    /// Go module proxy
    GoProxy,
    /// Hex (Elixir/Erlang)
    Hex,
}

impl RegistryType {
    /// Returns the string representation of the registry type
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryType::PyPI => "pypi",
            RegistryType::Npm => "npm",
            RegistryType::GoProxy => "go_proxy",
            RegistryType::Hex => "hex",
        }
    }
}

/// Layout of a dependency manifest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ManifestFormat {
    /// `pip freeze` output / pinned requirements.txt
    PipFreeze,
    /// poetry.lock
    PoetryLock,
    /// package-lock.json
    NpmLock,
    /// go.sum
    Golang,
    /// mix.lock
    MixLock,
}

impl ManifestFormat {
    /// Registry that publishes the packages listed in this format
    pub fn registry_type(&self) -> RegistryType {
        match self {
            ManifestFormat::PipFreeze | ManifestFormat::PoetryLock => RegistryType::PyPI,
            ManifestFormat::NpmLock => RegistryType::Npm,
            ManifestFormat::Golang => RegistryType::GoProxy,
            ManifestFormat::MixLock => RegistryType::Hex,
        }
    }
}

/// Guess the manifest format from a file name
pub fn detect_format(path: &Path) -> Option<ManifestFormat> {
    let file_name = path.file_name()?.to_str()?;
    match file_name {
        "poetry.lock" => Some(ManifestFormat::PoetryLock),
        "package-lock.json" | "npm-shrinkwrap.json" => Some(ManifestFormat::NpmLock),
        "go.sum" => Some(ManifestFormat::Golang),
        "mix.lock" => Some(ManifestFormat::MixLock),
        name if name.starts_with("requirements") && name.ends_with(".txt") => {
            Some(ManifestFormat::PipFreeze)
        }
        _ => None,
    }
}

/// A pinned dependency found in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    /// Package name as the registry knows it (e.g., "httpx", "@types/node")
    pub name: String,
    /// Installed version, as written in the manifest
    pub version: String,
}

impl Requirement {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("requirements.txt", Some(ManifestFormat::PipFreeze))]
    #[case("/srv/app/requirements-dev.txt", Some(ManifestFormat::PipFreeze))]
    #[case("poetry.lock", Some(ManifestFormat::PoetryLock))]
    #[case("/project/package-lock.json", Some(ManifestFormat::NpmLock))]
    #[case("npm-shrinkwrap.json", Some(ManifestFormat::NpmLock))]
    #[case("/project/go.sum", Some(ManifestFormat::Golang))]
    #[case("mix.lock", Some(ManifestFormat::MixLock))]
    #[case("go.mod", None)]
    #[case("package.json", None)]
    #[case("random.txt", None)]
    fn detect_format_returns_expected(
        #[case] path: &str,
        #[case] expected: Option<ManifestFormat>,
    ) {
        assert_eq!(detect_format(Path::new(path)), expected);
    }

    #[rstest]
    #[case(ManifestFormat::PipFreeze, RegistryType::PyPI)]
    #[case(ManifestFormat::PoetryLock, RegistryType::PyPI)]
    #[case(ManifestFormat::NpmLock, RegistryType::Npm)]
    #[case(ManifestFormat::Golang, RegistryType::GoProxy)]
    #[case(ManifestFormat::MixLock, RegistryType::Hex)]
    fn manifest_format_maps_to_registry(
        #[case] format: ManifestFormat,
        #[case] expected: RegistryType,
    ) {
        assert_eq!(format.registry_type(), expected);
    }
}
