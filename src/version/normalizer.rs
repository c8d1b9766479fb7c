//! Version normalization across ecosystems
//!
//! Every registry speaks a slightly different version dialect. PyPI uses PEP 440,
//! npm and Hex use SemVer, Go tags are SemVer with a `v` prefix and pseudo-versions.
//! [`Version`] maps all of them onto a single PEP 440 ordering:
//!
//! - a leading `v` is stripped (`v1.2.0` == `1.2.0`)
//! - PEP 440 strings are taken as-is (`1.0.0rc1`, `0.13.dev0`, `4.6.2.post1`)
//! - SemVer strings PEP 440 rejects (`2.0.0-next.3`, `v0.0.0-20191109021931-daa7c04131f5`)
//!   become dev builds of their release triple, and so do numeric SemVer
//!   pre-releases like `1.0.1-0` that PEP 440 would read as post-releases
//!
//! which yields `1.0.0-dev1 < 1.0.0-rc1 < 1.0.0 < 1.0.0+post1`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use pep508_rs::pep440_rs::Version as Pep440Version;

use crate::version::error::VersionError;

/// A parsed, totally-ordered version
///
/// Equality, ordering and hashing use the normalized form only, so the
/// original spelling (`v1.2`, `1.2.0`) does not matter when comparing.
#[derive(Debug, Clone)]
pub struct Version {
    origin: String,
    normalized: Pep440Version,
    prerelease: bool,
}

impl Version {
    /// Parse a raw version string from any supported ecosystem
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        let stripped = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if stripped.is_empty() {
            return Err(VersionError(raw.to_string()));
        }

        let normalized = match Pep440Version::from_str(stripped) {
            // PEP 440 reads `1.0.1-0` as an implicit post-release, SemVer as a pre-release
            Ok(pep440) if pep440.is_post() && has_numeric_semver_pre(stripped) => {
                fold_semver(stripped)
            }
            Ok(pep440) => Some(pep440),
            Err(_) => fold_semver(stripped),
        }
        .ok_or_else(|| VersionError(raw.to_string()))?;
        let prerelease = normalized.is_pre() || normalized.is_dev();

        Ok(Self {
            origin: raw.to_string(),
            normalized,
            prerelease,
        })
    }

    /// The string this version was parsed from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Canonical PEP 440 rendering (`14.05.14` -> `14.5.14`)
    pub fn normalized(&self) -> String {
        self.normalized.to_string()
    }

    /// True for alpha, beta, rc and dev builds
    pub fn is_prerelease(&self) -> bool {
        self.prerelease
    }
}

/// Map a SemVer string onto a PEP 440 dev release of the same triple.
///
/// The dev number is the pseudo-version timestamp when there is one
/// (`0.20180830191138-d8f796af33cc`), else the first purely numeric
/// pre-release identifier, else the leading digit run of the pre-release, else 0.
fn fold_semver(raw: &str) -> Option<Pep440Version> {
    let parsed = semver::Version::parse(raw).ok()?;
    let release = format!("{}.{}.{}", parsed.major, parsed.minor, parsed.patch);
    if parsed.pre.is_empty() {
        return Pep440Version::from_str(&release).ok();
    }

    let pre = parsed.pre.as_str();
    let leading_digits = |s: &str| -> String {
        s.chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect()
    };
    let dev = pre
        .split('.')
        .map(|ident| ident.chars().take_while(char::is_ascii_digit).collect::<String>())
        .find(|digits| digits.len() == GO_PSEUDO_TIMESTAMP_LEN)
        .or_else(|| {
            pre.split('.')
                .find(|ident| !ident.is_empty() && ident.bytes().all(|b| b.is_ascii_digit()))
                .map(str::to_string)
        })
        .or_else(|| Some(leading_digits(pre)))
        .and_then(|digits| digits.parse::<u64>().ok())
        .unwrap_or(0);

    Pep440Version::from_str(&format!("{release}.dev{dev}")).ok()
}

fn has_numeric_semver_pre(raw: &str) -> bool {
    semver::Version::parse(raw).is_ok_and(|parsed| {
        parsed
            .pre
            .as_str()
            .split('.')
            .next()
            .is_some_and(|ident| !ident.is_empty() && ident.bytes().all(|b| b.is_ascii_digit()))
    })
}

/// `yyyymmddhhmmss`
const GO_PSEUDO_TIMESTAMP_LEN: usize = 14;

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.origin)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}
