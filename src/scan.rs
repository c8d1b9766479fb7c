//! Scan a list of requirements against their release histories

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::parser::types::Requirement;
use crate::version::clock::Clock;
use crate::version::delta::{DaysDelta, DecrDelta, OvertakingSafe, VersionDelta};
use crate::version::error::DeltaError;
use crate::version::normalizer::Version;
use crate::version::registry::ReleaseHistorySource;

/// Delta policy for a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Report 0 instead of failing for versions newer than the registry's latest
    pub overtaking_safe: bool,
    /// Project every delta back onto this date
    pub for_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Delta(i64),
    /// Release history could not be fetched, or the delta could not be computed
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDelta {
    pub name: String,
    pub version: String,
    pub outcome: Outcome,
}

impl PackageDelta {
    pub fn delta(&self) -> Option<i64> {
        match self.outcome {
            Outcome::Delta(days) => Some(days),
            Outcome::Failed(_) => None,
        }
    }
}

/// Per-package results in requirement order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    packages: Vec<PackageDelta>,
}

impl ScanReport {
    pub fn new(packages: Vec<PackageDelta>) -> Self {
        Self { packages }
    }

    pub fn packages(&self) -> &[PackageDelta] {
        &self.packages
    }

    fn deltas(&self) -> impl Iterator<Item = i64> + '_ {
        self.packages.iter().filter_map(PackageDelta::delta)
    }

    pub fn failed(&self) -> impl Iterator<Item = &PackageDelta> {
        self.packages.iter().filter(|p| p.delta().is_none())
    }

    pub fn sum(&self) -> i64 {
        self.deltas().sum()
    }

    /// Largest delta, 0 when nothing was measured
    pub fn max(&self) -> i64 {
        self.deltas().max().unwrap_or(0)
    }

    /// Mean delta over measured packages, 0 when nothing was measured
    pub fn average(&self) -> f64 {
        let count = self.deltas().count();
        if count == 0 {
            return 0.0;
        }
        self.sum() as f64 / count as f64
    }

    /// Measured packages, largest delta first; ties keep requirement order
    pub fn sorted_by_delta(&self) -> Vec<&PackageDelta> {
        let mut measured: Vec<&PackageDelta> =
            self.packages.iter().filter(|p| p.delta().is_some()).collect();
        measured.sort_by_key(|p| std::cmp::Reverse(p.delta().unwrap_or_default()));
        measured
    }
}

/// Compute the delta of every requirement, one package at a time.
///
/// A package whose history cannot be fetched, or whose delta cannot be
/// computed, is reported as failed; the scan moves on.
pub async fn scan<S, C>(
    requirements: &[Requirement],
    source: &S,
    clock: &C,
    options: &ScanOptions,
) -> ScanReport
where
    S: ReleaseHistorySource + ?Sized,
    C: Clock + ?Sized,
{
    let today = clock.today();
    let mut packages = Vec::with_capacity(requirements.len());

    for requirement in requirements {
        let outcome = scan_one(requirement, source, clock, today, options).await;
        packages.push(PackageDelta {
            name: requirement.name.clone(),
            version: requirement.version.clone(),
            outcome,
        });
    }

    let report = ScanReport::new(packages);
    info!(
        "Scanned {} packages, {} failed",
        report.packages().len(),
        report.failed().count()
    );
    report
}

async fn scan_one<S, C>(
    requirement: &Requirement,
    source: &S,
    clock: &C,
    today: NaiveDate,
    options: &ScanOptions,
) -> Outcome
where
    S: ReleaseHistorySource + ?Sized,
    C: Clock + ?Sized,
{
    let name = requirement.name.as_str();

    // No registry round trip for versions that always measure 0
    match Version::parse(&requirement.version) {
        Ok(version) if version.is_prerelease() => {
            debug!("{} {} is a pre-release, skipping", name, requirement.version);
            return Outcome::Delta(0);
        }
        Ok(_) => {}
        Err(e) => {
            warn!("{}: {}, counting as 0", name, e);
            return Outcome::Delta(0);
        }
    }

    let history = match source.fetch(name).await {
        Ok(history) => history,
        Err(e) => {
            warn!("Failed to fetch release history of {}: {}", name, e);
            return Outcome::Failed(e.to_string());
        }
    };

    let mut delta: Box<dyn VersionDelta + '_> =
        Box::new(DaysDelta::new(&history, &requirement.version, today));
    if options.overtaking_safe {
        delta = Box::new(OvertakingSafe::new(delta));
    }
    if let Some(for_date) = options.for_date {
        delta = Box::new(DecrDelta::new(delta, for_date, clock));
    }

    match delta.days() {
        Ok(days) => {
            debug!("{} {}: {} days", name, requirement.version, days);
            Outcome::Delta(days.max(0))
        }
        Err(DeltaError::InvalidVersion(e)) => {
            warn!("{}: {}, counting as 0", name, e);
            Outcome::Delta(0)
        }
        Err(e) => {
            warn!("{}", e);
            Outcome::Failed(e.to_string())
        }
    }
}
