//! Staleness delta between an installed version and its release history
//!
//! [`DaysDelta`] computes the raw number of days since the first release that
//! superseded the installed version. Policies are added by wrapping:
//!
//! - [`OvertakingSafe`] turns "installed is ahead of the registry" into 0
//! - [`DecrDelta`] re-projects a delta computed today onto an earlier date

use chrono::NaiveDate;
use tracing::debug;

use crate::version::clock::Clock;
use crate::version::error::DeltaError;
use crate::version::normalizer::Version;
use crate::version::types::ReleaseHistory;

/// Something that can report a staleness delta in days
pub trait VersionDelta {
    fn days(&self) -> Result<i64, DeltaError>;
}

impl<T: VersionDelta + ?Sized> VersionDelta for &T {
    fn days(&self) -> Result<i64, DeltaError> {
        (**self).days()
    }
}

impl<T: VersionDelta + ?Sized> VersionDelta for Box<T> {
    fn days(&self) -> Result<i64, DeltaError> {
        (**self).days()
    }
}

/// Days between `reference_date` and the release that followed `installed`
///
/// Returns 0 for installed pre-releases, empty histories and the latest
/// release. Fails when `installed` does not parse, is newer than every known
/// release, or is missing from the history.
pub fn days(
    history: &ReleaseHistory,
    installed: &str,
    reference_date: NaiveDate,
) -> Result<i64, DeltaError> {
    let target = Version::parse(installed)?;
    if target.is_prerelease() {
        debug!("{} {} is a pre-release, delta is 0", history.name(), installed);
        return Ok(0);
    }

    let Some(latest) = history.latest() else {
        return Ok(0);
    };

    if target > latest.version {
        return Err(DeltaError::TargetGreaterThanLatest {
            package: history.name().to_string(),
            version: installed.to_string(),
            latest: latest.version.origin().to_string(),
        });
    }

    if target == latest.version {
        return Ok(0);
    }

    let next = history
        .next_after(&target)
        .ok_or_else(|| DeltaError::VersionNotFound {
            package: history.name().to_string(),
            version: installed.to_string(),
        })?;

    Ok((reference_date - next.release_date).num_days())
}

/// Delta of `installed` against `history` as of `reference_date`
pub struct DaysDelta<'a> {
    history: &'a ReleaseHistory,
    installed: &'a str,
    reference_date: NaiveDate,
}

impl<'a> DaysDelta<'a> {
    pub fn new(history: &'a ReleaseHistory, installed: &'a str, reference_date: NaiveDate) -> Self {
        Self {
            history,
            installed,
            reference_date,
        }
    }
}

impl VersionDelta for DaysDelta<'_> {
    fn days(&self) -> Result<i64, DeltaError> {
        days(self.history, self.installed, self.reference_date)
    }
}

/// Reports 0 instead of failing when the installed version is ahead of the
/// registry, e.g. for locally built artifacts or a lagging index.
pub struct OvertakingSafe<D> {
    origin: D,
}

impl<D: VersionDelta> OvertakingSafe<D> {
    pub fn new(origin: D) -> Self {
        Self { origin }
    }
}

impl<D: VersionDelta> VersionDelta for OvertakingSafe<D> {
    fn days(&self) -> Result<i64, DeltaError> {
        match self.origin.days() {
            Err(DeltaError::TargetGreaterThanLatest {
                package,
                version,
                latest,
            }) => {
                debug!(
                    "{} {} is ahead of latest release {}, delta is 0",
                    package, version, latest
                );
                Ok(0)
            }
            other => other,
        }
    }
}

/// Delta as it would have been reported on `for_date`
///
/// This is an approximation: the delta computed today is shortened by the
/// days elapsed since `for_date` and floored at 0. It assumes the package's
/// position in its release history has not changed since then and does not
/// look at historical registry data.
pub struct DecrDelta<D, C> {
    origin: D,
    for_date: NaiveDate,
    clock: C,
}

impl<D: VersionDelta, C: Clock> DecrDelta<D, C> {
    pub fn new(origin: D, for_date: NaiveDate, clock: C) -> Self {
        Self {
            origin,
            for_date,
            clock,
        }
    }
}

impl<D: VersionDelta, C: Clock> VersionDelta for DecrDelta<D, C> {
    fn days(&self) -> Result<i64, DeltaError> {
        let delta = self.origin.days()?;
        Ok(decrement(delta, self.for_date, self.clock.today()))
    }
}

/// `max(0, delta - (today - for_date))`
pub fn decrement(delta: i64, for_date: NaiveDate, today: NaiveDate) -> i64 {
    (delta - (today - for_date).num_days()).max(0)
}
