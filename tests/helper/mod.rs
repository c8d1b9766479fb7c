//! Shared test utilities

#![allow(dead_code)]

mod registry;

pub use registry::FakeRegistry;

use chrono::NaiveDate;
use deltaver::version::normalizer::Version;
use deltaver::version::types::{Release, ReleaseHistory};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// History built from `(version, date)` pairs in any order
pub fn history(name: &str, releases: &[(&str, NaiveDate)]) -> ReleaseHistory {
    ReleaseHistory::new(
        name,
        releases
            .iter()
            .map(|(version, released)| Release::new(name, Version::parse(version).unwrap(), *released))
            .collect(),
    )
}

pub fn httpx_releases() -> Vec<(&'static str, NaiveDate)> {
    vec![("0.25.2", date(2023, 11, 24)), ("0.26.0", date(2023, 12, 20))]
}
