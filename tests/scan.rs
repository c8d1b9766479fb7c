//! Manifest to report, end to end against an in-memory registry

mod helper;

use std::sync::Arc;

use deltaver::parser::types::RegistryType;
use deltaver::parser::{ExcludedReqs, Parser, PipFreezeParser};
use deltaver::report::{Thresholds, render};
use deltaver::scan::{Outcome, ScanOptions, scan};
use deltaver::version::clock::FixedClock;
use deltaver::version::registry::RegistryHistory;
use helper::{FakeRegistry, date, httpx_releases};

const REQUIREMENTS: &str = "\
anyio==4.2.0
httpx==0.25.2
idna==3.6 ; python_version >= \"3.8\"
pip==23.3.2
sniffio==1.3.1
";

fn registry() -> FakeRegistry {
    FakeRegistry::new(RegistryType::PyPI)
        .with_releases("httpx", &httpx_releases())
        .with_releases(
            "anyio",
            &[("4.2.0", date(2023, 12, 16)), ("4.3.0", date(2024, 2, 19))],
        )
        .with_releases("idna", &[("3.6", date(2023, 11, 25))])
}

#[tokio::test]
async fn scan_reports_deltas_failures_and_summary() {
    let requirements = ExcludedReqs::new(PipFreezeParser::new(), ["pip"])
        .parse(REQUIREMENTS)
        .unwrap();
    let source = RegistryHistory::new(Arc::new(registry()));

    let report = scan(
        &requirements,
        &source,
        &FixedClock(date(2024, 6, 28)),
        &ScanOptions::default(),
    )
    .await;

    let outcomes: Vec<(&str, &Outcome)> = report
        .packages()
        .iter()
        .map(|p| (p.name.as_str(), &p.outcome))
        .collect();
    assert_eq!(outcomes.len(), 4);
    assert_eq!(outcomes[0], ("anyio", &Outcome::Delta(130)));
    assert_eq!(outcomes[1], ("httpx", &Outcome::Delta(191)));
    assert_eq!(outcomes[2], ("idna", &Outcome::Delta(0)));
    assert!(matches!(outcomes[3], ("sniffio", Outcome::Failed(_))));

    let rendered = render(&report);
    assert!(rendered.contains("Max delta: 191"));
    assert!(rendered.contains("Average delta: 107.00"));
    assert!(rendered.find("httpx").unwrap() < rendered.find("anyio").unwrap());

    let thresholds = Thresholds {
        fail_on_avg: None,
        fail_on_max: Some(191),
    };
    assert_eq!(thresholds.check(&report).len(), 1);
}
