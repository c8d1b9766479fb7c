//! Text report and threshold checks

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::scan::{Outcome, ScanReport};

/// Render the report: stale packages, failures, then the summary lines
pub fn render(report: &ScanReport) -> String {
    let mut out = String::new();

    let stale: Vec<_> = report
        .sorted_by_delta()
        .into_iter()
        .filter(|p| p.delta().is_some_and(|days| days > 0))
        .collect();

    if !stale.is_empty() {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL_CONDENSED)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                header_cell("Package"),
                header_cell("Version"),
                header_cell("Delta (days)"),
            ]);
        if let Some(column) = table.column_mut(2) {
            column.set_cell_alignment(CellAlignment::Right);
        }
        for package in stale {
            table.add_row(vec![
                Cell::new(&package.name),
                Cell::new(&package.version),
                Cell::new(package.delta().unwrap_or_default()),
            ]);
        }
        out.push_str(&table.to_string());
        out.push('\n');
    }

    let failed: Vec<_> = report.failed().collect();
    if !failed.is_empty() {
        out.push_str("\nFailed packages:\n");
        for package in failed {
            if let Outcome::Failed(reason) = &package.outcome {
                out.push_str(&format!(
                    "  {} {}: {}\n",
                    package.name, package.version, reason
                ));
            }
        }
    }

    out.push_str(&format!("\nMax delta: {}\n", report.max()));
    out.push_str(&format!("Average delta: {:.2}\n", report.average()));
    out
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Limits that make a scan fail, both inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thresholds {
    pub fail_on_avg: Option<u64>,
    pub fail_on_max: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ThresholdViolation {
    #[error("Average delta {actual:.2} is not less than {limit}")]
    Average { actual: f64, limit: u64 },

    #[error("Max delta {actual} is not less than {limit}")]
    Max { actual: i64, limit: u64 },
}

impl Thresholds {
    /// Every threshold the report reaches
    pub fn check(&self, report: &ScanReport) -> Vec<ThresholdViolation> {
        let mut violations = Vec::new();

        if let Some(limit) = self.fail_on_avg {
            let actual = report.average();
            if actual >= limit as f64 {
                violations.push(ThresholdViolation::Average { actual, limit });
            }
        }

        if let Some(limit) = self.fail_on_max {
            let actual = report.max();
            if actual >= 0 && actual as u64 >= limit {
                violations.push(ThresholdViolation::Max { actual, limit });
            }
        }

        violations
    }
}
