//! Month grouping for the history view. Derived on demand, never persisted.

use super::model::Report;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Reports created in one calendar month (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGroup {
    pub year: i32,
    pub month: u32,
    /// Display label, e.g. `October 2026`.
    pub label: String,
    /// In store order (newest first).
    pub reports: Vec<Report>,
}

/// Buckets reports by the month of their `date`.
///
/// Groups are sorted newest month first regardless of the order reports were stored in.
pub fn group_by_month(reports: &[Report]) -> Vec<MonthGroup> {
    let mut buckets: BTreeMap<(i32, u32), Vec<Report>> = BTreeMap::new();
    for report in reports {
        buckets
            .entry((report.date.year(), report.date.month()))
            .or_default()
            .push(report.clone());
    }

    buckets
        .into_iter()
        .rev()
        .map(|((year, month), reports)| MonthGroup {
            year,
            month,
            label: month_label(year, month),
            reports,
        })
        .collect()
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn report(id: i64, y: i32, m: u32, d: u32) -> Report {
        Report {
            id,
            topic: format!("topic {id}"),
            perspectives: Vec::new(),
            date: Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn empty_history_has_no_groups() {
        assert!(group_by_month(&[]).is_empty());
    }

    #[test]
    fn groups_sorted_newest_month_first_even_when_store_order_disagrees() {
        // Store order deliberately interleaves months.
        let reports = vec![
            report(5, 2026, 3, 2),
            report(4, 2025, 12, 30),
            report(3, 2026, 3, 1),
            report(2, 2026, 1, 15),
        ];

        let groups = group_by_month(&reports);
        let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["March 2026", "January 2026", "December 2025"]);

        let march_ids: Vec<_> = groups[0].reports.iter().map(|r| r.id).collect();
        assert_eq!(march_ids, vec![5, 3]);
    }

    #[test]
    fn same_month_in_different_years_is_separate() {
        let groups = group_by_month(&[report(2, 2026, 10, 1), report(1, 2025, 10, 1)]);
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].year, groups[0].month), (2026, 10));
        assert_eq!(groups[1].label, "October 2025");
    }
}
