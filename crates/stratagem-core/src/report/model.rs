use crate::error::{Result, StratagemError};
use crate::perspective::Perspective;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One archived generation session.
///
/// Reports are created by the generation workflow on success and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Creation time in epoch milliseconds. Unique and increasing in creation order.
    pub id: i64,
    pub topic: String,
    #[serde(default)]
    pub perspectives: Vec<Perspective>,
    /// Creation timestamp. Only used for month grouping, never for ordering.
    pub date: DateTime<Utc>,
}

impl Report {
    /// Creates a report stamped at `now`.
    ///
    /// If `now` does not advance past `newest_id` (coarse or skewed clock), the id becomes
    /// `newest_id + 1` so ids stay unique and ordered newest-first.
    ///
    /// # Errors
    ///
    /// `Storage` when the stored newest id leaves no room for a larger one.
    pub fn create(
        topic: impl Into<String>,
        perspectives: Vec<Perspective>,
        now: DateTime<Utc>,
        newest_id: Option<i64>,
    ) -> Result<Self> {
        let millis = now.timestamp_millis();
        let id = match newest_id {
            Some(newest) if millis <= newest => newest.checked_add(1).ok_or_else(|| {
                StratagemError::storage(format!("report id space exhausted after {newest}"))
            })?,
            _ => millis,
        };

        Ok(Self {
            id,
            topic: topic.into(),
            perspectives,
            date: now,
        })
    }
}

/// Stored report sequence together with the revision it was read at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSnapshot {
    /// Incremented on every write. `0` for a store never written with a revision.
    pub revision: u64,
    /// Newest first.
    pub reports: Vec<Report>,
}

impl ReportSnapshot {
    pub fn newest_id(&self) -> Option<i64> {
        self.reports.first().map(|r| r.id)
    }

    /// Returns the sequence with `report` prepended.
    pub fn prepended(&self, report: Report) -> Vec<Report> {
        let mut reports = Vec::with_capacity(self.reports.len() + 1);
        reports.push(report);
        reports.extend(self.reports.iter().cloned());
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn id_is_creation_millis() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap();
        let report = Report::create("topic", Vec::new(), now, None).unwrap();
        assert_eq!(report.id, now.timestamp_millis());
        assert_eq!(report.date, now);
    }

    #[test]
    fn id_stays_ahead_of_newest() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap();
        let newest = now.timestamp_millis();
        let report = Report::create("topic", Vec::new(), now, Some(newest)).unwrap();
        assert_eq!(report.id, newest + 1);
    }

    #[test]
    fn maximal_newest_id_is_storage_error() {
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap();
        let err = Report::create("topic", Vec::new(), now, Some(i64::MAX)).unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn loads_browser_iso_dates_and_tolerates_missing_fields() {
        let json = r#"{"id": 1760520600000, "topic": "t", "date": "2025-10-15T09:30:00.000Z", "extra": true}"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert!(report.perspectives.is_empty());
        assert_eq!(report.date.timestamp_millis(), 1_760_520_600_000);
    }

    #[test]
    fn prepended_puts_new_report_first() {
        let now = Utc::now();
        let old = Report::create("old", Vec::new(), now, None).unwrap();
        let snapshot = ReportSnapshot {
            revision: 3,
            reports: vec![old.clone()],
        };
        let new = Report::create("new", Vec::new(), now, snapshot.newest_id()).unwrap();

        let reports = snapshot.prepended(new.clone());
        assert_eq!(reports, vec![new, old]);
    }
}
