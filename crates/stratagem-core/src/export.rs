//! Downloadable export of a perspective batch.

use crate::error::Result;
use crate::perspective::Perspective;
use crate::report::Report;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const FILE_PREFIX: &str = "strategic-perspectives";

/// `{ topic, generatedAt, perspectives }` as written to the export file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub topic: String,
    pub generated_at: DateTime<Utc>,
    pub perspectives: Vec<Perspective>,
}

impl ExportDocument {
    /// Builds an export of `perspectives`, or `None` when there is nothing to export.
    pub fn new(
        topic: impl Into<String>,
        perspectives: &[Perspective],
        generated_at: DateTime<Utc>,
    ) -> Option<Self> {
        if perspectives.is_empty() {
            return None;
        }
        Some(Self {
            topic: topic.into(),
            generated_at,
            perspectives: perspectives.to_vec(),
        })
    }

    pub fn from_report(report: &Report, generated_at: DateTime<Utc>) -> Option<Self> {
        Self::new(report.topic.clone(), &report.perspectives, generated_at)
    }

    /// `strategic-perspectives-<topic>-<epoch millis>.json`, whitespace runs in the topic
    /// replaced by `_`.
    pub fn file_name(&self) -> String {
        let topic: String = self
            .topic
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .chars()
            .map(|c| {
                if c == '/' || c == '\\' || c.is_control() {
                    '_'
                } else {
                    c
                }
            })
            .collect();

        format!(
            "{FILE_PREFIX}-{topic}-{}.json",
            self.generated_at.timestamp_millis()
        )
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
