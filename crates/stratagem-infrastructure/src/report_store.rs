//! Report Store: the archived report sequence on top of a key-value backend.
//!
//! The record under the storage key is an envelope:
//!
//! ```json
//! { "revision": 4, "reports": [ { "id": ..., "topic": ..., "perspectives": [...], "date": ... } ] }
//! ```
//!
//! A bare JSON array of reports is also accepted and read as revision 0.

use crate::storage::KeyValueStore;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use stratagem_core::config::DEFAULT_STORAGE_KEY;
use stratagem_core::error::{Result, StratagemError};
use stratagem_core::report::{Report, ReportRepository, ReportSnapshot};

#[derive(Serialize)]
struct StoredEnvelopeRef<'a> {
    revision: u64,
    reports: &'a [Report],
}

#[derive(Deserialize)]
struct StoredEnvelope {
    revision: u64,
    #[serde(default)]
    reports: Vec<Report>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBlob {
    Legacy(Vec<Report>),
    Envelope(StoredEnvelope),
}

/// Best-effort persistent report archive.
///
/// Reads never fail: an absent, unreadable or corrupt record reads as an empty sequence at
/// revision 0 (with a warning logged).
pub struct ReportStore<S: KeyValueStore> {
    backend: Arc<S>,
    key: String,
}

impl<S: KeyValueStore> ReportStore<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: Arc<S>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn decode(raw: &str) -> Result<ReportSnapshot> {
        match serde_json::from_str::<StoredBlob>(raw)? {
            StoredBlob::Legacy(reports) => Ok(ReportSnapshot {
                revision: 0,
                reports,
            }),
            StoredBlob::Envelope(envelope) => Ok(ReportSnapshot {
                revision: envelope.revision,
                reports: envelope.reports,
            }),
        }
    }

    fn encode(revision: u64, reports: &[Report]) -> Result<String> {
        Ok(serde_json::to_string(&StoredEnvelopeRef { revision, reports })?)
    }

    fn decode_or_empty(&self, raw: Option<&str>) -> ReportSnapshot {
        let Some(raw) = raw else {
            return ReportSnapshot::default();
        };
        Self::decode(raw).unwrap_or_else(|e| {
            tracing::warn!(
                "[ReportStore] Ignoring corrupt record under '{}': {}",
                self.key,
                e
            );
            ReportSnapshot::default()
        })
    }

    async fn read_raw(&self) -> Option<String> {
        match self.backend.get(&self.key).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    "[ReportStore] Failed to read '{}', treating as empty: {}",
                    self.key,
                    e
                );
                None
            }
        }
    }
}

#[async_trait]
impl<S: KeyValueStore + 'static> ReportRepository for ReportStore<S> {
    async fn load_snapshot(&self) -> ReportSnapshot {
        let raw = self.read_raw().await;
        let snapshot = self.decode_or_empty(raw.as_deref());
        tracing::debug!(
            "[ReportStore] Loaded {} reports at revision {}",
            snapshot.reports.len(),
            snapshot.revision
        );
        snapshot
    }

    async fn save(&self, reports: &[Report]) -> Result<()> {
        let next = next_revision(self.load_snapshot().await.revision)?;
        let encoded = Self::encode(next, reports)?;
        self.backend.set(&self.key, encoded).await?;
        tracing::debug!(
            "[ReportStore] Saved {} reports at revision {}",
            reports.len(),
            next
        );
        Ok(())
    }

    async fn save_if_unchanged(&self, expected_revision: u64, reports: &[Report]) -> Result<u64> {
        let raw = self.backend.get(&self.key).await?;
        let found = self.decode_or_empty(raw.as_deref()).revision;
        if found != expected_revision {
            return Err(StratagemError::Conflict {
                expected: expected_revision,
                found,
            });
        }

        let next = next_revision(expected_revision)?;
        let encoded = Self::encode(next, reports)?;
        let swapped = self
            .backend
            .compare_and_swap(&self.key, raw.as_deref(), encoded)
            .await?;

        if !swapped {
            let found = self.load_snapshot().await.revision;
            return Err(StratagemError::Conflict {
                expected: expected_revision,
                found,
            });
        }

        tracing::debug!(
            "[ReportStore] Saved {} reports at revision {}",
            reports.len(),
            next
        );
        Ok(next)
    }
}

fn next_revision(current: u64) -> Result<u64> {
    current
        .checked_add(1)
        .ok_or_else(|| StratagemError::storage(format!("report revision {current} cannot advance")))
}
