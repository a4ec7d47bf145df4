//! Report repository trait.
//!
//! Defines the persistence contract for the archived report sequence.

use super::model::{Report, ReportSnapshot};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the archived report sequence.
///
/// The whole sequence is stored as one record. Reads are best-effort: a missing or corrupt
/// record reads as empty instead of failing. Writes are full overwrites; callers build the
/// complete new sequence (new report prepended) before saving.
///
/// # Concurrency
///
/// `save` is last-write-wins. Writers that may race with another process should use
/// `load_snapshot` + `save_if_unchanged`, which rejects the write when the stored revision
/// moved since it was read.
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Loads all reports, newest first. Never fails.
    async fn load(&self) -> Vec<Report> {
        self.load_snapshot().await.reports
    }

    /// Loads the reports together with the stored revision.
    async fn load_snapshot(&self) -> ReportSnapshot;

    /// Overwrites the stored sequence unconditionally.
    async fn save(&self, reports: &[Report]) -> Result<()>;

    /// Overwrites the stored sequence only if its revision is still `expected_revision`.
    ///
    /// # Returns
    ///
    /// - `Ok(revision)`: the new revision after the write
    /// - `Err(StratagemError::Conflict)`: another writer got there first
    /// - `Err(_)`: backend failure
    async fn save_if_unchanged(&self, expected_revision: u64, reports: &[Report]) -> Result<u64>;

    /// Finds one archived report by id.
    async fn find_by_id(&self, id: i64) -> Option<Report> {
        self.load().await.into_iter().find(|r| r.id == id)
    }
}
