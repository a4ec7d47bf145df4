use async_trait::async_trait;
use stratagem_core::error::Result;

/// A durable string-keyed record store.
///
/// Each key holds one serialized record. Swapping the backend (file, memory, database)
/// does not change the semantics of the stores built on top of it.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw record under `key`, or `None` if nothing was ever written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the record under `key`.
    async fn set(&self, key: &str, value: String) -> Result<()>;

    /// Writes `value` only if the current record equals `expected`
    /// (`None` meaning "absent"). Returns whether the write happened.
    ///
    /// The comparison and the write are atomic with respect to other callers of this
    /// method and of `set` on the same backend.
    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        value: String,
    ) -> Result<bool>;
}
