pub mod config_service;
pub mod export_writer;
pub mod paths;
pub mod report_store;
pub mod secret_service;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::export_writer::write_export;
pub use crate::paths::StratagemPaths;
pub use crate::report_store::ReportStore;
pub use crate::secret_service::SecretServiceImpl;
pub use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
