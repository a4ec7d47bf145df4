pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod perspective;
pub mod report;

// Re-export common error type
pub use error::StratagemError;
