//! Perspective domain: one generated strategic idea and batch validation.

pub mod model;
pub mod validation;

pub use model::{DEFAULT_PERSPECTIVE_COUNT, Perspective};
pub use validation::{BatchPolicy, REQUIRED_FIELDS, validate_batch};
