//! Report domain: archived generation sessions and their persistence contract.

pub mod grouping;
pub mod model;
pub mod repository;

pub use grouping::{MonthGroup, group_by_month};
pub use model::{Report, ReportSnapshot};
pub use repository::ReportRepository;
