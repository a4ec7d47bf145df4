pub mod export;
pub mod generate;
pub mod history;
pub mod show;
