pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod loader;
pub mod normalize;
pub mod query;
pub mod records;
