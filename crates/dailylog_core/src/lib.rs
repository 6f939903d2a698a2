//! Core domain logic for dailylog.
//! This crate is the single source of truth for entry invariants.

pub mod aggregate;
pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use aggregate::bucket::{aggregate, aggregate_named, chart_data, Bucket, BucketMap, ChartData};
pub use aggregate::period::{Granularity, InvalidGranularity};
pub use config::AppConfig;
pub use form::{parse_date, EntryForm, FormError};
pub use logging::{default_log_level, init_logging, LoggingConfig};
pub use model::entry::{Entry, EntryId, EntryInput, EntryValidationError, Metric, DATE_FORMAT};
pub use repo::entry_repo::{
    EntryListQuery, EntryRepository, RepoError, RepoResult, SqliteEntryRepository,
};
pub use service::entry_service::EntryService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
