//! Entry use-case service.
//!
//! # Responsibility
//! - Provide the store contract (`add/get/update/delete/list_ordered`) to
//!   presentation callers.
//! - Feed ordered listings into the aggregator for chart views.
//!
//! # Invariants
//! - Service APIs never bypass repository validation and uniqueness checks.
//! - Service layer remains storage-agnostic.

use crate::aggregate::bucket::{aggregate, chart_data, BucketMap, ChartData};
use crate::aggregate::period::Granularity;
use crate::model::entry::{Entry, EntryId, EntryInput};
use crate::repo::entry_repo::{EntryListQuery, EntryRepository, RepoError, RepoResult};

/// Use-case facade over an entry repository.
pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an entry for a date that has none yet.
    ///
    /// # Errors
    /// - `DuplicateDate` when the date is already recorded.
    /// - `Validation` for negative or non-finite metrics.
    pub fn add(&mut self, input: &EntryInput) -> RepoResult<Entry> {
        self.repo.create_entry(input)
    }

    /// Gets one entry by id, failing with `NotFound` when absent.
    pub fn get(&self, id: EntryId) -> RepoResult<Entry> {
        self.repo.get_entry(id)?.ok_or(RepoError::NotFound(id))
    }

    /// Overwrites every field of entry `id`.
    ///
    /// Keeping the entry's own date never counts as a collision.
    pub fn update(&mut self, id: EntryId, input: &EntryInput) -> RepoResult<Entry> {
        self.repo.update_entry(id, input)
    }

    pub fn delete(&mut self, id: EntryId) -> RepoResult<()> {
        self.repo.delete_entry(id)
    }

    /// Lists all entries by `date ASC, id ASC`.
    pub fn list_ordered(&self) -> RepoResult<Vec<Entry>> {
        self.repo.list_entries(&EntryListQuery::default())
    }

    /// Lists entries with date bounds and paging, same ordering.
    pub fn list(&self, query: &EntryListQuery) -> RepoResult<Vec<Entry>> {
        self.repo.list_entries(query)
    }

    /// Aggregates the whole store at one granularity.
    pub fn aggregate(&self, granularity: Granularity) -> RepoResult<BucketMap> {
        let entries = self.list_ordered()?;
        Ok(aggregate(&entries, granularity))
    }

    /// Builds daily/weekly/monthly/yearly series from one listing.
    pub fn chart_data(&self) -> RepoResult<ChartData> {
        let entries = self.list_ordered()?;
        Ok(chart_data(&entries))
    }
}
