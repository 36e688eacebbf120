//! Catalog store: the authoritative collection of book records.
//!
//! The store contract is the [`BookCatalog`] trait; [`memory::MemoryCatalog`]
//! is the in-memory implementation. A durable-storage variant would plug in
//! behind the same trait without touching validation or filtering.

pub mod filter;
pub mod memory;
pub mod validate;

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::models::{Book, NewBook};
use filter::BookFilter;

/// Store contract consumed by the HTTP boundary.
///
/// All operations are single deterministic attempts against the catalog;
/// failures are typed values, never panics.
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Validate the candidate, assign it an id and insert it. Validation
    /// precedes id allocation so that rejected candidates never consume
    /// an id, and the duplicate check and the insert form one atomic
    /// critical section.
    async fn add_book(&self, candidate: NewBook) -> CatalogResult<Book>;

    async fn get_book(&self, id: u64) -> CatalogResult<Book>;

    /// Remove a record and return how many remain.
    async fn delete_book(&self, id: u64) -> CatalogResult<usize>;

    /// Replace a record's price and return the price that was in effect
    /// immediately before the update.
    async fn update_book_price(&self, id: u64, new_price: i64) -> CatalogResult<i64>;

    /// Matching records, sorted by case-insensitive title ascending.
    async fn get_books(&self, filter: &BookFilter) -> Vec<Book>;

    /// Count of matching records, independent of ordering.
    async fn get_total_books(&self, filter: &BookFilter) -> usize;
}

/// Issues unique, monotonically increasing identifiers starting at 1.
/// Ids are never reused, even when the surrounding operation fails or the
/// record they were assigned to is later deleted.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: AtomicU64::new(1) }
    }

    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
