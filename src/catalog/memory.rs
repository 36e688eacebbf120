//! In-memory catalog store.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Book, NewBook};

use super::filter::BookFilter;
use super::validate::{validate_new_book, validate_price_update};
use super::{BookCatalog, IdAllocator};

/// The authoritative in-memory catalog. The record map is guarded by a
/// single lock; every read-modify-write sequence (duplicate check plus
/// insert, lookup plus price swap) runs under the write guard, so readers
/// only ever observe pre- or post-mutation state.
pub struct MemoryCatalog {
    books: RwLock<BTreeMap<u64, Book>>,
    ids: IdAllocator,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            books: RwLock::new(BTreeMap::new()),
            ids: IdAllocator::new(),
        }
    }

    // A poisoned lock means a panic mid-mutation; the catalog state is
    // suspect and continuing would be a defect, so propagate the panic.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<u64, Book>> {
        self.books.read().expect("catalog lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<u64, Book>> {
        self.books.write().expect("catalog lock poisoned")
    }

    /// Filtered snapshot, unsorted. Clones the matching records so the
    /// caller works independently of later mutations.
    fn snapshot(&self, filter: &BookFilter) -> Vec<Book> {
        self.read()
            .values()
            .filter(|book| filter.matches(book))
            .cloned()
            .collect()
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookCatalog for MemoryCatalog {
    async fn add_book(&self, candidate: NewBook) -> CatalogResult<Book> {
        let mut books = self.write();
        validate_new_book(&candidate, books.values())?;
        // Allocation happens after validation so a rejected candidate
        // never consumes an id.
        let id = self.ids.next();
        let book = candidate.into_book(id);
        books.insert(id, book.clone());
        Ok(book)
    }

    async fn get_book(&self, id: u64) -> CatalogResult<Book> {
        self.read()
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound { id })
    }

    async fn delete_book(&self, id: u64) -> CatalogResult<usize> {
        let mut books = self.write();
        books
            .remove(&id)
            .ok_or(CatalogError::NotFound { id })?;
        Ok(books.len())
    }

    async fn update_book_price(&self, id: u64, new_price: i64) -> CatalogResult<i64> {
        let mut books = self.write();
        let book = books
            .get_mut(&id)
            .ok_or(CatalogError::NotFound { id })?;
        validate_price_update(new_price)?;
        let old_price = book.price;
        book.price = new_price;
        Ok(old_price)
    }

    async fn get_books(&self, filter: &BookFilter) -> Vec<Book> {
        let mut books = self.snapshot(filter);
        books.sort_by_cached_key(|book| book.title.to_lowercase());
        books
    }

    async fn get_total_books(&self, filter: &BookFilter) -> usize {
        self.snapshot(filter).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn candidate(title: &str, author: &str, year: i32, price: i64, genres: &[&str]) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: author.to_string(),
            year,
            price,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    fn dune() -> NewBook {
        candidate("Dune", "Frank Herbert", 1965, 20, &["SciFi"])
    }

    #[tokio::test]
    async fn added_book_is_retrievable_by_its_id() {
        let catalog = MemoryCatalog::new();
        let added = catalog.add_book(dune()).await.unwrap();
        assert_eq!(added.id, 1);

        let fetched = catalog.get_book(added.id).await.unwrap();
        assert_eq!(fetched, added);
        assert_eq!(fetched.title, "Dune");
        assert_eq!(fetched.price, 20);
    }

    #[tokio::test]
    async fn duplicate_title_differing_only_by_case_is_rejected() {
        let catalog = MemoryCatalog::new();
        catalog.add_book(dune()).await.unwrap();

        let err = catalog
            .add_book(candidate("dune", "Other", 1970, 10, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTitle { .. }));
        assert_eq!(catalog.get_total_books(&BookFilter::default()).await, 1);
    }

    #[tokio::test]
    async fn rejected_candidate_consumes_no_id() {
        let catalog = MemoryCatalog::new();
        catalog
            .add_book(candidate("Bad Year", "A", 1800, 5, &[]))
            .await
            .unwrap_err();

        let book = catalog.add_book(dune()).await.unwrap();
        assert_eq!(book.id, 1);
    }

    #[tokio::test]
    async fn deleted_ids_are_never_reused() {
        let catalog = MemoryCatalog::new();
        let first = catalog.add_book(dune()).await.unwrap();
        let remaining = catalog.delete_book(first.id).await.unwrap();
        assert_eq!(remaining, 0);

        let second = catalog
            .add_book(candidate("Hyperion", "Dan Simmons", 1989, 15, &[]))
            .await
            .unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn delete_of_missing_id_reports_not_found() {
        let catalog = MemoryCatalog::new();
        let err = catalog.delete_book(99).await.unwrap_err();
        assert_eq!(err, CatalogError::NotFound { id: 99 });
    }

    #[tokio::test]
    async fn delete_decrements_total_by_one() {
        let catalog = MemoryCatalog::new();
        let a = catalog.add_book(dune()).await.unwrap();
        catalog
            .add_book(candidate("Hyperion", "Dan Simmons", 1989, 15, &[]))
            .await
            .unwrap();

        let remaining = catalog.delete_book(a.id).await.unwrap();
        assert_eq!(remaining, 1);
        assert_eq!(catalog.get_total_books(&BookFilter::default()).await, 1);
    }

    #[tokio::test]
    async fn price_update_returns_the_prior_price() {
        let catalog = MemoryCatalog::new();
        let book = catalog.add_book(dune()).await.unwrap();

        let old = catalog.update_book_price(book.id, 25).await.unwrap();
        assert_eq!(old, 20);
        assert_eq!(catalog.get_book(book.id).await.unwrap().price, 25);
    }

    #[tokio::test]
    async fn price_update_boundaries() {
        let catalog = MemoryCatalog::new();
        let book = catalog.add_book(dune()).await.unwrap();

        let err = catalog.update_book_price(book.id, 0).await.unwrap_err();
        assert_eq!(err, CatalogError::NonPositivePrice { price: 0 });
        // A rejected update leaves the record untouched.
        assert_eq!(catalog.get_book(book.id).await.unwrap().price, 20);

        assert_eq!(catalog.update_book_price(book.id, 1).await.unwrap(), 20);
    }

    #[tokio::test]
    async fn price_update_of_missing_id_reports_not_found() {
        let catalog = MemoryCatalog::new();
        let err = catalog.update_book_price(5, 10).await.unwrap_err();
        assert_eq!(err, CatalogError::NotFound { id: 5 });
    }

    #[tokio::test]
    async fn creation_boundaries_match_the_accepted_ranges() {
        let catalog = MemoryCatalog::new();
        assert!(catalog.add_book(candidate("a", "x", 1940, 0, &[])).await.is_ok());
        assert!(catalog.add_book(candidate("b", "x", 2100, 0, &[])).await.is_ok());
        assert!(matches!(
            catalog.add_book(candidate("c", "x", 1939, 0, &[])).await,
            Err(CatalogError::YearOutOfRange { year: 1939 })
        ));
        assert!(matches!(
            catalog.add_book(candidate("d", "x", 1965, -1, &[])).await,
            Err(CatalogError::NegativePrice { price: -1 })
        ));
    }

    #[tokio::test]
    async fn listing_sorts_by_title_ignoring_case() {
        let catalog = MemoryCatalog::new();
        catalog.add_book(candidate("zebra", "x", 1990, 1, &[])).await.unwrap();
        catalog.add_book(candidate("Apple", "x", 1990, 1, &[])).await.unwrap();
        catalog.add_book(candidate("mango", "x", 1990, 1, &[])).await.unwrap();

        let titles: Vec<_> = catalog
            .get_books(&BookFilter::default())
            .await
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(titles, vec!["Apple", "mango", "zebra"]);
    }

    #[tokio::test]
    async fn filters_narrow_listing_and_count_alike() {
        let catalog = MemoryCatalog::new();
        catalog
            .add_book(candidate("1984", "Orwell", 1949, 12, &["Drama"]))
            .await
            .unwrap();
        catalog
            .add_book(candidate("Animal Farm", "George Orwell", 1945, 9, &["Satire"]))
            .await
            .unwrap();
        catalog.add_book(dune()).await.unwrap();

        let by_author = BookFilter {
            author: Some("orwell".to_string()),
            ..Default::default()
        };
        assert_eq!(catalog.get_total_books(&by_author).await, 1);
        assert_eq!(catalog.get_books(&by_author).await[0].title, "1984");

        let by_genres = BookFilter {
            genres: Some(["Satire".to_string(), "SciFi".to_string()].into_iter().collect()),
            ..Default::default()
        };
        assert_eq!(catalog.get_total_books(&by_genres).await, 2);

        let by_year = BookFilter {
            year_at_least: Some(1945),
            year_at_most: Some(1949),
            ..Default::default()
        };
        assert_eq!(catalog.get_total_books(&by_year).await, 2);
    }

    #[tokio::test]
    async fn dune_example() {
        let catalog = MemoryCatalog::new();
        catalog.add_book(candidate("Dune", "Frank Herbert", 1965, 20, &[])).await.unwrap();
        let err = catalog
            .add_book(candidate("Dune", "Brian Herbert", 1970, 10, &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTitle { .. }));
        assert_eq!(catalog.get_total_books(&BookFilter::default()).await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_adds_with_distinct_titles_all_succeed() {
        let catalog = Arc::new(MemoryCatalog::new());
        let handles: Vec<_> = (0..50)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move {
                    catalog
                        .add_book(candidate(&format!("Book {}", i), "x", 1990, 1, &[]))
                        .await
                })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            let book = handle.await.unwrap().unwrap();
            assert!(ids.insert(book.id), "id {} assigned twice", book.id);
        }
        assert_eq!(catalog.get_total_books(&BookFilter::default()).await, 50);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_adds_with_the_same_title_admit_exactly_one() {
        let catalog = Arc::new(MemoryCatalog::new());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                // Alternate casing to exercise the case-insensitive check.
                let title = if i % 2 == 0 { "Dune" } else { "DUNE" };
                tokio::spawn(async move {
                    catalog.add_book(candidate(title, "x", 1965, 20, &[])).await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(err) => assert!(matches!(err, CatalogError::DuplicateTitle { .. })),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(catalog.get_total_books(&BookFilter::default()).await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn readers_racing_mutations_see_whole_records() {
        let catalog = Arc::new(MemoryCatalog::new());
        let book = catalog.add_book(dune()).await.unwrap();

        let writer = {
            let catalog = Arc::clone(&catalog);
            let id = book.id;
            tokio::spawn(async move {
                for price in 1..=200 {
                    catalog.update_book_price(id, price).await.unwrap();
                }
            })
        };
        let reader = {
            let catalog = Arc::clone(&catalog);
            let id = book.id;
            tokio::spawn(async move {
                for _ in 0..200 {
                    let seen = catalog.get_book(id).await.unwrap();
                    assert!(seen.price == 20 || (1..=200).contains(&seen.price));
                    assert_eq!(seen.title, "Dune");
                }
            })
        };

        writer.await.unwrap();
        reader.await.unwrap();
    }
}
