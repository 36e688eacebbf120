//! Domain validation for candidate records and price updates.
//!
//! Checks run in a fixed order (duplicate title, then year, then price);
//! the first violated check determines the reported error.

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Book, NewBook};

/// Earliest accepted publication year, inclusive.
pub const MIN_YEAR: i32 = 1940;
/// Latest accepted publication year, inclusive.
pub const MAX_YEAR: i32 = 2100;

/// Check a creation candidate against the live records.
///
/// The caller must hold whatever lock guards `existing` until the insert
/// completes, otherwise the duplicate check races with concurrent adds.
pub fn validate_new_book<'a>(
    candidate: &NewBook,
    mut existing: impl Iterator<Item = &'a Book>,
) -> CatalogResult<()> {
    if existing.any(|book| eq_ignore_case(&book.title, &candidate.title)) {
        return Err(CatalogError::DuplicateTitle {
            title: candidate.title.clone(),
        });
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&candidate.year) {
        return Err(CatalogError::YearOutOfRange { year: candidate.year });
    }
    if candidate.price < 0 {
        return Err(CatalogError::NegativePrice { price: candidate.price });
    }
    Ok(())
}

/// A replacement price must be strictly positive.
pub fn validate_price_update(new_price: i64) -> CatalogResult<()> {
    if new_price <= 0 {
        return Err(CatalogError::NonPositivePrice { price: new_price });
    }
    Ok(())
}

/// Case-insensitive comparison used for title uniqueness and the exact
/// author filter match.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
