//! Book model and related types.
//!
//! A book record is immutable after creation except for its price, which
//! the catalog may replace through the price-update operation. Genres are
//! kept as an insertion-ordered set (duplicates in the request body are
//! collapsed silently).

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog record. The id is assigned by the store on creation and is
/// never reused, even after the record is deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    /// Store-assigned identifier, strictly increasing
    pub id: u64,
    /// Title, unique across live records ignoring case
    pub title: String,
    pub author: String,
    pub year: i32,
    pub price: i64,
    #[schema(value_type = Vec<String>)]
    pub genres: IndexSet<String>,
}

/// Creation payload: a book without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i32,
    pub price: i64,
    #[serde(default)]
    #[schema(value_type = Vec<String>)]
    pub genres: IndexSet<String>,
}

impl NewBook {
    /// Materialize the record with its store-assigned id.
    pub fn into_book(self, id: u64) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            year: self.year,
            price: self.price,
            genres: self.genres,
        }
    }
}
