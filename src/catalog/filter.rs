//! Filter composition for list and count queries.

use indexmap::IndexSet;

use crate::models::Book;

use super::validate::eq_ignore_case;

/// Optional-field query narrowing which records a list or count considers.
/// Every present field ANDs with the others; an absent field imposes no
/// constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    /// Exact author match, ignoring case (not a substring search)
    pub author: Option<String>,
    /// Inclusive lower bound on price
    pub price_at_least: Option<i64>,
    /// Inclusive upper bound on price
    pub price_at_most: Option<i64>,
    /// Inclusive lower bound on year
    pub year_at_least: Option<i32>,
    /// Inclusive upper bound on year
    pub year_at_most: Option<i32>,
    /// Keep records sharing at least one tag; empty means unconstrained
    pub genres: Option<IndexSet<String>>,
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(author) = &self.author {
            if !eq_ignore_case(&book.author, author) {
                return false;
            }
        }
        if let Some(min) = self.price_at_least {
            if book.price < min {
                return false;
            }
        }
        if let Some(max) = self.price_at_most {
            if book.price > max {
                return false;
            }
        }
        if let Some(min) = self.year_at_least {
            if book.year < min {
                return false;
            }
        }
        if let Some(max) = self.year_at_most {
            if book.year > max {
                return false;
            }
        }
        if let Some(genres) = &self.genres {
            if !genres.is_empty() && !book.genres.iter().any(|g| genres.contains(g)) {
                return false;
            }
        }
        true
    }
}
