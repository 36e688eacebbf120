//! Bookstore Catalog Service
//!
//! A Rust implementation of the bookstore catalog server, providing a
//! REST JSON API for creating, querying, repricing and deleting book
//! records held in an in-memory catalog.

use std::sync::Arc;

pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;

pub use config::AppConfig;
pub use error::{CatalogError, CatalogResult};

use api::RequestSequencer;
use catalog::BookCatalog;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<dyn BookCatalog>,
    pub sequencer: Arc<RequestSequencer>,
}
