//! Error types for the bookstore server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Typed outcomes of catalog operations.
///
/// Every variant is an expected, recoverable result of a single request;
/// only the HTTP boundary decides what status code each one becomes.
/// Unexpected internal failures (poisoned locks and the like) are defects
/// and panic instead of flowing through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("book with the title [{title}] already exists in the system")]
    DuplicateTitle { title: String },

    #[error("can't create new book that its year [{year}] is not in the accepted range [1940 -> 2100]")]
    YearOutOfRange { year: i32 },

    #[error("can't create new book with negative price [{price}]")]
    NegativePrice { price: i64 },

    #[error("price update to [{price}] must be a positive integer")]
    NonPositivePrice { price: i64 },

    #[error("no such book with id {id}")]
    NotFound { id: u64 },
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    #[serde(rename = "errorMessage")]
    pub error_message: String,
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::DuplicateTitle { .. }
            | CatalogError::YearOutOfRange { .. }
            | CatalogError::NegativePrice { .. }
            | CatalogError::NonPositivePrice { .. } => StatusCode::CONFLICT,
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
        };

        let body = Json(ErrorResponse {
            error_message: format!("Error: {}", self),
        });

        (status, body).into_response()
    }
}

/// Result type alias for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;
