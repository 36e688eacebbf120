//! Book catalog endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_with::{formats::CommaSeparator, serde_as, StringWithSeparator};
use utoipa::{IntoParams, ToSchema};

use crate::{
    catalog::filter::BookFilter,
    error::CatalogResult,
    models::{Book, NewBook},
};

/// Response wrapper: every successful operation answers `{"result": ...}`.
#[derive(Serialize, ToSchema)]
pub struct ResultResponse<T> {
    pub result: T,
}

/// Query filters shared by the list and count endpoints. The genres
/// parameter is a single comma-separated value.
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct BookQuery {
    pub author: Option<String>,
    #[serde(rename = "price-bigger-than")]
    pub price_bigger_than: Option<i64>,
    #[serde(rename = "price-less-than")]
    pub price_less_than: Option<i64>,
    #[serde(rename = "year-bigger-than")]
    pub year_bigger_than: Option<i32>,
    #[serde(rename = "year-less-than")]
    pub year_less_than: Option<i32>,
    #[serde(default)]
    #[serde_as(as = "Option<StringWithSeparator<CommaSeparator, String>>")]
    #[param(value_type = Option<String>)]
    pub genres: Option<indexmap::IndexSet<String>>,
}

impl From<BookQuery> for BookFilter {
    fn from(query: BookQuery) -> Self {
        BookFilter {
            author: query.author,
            price_at_least: query.price_bigger_than,
            price_at_most: query.price_less_than,
            year_at_least: query.year_bigger_than,
            year_at_most: query.year_less_than,
            genres: query.genres,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct IdQuery {
    pub id: u64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UpdatePriceQuery {
    pub id: u64,
    pub price: i64,
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/book",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 200, description = "Book created, id returned", body = ResultResponse<u64>),
        (status = 409, description = "Duplicate title or value out of range", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(candidate): Json<NewBook>,
) -> CatalogResult<Json<ResultResponse<u64>>> {
    let total_before = state.catalog.get_total_books(&BookFilter::default()).await;

    let book = state
        .catalog
        .add_book(candidate)
        .await
        .inspect_err(|err| tracing::error!("{}", err))?;

    tracing::info!("creating new book with title [{}]", book.title);
    tracing::debug!(
        "currently there are {} books in the system, new book will be assigned with id {}",
        total_before,
        book.id
    );
    Ok(Json(ResultResponse { result: book.id }))
}

/// Count books matching the filters
#[utoipa::path(
    get,
    path = "/books/total",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Count of matching books", body = ResultResponse<u64>),
        (status = 400, description = "Malformed filter")
    )
)]
pub async fn get_total_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> Json<ResultResponse<u64>> {
    let total = state.catalog.get_total_books(&query.into()).await;
    tracing::info!("total books found for requested filters is {}", total);
    Json(ResultResponse { result: total as u64 })
}

/// List books matching the filters, sorted by title
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books sorted by title", body = ResultResponse<Vec<Book>>),
        (status = 400, description = "Malformed filter")
    )
)]
pub async fn get_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> Json<ResultResponse<Vec<Book>>> {
    let books = state.catalog.get_books(&query.into()).await;
    tracing::info!("total books found for requested filters is {}", books.len());
    Json(ResultResponse { result: books })
}

/// Get a single book by id
#[utoipa::path(
    get,
    path = "/book",
    tag = "books",
    params(IdQuery),
    responses(
        (status = 200, description = "Book details", body = ResultResponse<Book>),
        (status = 404, description = "No such book", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Query(query): Query<IdQuery>,
) -> CatalogResult<Json<ResultResponse<Book>>> {
    let book = state
        .catalog
        .get_book(query.id)
        .await
        .inspect_err(|err| tracing::error!("{}", err))?;

    tracing::debug!("fetching book id {} details", book.id);
    Ok(Json(ResultResponse { result: book }))
}

/// Update a book's price, answering the previous price
#[utoipa::path(
    put,
    path = "/book",
    tag = "books",
    params(UpdatePriceQuery),
    responses(
        (status = 200, description = "Previous price", body = ResultResponse<i64>),
        (status = 404, description = "No such book", body = crate::error::ErrorResponse),
        (status = 409, description = "Non-positive price", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book_price(
    State(state): State<crate::AppState>,
    Query(query): Query<UpdatePriceQuery>,
) -> CatalogResult<Json<ResultResponse<i64>>> {
    let old_price = state
        .catalog
        .update_book_price(query.id, query.price)
        .await
        .inspect_err(|err| tracing::error!("{}", err))?;

    tracing::info!("update book id [{}] price to {}", query.id, query.price);
    tracing::debug!(
        "book [{}] price change: {} --> {}",
        query.id,
        old_price,
        query.price
    );
    Ok(Json(ResultResponse { result: old_price }))
}

/// Delete a book, answering how many records remain
#[utoipa::path(
    delete,
    path = "/book",
    tag = "books",
    params(IdQuery),
    responses(
        (status = 200, description = "Remaining record count", body = ResultResponse<u64>),
        (status = 404, description = "No such book", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Query(query): Query<IdQuery>,
) -> CatalogResult<Json<ResultResponse<u64>>> {
    let remaining = state
        .catalog
        .delete_book(query.id)
        .await
        .inspect_err(|err| tracing::error!("{}", err))?;

    tracing::info!("removing book id [{}]", query.id);
    tracing::debug!(
        "after removing book id [{}] there are {} books in the system",
        query.id,
        remaining
    );
    Ok(Json(ResultResponse { result: remaining as u64 }))
}
