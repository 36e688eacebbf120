//! API handlers for the bookstore REST endpoints

pub mod books;
pub mod health;
pub mod openapi;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::Instrument;

use crate::AppState;

/// Process-wide request counter. Every inbound call gets the next number,
/// which tags the tracing span for that call so nested catalog logs
/// correlate with the request line.
#[derive(Debug)]
pub struct RequestSequencer {
    counter: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self { counter: AtomicU64::new(0) }
    }

    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Default for RequestSequencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware wrapping every route: stamps the request number, times the
/// call, and logs outcome. Failures pass through unchanged so the
/// boundary keeps the original status mapping.
pub async fn sequence_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let number = state.sequencer.next();
    let resource = request.uri().path().to_owned();
    let verb = request.method().clone();
    let span = tracing::info_span!("request", number);

    async move {
        let start = Instant::now();
        tracing::info!(
            "incoming request | #{} | resource: {} | HTTP verb {}",
            number,
            resource,
            verb
        );

        let response = next.run(request).await;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            tracing::error!("request #{} failed with status {}", number, status);
        }
        tracing::debug!(
            "request #{} duration: {}ms",
            number,
            start.elapsed().as_millis()
        );
        response
    }
    .instrument(span)
    .await
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        .route(
            "/book",
            axum::routing::post(books::create_book)
                .get(books::get_book)
                .put(books::update_book_price)
                .delete(books::delete_book),
        )
        .route("/books", get(books::get_books))
        .route("/books/total", get(books::get_total_books))
        .route("/books/health", get(health::health_check))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            sequence_requests,
        ))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
