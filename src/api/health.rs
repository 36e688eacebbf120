//! Health check endpoint

/// Liveness probe; answers a bare "OK".
#[utoipa::path(
    get,
    path = "/books/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
pub async fn health_check() -> &'static str {
    "OK"
}
