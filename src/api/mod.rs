//! REST API endpoints.
//!
//! Read-only Axum API over the loaded dataset. Every query endpoint accepts
//! the filter parameters of [`QueryFilters`](crate::query::QueryFilters).

pub mod routes;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::calculate::CalcError;
use crate::models::Metric;
use crate::query::QueryError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<CalcError> for ApiError {
    fn from(e: CalcError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Parse an optional metric parameter, defaulting to win percentage.
pub fn parse_metric(raw: Option<&str>) -> Result<Metric, ApiError> {
    match raw {
        None | Some("") => Ok(Metric::WinPct),
        Some(s) => s.parse().map_err(ApiError::BadRequest),
    }
}

/// 404 unless `name` appears somewhere in the dataset.
pub fn require_fencer(state: &AppState, name: &str) -> Result<(), ApiError> {
    if state.dataset.has_fencer(name) {
        Ok(())
    } else {
        Err(ApiError::NotFound(format!("fencer {}", name)))
    }
}

/// Pagination parameters.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 50,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(50).clamp(1, 200),
        }
    }

    /// Index of the first item on this page, saturating for huge pages.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.page_size as usize)
    }

    /// The slice of `items` on this page; empty past the end.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = (start + self.page_size as usize).min(items.len());
        &items[start..end]
    }
}

/// Pagination metadata in responses.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u32) -> Self {
        let total_pages = total_items.div_ceil(pagination.page_size);
        Self {
            page: pagination.page,
            page_size: pagination.page_size,
            total_items,
            total_pages,
            has_next: pagination.page < total_pages,
            has_prev: pagination.page > 1,
        }
    }
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    use routes::{fencers, head_to_head, matches, rankings};

    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/options", get(matches::options))
        .route("/api/matches", get(matches::list_matches))
        .route("/api/fencers/:name/report", get(fencers::report))
        .route("/api/fencers/:name/trend", get(fencers::trend))
        .route("/api/fencers/:name/placements", get(fencers::placements))
        .route("/api/rankings", get(rankings::rankings))
        .route("/api/leaderboard", get(rankings::leaderboard))
        .route("/api/head-to-head", get(head_to_head::head_to_head))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
