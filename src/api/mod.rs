//! REST API endpoints.
//!
//! Axum-based HTTP host for generating schedules, recording winners and
//! reading performance tables. Schedules live in memory only.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::models::SchedulingError;
use state::AppState;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Scheduling(#[from] SchedulingError),
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
            ApiError::Scheduling(SchedulingError::InvalidRoster(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_ROSTER")
            }
            ApiError::Scheduling(SchedulingError::InvalidRoundCount(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_ROUND_COUNT")
            }
            ApiError::Scheduling(SchedulingError::InvalidWinner(_)) => {
                (StatusCode::BAD_REQUEST, "INVALID_WINNER")
            }
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
            page_size: page_size.unwrap_or(50).clamp(1, 100),
        }
    }

    pub fn offset(&self) -> u32 {
        (self.page - 1) * self.page_size
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

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(AllowOrigin::exact(value)),
        Err(_) => {
            tracing::warn!("Invalid CORS origin {:?}, allowing any origin", origin);
            layer.allow_origin(Any)
        }
    }
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origin);

    Router::new()
        .route("/api/health", get(routes::meta::health))
        .route(
            "/api/schedules",
            get(routes::schedules::list_schedules).post(routes::schedules::create_schedule),
        )
        .route(
            "/api/schedules/:id",
            get(routes::schedules::get_schedule).delete(routes::schedules::delete_schedule),
        )
        .route(
            "/api/schedules/:id/rounds/:index/winner",
            put(routes::schedules::set_winner),
        )
        .route(
            "/api/schedules/:id/performance",
            get(routes::schedules::performance),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_default() {
        let p = Pagination::default();
        assert_eq!(p.page, 1);
        assert_eq!(p.page_size, 50);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_pagination_new() {
        let p = Pagination::new(Some(3), Some(25));
        assert_eq!(p.page, 3);
        assert_eq!(p.page_size, 25);
        assert_eq!(p.offset(), 50);
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(Some(0), Some(50));
        assert_eq!(p.page, 1);

        let p = Pagination::new(Some(1), Some(200));
        assert_eq!(p.page_size, 100);
    }

    #[test]
    fn test_pagination_meta() {
        let p = Pagination::new(Some(2), Some(10));
        let meta = PaginationMeta::new(&p, 25);

        assert_eq!(meta.page, 2);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn test_scheduling_error_status() {
        let resp =
            ApiError::from(SchedulingError::InvalidWinner("bad".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::NotFound("x".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cors_layer_accepts_any_origin_string() {
        // Neither call may panic, including for an unparsable origin
        let _ = cors_layer("*");
        let _ = cors_layer("http://localhost:3000");
        let _ = cors_layer("bad\norigin");
    }
}
