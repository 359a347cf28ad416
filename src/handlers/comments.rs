//! Comment endpoints. The storage schema exists; the read/write paths are
//! not wired up yet, so every route answers 501.
//!
//! TODO: implement listing on top of the pipeline compiler once comment
//! pagination lands.
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::middleware::CurrentUser;
use crate::AppState;

fn not_ready() -> AppError {
    AppError::NotImplemented("comments are not available yet".to_string())
}

/// GET /api/v1/comments/{videoId}
pub async fn list(_state: web::Data<AppState>, _path: web::Path<Uuid>) -> Result<HttpResponse> {
    Err(not_ready())
}

/// POST /api/v1/comments/{videoId}
pub async fn create(
    _state: web::Data<AppState>,
    _user: CurrentUser,
    _path: web::Path<Uuid>,
    _body: web::Json<serde_json::Value>,
) -> Result<HttpResponse> {
    Err(not_ready())
}

/// PATCH /api/v1/comments/c/{commentId}
pub async fn update(
    _state: web::Data<AppState>,
    _user: CurrentUser,
    _path: web::Path<Uuid>,
    _body: web::Json<serde_json::Value>,
) -> Result<HttpResponse> {
    Err(not_ready())
}

/// DELETE /api/v1/comments/c/{commentId}
pub async fn delete(
    _state: web::Data<AppState>,
    _user: CurrentUser,
    _path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    Err(not_ready())
}
