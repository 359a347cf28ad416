use actix_web::{web, HttpResponse};

use crate::error::Result;
use crate::response::ApiResponse;
use crate::AppState;

/// GET /api/v1/health
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db)
        .await
        .is_ok();

    Ok(ApiResponse::ok(
        serde_json::json!({ "database": if db_ok { "up" } else { "down" } }),
        "service is healthy",
    ))
}
