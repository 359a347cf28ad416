//! Paginated video listing with text search and caller-chosen ordering.
use sqlx::{FromRow, PgPool, Row};

use crate::error::{AppError, Result};
use crate::models::{Video, VideoListQuery, VideoPage};

use super::pipeline::{Condition, Operand, Pipeline, SortDirection};
use super::sql;

/// Sortable columns exposed to the API. Anything else is rejected.
fn sort_field(requested: Option<&str>) -> Result<&'static str> {
    match requested {
        None | Some("createdAt") | Some("created_at") => Ok("created_at"),
        Some("title") => Ok("title"),
        Some("duration") | Some("durationSeconds") | Some("duration_seconds") => {
            Ok("duration_seconds")
        }
        Some(other) => Err(AppError::Validation(format!(
            "unsupported sort field: {other}"
        ))),
    }
}

fn conditions(params: &VideoListQuery) -> Vec<Condition> {
    let mut conditions = vec![Condition::Eq {
        field: "is_published".into(),
        value: Operand::Bool(true),
    }];
    if let Some(query) = params.query.as_deref() {
        let needle = query.trim();
        if !needle.is_empty() {
            conditions.push(Condition::Contains {
                fields: vec!["title".into(), "description".into()],
                needle: needle.to_string(),
            });
        }
    }
    if let Some(owner) = params.user_id {
        conditions.push(Condition::Eq {
            field: "owner_id".into(),
            value: Operand::Uuid(owner),
        });
    }
    conditions
}

pub(crate) fn build_pipeline(params: &VideoListQuery) -> Result<Pipeline> {
    let field = sort_field(params.sort_by.as_deref())?;
    let direction = match params.sort_type.as_deref() {
        Some("asc") => SortDirection::Ascending,
        _ => SortDirection::Descending,
    };

    // Caller-supplied page/limit must stay representable LIMIT/OFFSET values.
    if i64::try_from(params.limit).is_err() {
        return Err(AppError::Validation("limit is out of range".to_string()));
    }
    let offset = params
        .page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(params.limit))
        .filter(|n| i64::try_from(*n).is_ok())
        .ok_or_else(|| AppError::Validation("page is out of range".to_string()))?;

    Ok(Pipeline::over("videos")
        .filter(conditions(params))
        .sort(field, direction)
        .skip(offset)
        .limit(params.limit)
        .project([
            "id",
            "owner_id",
            "title",
            "description",
            "video_url",
            "thumbnail_url",
            "duration_seconds",
            "is_published",
            "created_at",
            "updated_at",
        ]))
}

pub async fn list_videos(pool: &PgPool, params: &VideoListQuery) -> Result<VideoPage> {
    if params.page < 1 || params.limit < 1 {
        return Err(AppError::Validation(
            "page and limit must both be positive".to_string(),
        ));
    }

    let compiled = sql::compile(&build_pipeline(params)?);
    let rows = compiled.query().fetch_all(pool).await?;
    let mut docs = Vec::with_capacity(rows.len());
    for row in &rows {
        docs.push(Video::from_row(row)?);
    }

    let count_pipeline = Pipeline::over("videos").filter(conditions(params));
    let total_row = sql::compile_count(&count_pipeline)
        .query()
        .fetch_one(pool)
        .await?;
    let total_docs: i64 = total_row.get(0);

    let limit = params.limit as i64;
    Ok(VideoPage {
        docs,
        total_docs,
        page: params.page,
        limit: params.limit,
        total_pages: (total_docs + limit - 1) / limit,
    })
}
